use thiserror::Error;

/// Unified error type for bumpkin operations
#[derive(Error, Debug)]
pub enum BumpkinError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Tag '{0}' already exists")]
    TagExists(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Hook error: {0}")]
    Hook(String),
}

/// Convenience type alias for Results in bumpkin
pub type Result<T> = std::result::Result<T, BumpkinError>;

impl BumpkinError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpkinError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpkinError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        BumpkinError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BumpkinError::Remote(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        BumpkinError::Hook(msg.into())
    }

    /// True when a tag could not be created because the name is taken.
    ///
    /// Callers use this to tell a duplicate apart from storage or transport failures.
    pub fn is_tag_exists(&self) -> bool {
        matches!(self, BumpkinError::TagExists(_))
    }
}
