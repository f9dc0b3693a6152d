//! Git operations abstraction layer
//!
//! The release engine only talks to git through the [Repository] trait so it
//! can run against a real repository or an in-memory one in tests.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for testing
//!
//! ```rust
//! # use bumpkin::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> bumpkin::Result<()> {
//! if let Some(latest) = repo.latest_tag("v")? {
//!     let commits = repo.commits_since(&latest.tag.name)?;
//!     println!("{} commits since {}", commits.len(), latest.tag.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{latest_version_tag, Tag, VersionTag};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// Full commit message, trimmed
    pub message: String,
    /// First line of the message
    pub subject: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitRecord {
    /// Build a record from a raw message; the subject is its first line
    pub fn new(
        hash: impl Into<String>,
        message: &str,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let message = message.trim().to_string();
        let subject = message.lines().next().unwrap_or("").to_string();
        CommitRecord {
            hash: hash.into(),
            message,
            subject,
            author: author.into(),
            timestamp,
        }
    }

    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

/// First seven characters of a commit hash
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// Git collaborator used by the release engine
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// Implementations map their underlying errors to [crate::error::BumpkinError];
/// a tag name collision must be reported as `TagExists`.
pub trait Repository: Send + Sync {
    /// Every tag in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Commits reachable from HEAD but not from `tag_name`, newest first
    fn commits_since(&self, tag_name: &str) -> Result<Vec<CommitRecord>>;

    /// Every commit reachable from HEAD, newest first
    fn all_commits(&self) -> Result<Vec<CommitRecord>>;

    /// Create an annotated tag at HEAD
    ///
    /// # Returns
    /// * `Err(TagExists)` - If a tag with that name already exists
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, name: &str) -> Result<bool>;

    /// Push a single tag to `remote`
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;

    /// Full hash of the commit at HEAD
    fn head(&self) -> Result<String>;

    /// Highest semver tag whose name starts with `prefix`
    ///
    /// Non-matching and non-semver tags are ignored.
    fn latest_tag(&self, prefix: &str) -> Result<Option<VersionTag>> {
        Ok(latest_version_tag(self.list_tags()?, prefix))
    }
}
