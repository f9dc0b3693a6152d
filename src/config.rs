use crate::domain::VersionBump;
use crate::error::{BumpkinError, Result};
use crate::release::{HookCommands, ReleaseRequest, DEFAULT_PREFIX, DEFAULT_REMOTE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked up in the working directory, in order
pub const LOCAL_CONFIG_FILES: &[&str] = &["bumpkin.toml", ".bumpkin.toml"];

/// File written by [`init_config`]
pub const INIT_CONFIG_FILE: &str = ".bumpkin.toml";

/// Starter configuration with the defaults spelled out and example hooks
pub const CONFIG_TEMPLATE: &str = r#"# bumpkin configuration

# Tag prefix (default: "v")
prefix = "v"

# Git remote (default: "origin")
remote = "origin"

# Commands run at each release stage. Hooks see BUMPKIN_VERSION,
# BUMPKIN_PREVIOUS_VERSION, BUMPKIN_TAG, BUMPKIN_PREFIX, BUMPKIN_REMOTE
# and BUMPKIN_COMMIT in their environment.
[hooks]
# Before the tag is created; a failure aborts the release
# pre-tag = ["cargo test", "cargo clippy -- -D warnings"]

# After the tag is created
# post-tag = ["echo "Tagged $BUMPKIN_TAG""]

# After the tag was pushed; failures are reported as warnings
# post-push = ["./scripts/announce.sh"]
"#;

/// Represents the complete configuration for bumpkin.
///
/// ```toml
/// prefix = "v"
/// remote = "origin"
///
/// [hooks]
/// pre-tag = ["cargo test"]
/// post-tag = []
/// post-push = ["./scripts/announce.sh"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub hooks: HookCommands,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: default_prefix(),
            remote: default_remote(),
            hooks: HookCommands::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document; empty prefix or remote fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| BumpkinError::config(format!("Failed to parse config: {}", e)))?;
        if config.prefix.is_empty() {
            config.prefix = default_prefix();
        }
        if config.remote.is_empty() {
            config.remote = default_remote();
        }
        Ok(config)
    }

    /// Overlay the non-empty fields of `other` on top of `self`
    pub fn merge(&self, other: &Config) -> Config {
        let mut merged = self.clone();
        if !other.prefix.is_empty() {
            merged.prefix = other.prefix.clone();
        }
        if !other.remote.is_empty() {
            merged.remote = other.remote.clone();
        }
        if !other.hooks.pre_tag.is_empty() {
            merged.hooks.pre_tag = other.hooks.pre_tag.clone();
        }
        if !other.hooks.post_tag.is_empty() {
            merged.hooks.post_tag = other.hooks.post_tag.clone();
        }
        if !other.hooks.post_push.is_empty() {
            merged.hooks.post_push = other.hooks.post_push.clone();
        }
        merged
    }

    /// A release request seeded with this configuration
    pub fn release_request(&self, bump: VersionBump) -> ReleaseRequest {
        ReleaseRequest {
            prefix: self.prefix.clone(),
            remote: self.remote.clone(),
            hooks: self.hooks.clone(),
            ..ReleaseRequest::new(bump)
        }
    }
}

/// Path of the first configuration file that exists
///
/// Search order:
/// 1. `bumpkin.toml` in `dir`
/// 2. `.bumpkin.toml` in `dir`
/// 3. `<config_dir>/bumpkin/config.toml` in the user config directory
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    LOCAL_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .chain(dirs::config_dir().map(|d| d.join("bumpkin").join("config.toml")))
        .find(|path| path.is_file())
}

/// Write [`CONFIG_TEMPLATE`] to `dir`/.bumpkin.toml
///
/// # Errors
/// * `Config` - a local configuration file already exists, or the write failed
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    if let Some(existing) = LOCAL_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    {
        return Err(BumpkinError::config(format!(
            "{} already exists",
            existing.display()
        )));
    }

    let path = dir.join(INIT_CONFIG_FILE);
    fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| BumpkinError::config(format!("Cannot create {}: {}", path.display(), e)))?;
    Ok(path)
}

/// Loads configuration from file or returns defaults.
///
/// An explicit `config_path` must exist; otherwise the files listed in
/// [`find_config_file`] are tried relative to the current directory.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(Path::new(".")),
    };

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                BumpkinError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&content)
        }
        None => Ok(Config::default()),
    }
}
