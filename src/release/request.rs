use crate::domain::VersionBump;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "v";
pub const DEFAULT_REMOTE: &str = "origin";

/// Hook commands per phase, as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HookCommands {
    pub pre_tag: Vec<String>,
    pub post_tag: Vec<String>,
    pub post_push: Vec<String>,
}

impl HookCommands {
    pub fn is_empty(&self) -> bool {
        self.pre_tag.is_empty() && self.post_tag.is_empty() && self.post_push.is_empty()
    }
}

/// Everything one release attempt needs, built once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub bump: VersionBump,
    /// Tag prefix; empty means [`DEFAULT_PREFIX`]
    pub prefix: String,
    /// Remote name; empty means [`DEFAULT_REMOTE`]
    pub remote: String,
    pub dry_run: bool,
    /// Push the tag after creating it
    pub push: bool,
    pub run_hooks: bool,
    pub hooks: HookCommands,
}

impl ReleaseRequest {
    /// A pushing, hook-running request with default prefix and remote
    pub fn new(bump: VersionBump) -> Self {
        ReleaseRequest {
            bump,
            prefix: DEFAULT_PREFIX.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            dry_run: false,
            push: true,
            run_hooks: true,
            hooks: HookCommands::default(),
        }
    }

    pub fn prefix(&self) -> &str {
        if self.prefix.is_empty() {
            DEFAULT_PREFIX
        } else {
            &self.prefix
        }
    }

    pub fn remote(&self) -> &str {
        if self.remote.is_empty() {
            DEFAULT_REMOTE
        } else {
            &self.remote
        }
    }
}
