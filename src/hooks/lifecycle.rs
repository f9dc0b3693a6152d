use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Points in the release workflow where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPhase {
    PreTag,
    PostTag,
    PostPush,
}

impl HookPhase {
    /// Get the phase name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookPhase::PreTag => "pre-tag",
            HookPhase::PostTag => "post-tag",
            HookPhase::PostPush => "post-push",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A shell command bound to a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hook {
    pub command: String,
    pub phase: HookPhase,
}

impl Hook {
    pub fn new(command: impl Into<String>, phase: HookPhase) -> Self {
        Hook {
            command: command.into(),
            phase,
        }
    }

    /// Blank commands succeed without spawning anything
    pub fn is_noop(&self) -> bool {
        self.command.trim().is_empty()
    }
}

/// Bind a list of configured commands to one phase
pub fn create_hooks(commands: &[String], phase: HookPhase) -> Vec<Hook> {
    commands
        .iter()
        .map(|command| Hook::new(command.clone(), phase))
        .collect()
}

/// Context information passed to a hook
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    /// New version without prefix
    pub version: String,
    pub previous_version: String,
    /// Tag name being created or pushed
    pub tag: String,
    pub prefix: String,
    /// Remote repository name
    pub remote: String,
    /// HEAD commit the tag points at
    pub commit_hash: String,
    pub dry_run: bool,
}

impl HookContext {
    /// Convert context to environment variables for the hook command
    ///
    /// Maps context fields to BUMPKIN_* environment variables, plus the
    /// short `VERSION` and `TAG` aliases.
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("BUMPKIN_VERSION".to_string(), self.version.clone());
        env.insert(
            "BUMPKIN_PREVIOUS_VERSION".to_string(),
            self.previous_version.clone(),
        );
        env.insert("BUMPKIN_TAG".to_string(), self.tag.clone());
        env.insert("BUMPKIN_TAG_NAME".to_string(), self.tag.clone());
        env.insert("BUMPKIN_PREFIX".to_string(), self.prefix.clone());
        env.insert("BUMPKIN_REMOTE".to_string(), self.remote.clone());
        env.insert("BUMPKIN_COMMIT".to_string(), self.commit_hash.clone());
        env.insert("BUMPKIN_COMMIT_HASH".to_string(), self.commit_hash.clone());
        env.insert("BUMPKIN_DRY_RUN".to_string(), self.dry_run.to_string());
        env.insert("VERSION".to_string(), self.version.clone());
        env.insert("TAG".to_string(), self.tag.clone());

        env
    }
}

/// Why a hook did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookFailure {
    /// The shell could not be started
    Spawn(String),
    /// Non-zero exit; `code` is None when the process was killed by a signal
    Exit { code: Option<i32> },
    Cancelled,
    DeadlineExceeded,
    /// Waiting on the child failed
    Wait(String),
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookFailure::Spawn(e) => write!(f, "failed to start: {}", e),
            HookFailure::Exit { code: Some(code) } => write!(f, "exit status {}", code),
            HookFailure::Exit { code: None } => write!(f, "terminated by signal"),
            HookFailure::Cancelled => write!(f, "cancelled"),
            HookFailure::DeadlineExceeded => write!(f, "deadline exceeded"),
            HookFailure::Wait(e) => write!(f, "wait failed: {}", e),
        }
    }
}

/// Outcome of a single hook
#[derive(Debug, Clone)]
pub struct HookResult {
    pub hook: Hook,
    pub succeeded: bool,
    pub error: Option<HookFailure>,
    pub duration: Duration,
    /// Rendered output when the runner captured it
    pub output: Option<String>,
}

impl HookResult {
    pub(crate) fn success(hook: Hook, duration: Duration) -> Self {
        HookResult {
            hook,
            succeeded: true,
            error: None,
            duration,
            output: None,
        }
    }

    pub(crate) fn failure(hook: Hook, failure: HookFailure, duration: Duration) -> Self {
        HookResult {
            hook,
            succeeded: false,
            error: Some(failure),
            duration,
            output: None,
        }
    }

    /// `hook '<command>' failed: <cause>`, or None on success
    pub fn failure_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|cause| format!("hook '{}' failed: {}", self.hook.command, cause))
    }
}
