use crate::error::BumpkinError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Steps of a release, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleasePhase {
    ComputingVersion,
    PreTagHooks,
    Tagging,
    PostTagHooks,
    Pushing,
    PostPushHooks,
    Done,
}

impl ReleasePhase {
    pub fn name(&self) -> &'static str {
        match self {
            ReleasePhase::ComputingVersion => "computing-version",
            ReleasePhase::PreTagHooks => "pre-tag-hooks",
            ReleasePhase::Tagging => "tagging",
            ReleasePhase::PostTagHooks => "post-tag-hooks",
            ReleasePhase::Pushing => "pushing",
            ReleasePhase::PostPushHooks => "post-push-hooks",
            ReleasePhase::Done => "done",
        }
    }
}

impl fmt::Display for ReleasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a release did
///
/// `tag_created` never goes back to false once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseResult {
    pub previous_version: String,
    pub new_version: String,
    pub tag_name: String,
    pub commit_hash: String,
    pub tag_created: bool,
    pub pushed: bool,
    pub hooks_executed: usize,
    pub post_push_warnings: Vec<String>,
}

/// A release that did not complete
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Nothing irreversible happened, or the failure is fatal as is
    #[error("{phase} failed: {source}")]
    Failed {
        phase: ReleasePhase,
        source: BumpkinError,
    },

    /// The tag exists but a later step failed; re-running would hit the existing tag
    #[error("tag {} was created but {phase} failed: {source}", .result.tag_name)]
    PartialSuccess {
        phase: ReleasePhase,
        source: BumpkinError,
        result: Box<ReleaseResult>,
    },
}

impl ReleaseError {
    pub(crate) fn failed(phase: ReleasePhase, source: BumpkinError) -> Self {
        ReleaseError::Failed { phase, source }
    }

    pub fn phase(&self) -> ReleasePhase {
        match self {
            ReleaseError::Failed { phase, .. } | ReleaseError::PartialSuccess { phase, .. } => {
                *phase
            }
        }
    }

    /// The underlying cause
    pub fn cause(&self) -> &BumpkinError {
        match self {
            ReleaseError::Failed { source, .. } | ReleaseError::PartialSuccess { source, .. } => {
                source
            }
        }
    }

    /// The in-progress result of a partial success
    pub fn partial_result(&self) -> Option<&ReleaseResult> {
        match self {
            ReleaseError::PartialSuccess { result, .. } => Some(result),
            ReleaseError::Failed { .. } => None,
        }
    }

    pub fn is_partial_success(&self) -> bool {
        matches!(self, ReleaseError::PartialSuccess { .. })
    }
}
