//! Process exit codes.

use crate::error::BumpkinError;
use crate::release::{ReleaseError, ReleasePhase};
use thiserror::Error;

/// Exit status reported by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    /// Git operation failed, push failed, or anything not listed below
    GeneralError = 1,
    InvalidArgs = 2,
    NotGitRepo = 3,
    /// The repository has no commits yet
    NoCommits = 4,
    UserCancelled = 5,
    HookFailed = 6,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Status for an error raised outside the release phases
    pub fn for_error(err: &BumpkinError) -> Self {
        match err {
            BumpkinError::Git(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                ExitStatus::NoCommits
            }
            BumpkinError::Version(_) => ExitStatus::InvalidArgs,
            BumpkinError::Hook(_) => ExitStatus::HookFailed,
            _ => ExitStatus::GeneralError,
        }
    }

    pub fn for_release_error(err: &ReleaseError) -> Self {
        match err.phase() {
            ReleasePhase::PreTagHooks | ReleasePhase::PostTagHooks => ExitStatus::HookFailed,
            _ => Self::for_error(err.cause()),
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// An error that carries an exit status
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub status: ExitStatus,
    pub message: String,
}

impl ExitError {
    pub fn new(status: ExitStatus, message: impl Into<String>) -> Self {
        ExitError {
            status,
            message: message.into(),
        }
    }
}

/// Exit status for an error surfaced at the binary's edge
pub fn exit_status(err: &anyhow::Error) -> ExitStatus {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.status;
    }
    if let Some(release) = err.downcast_ref::<ReleaseError>() {
        return ExitStatus::for_release_error(release);
    }
    if let Some(bumpkin) = err.downcast_ref::<BumpkinError>() {
        return ExitStatus::for_error(bumpkin);
    }
    ExitStatus::GeneralError
}
