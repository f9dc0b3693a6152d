//! Release orchestration
//!
//! [ReleaseOrchestrator] turns a [ReleaseRequest] into a tag, running hooks
//! around tagging and pushing. It returns a [ReleaseResult], or a
//! [ReleaseError] that tells plain failures apart from partial successes.

pub mod orchestrator;
pub mod outcome;
pub mod request;

pub use orchestrator::{ReleaseOrchestrator, ReleaseOutcome, VersionPlan};
pub use outcome::{ReleaseError, ReleasePhase, ReleaseResult};
pub use request::{HookCommands, ReleaseRequest, DEFAULT_PREFIX, DEFAULT_REMOTE};
