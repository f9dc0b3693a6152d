//! Release hooks
//!
//! Shell commands configured per phase run at key workflow points:
//! - pre-tag: before the tag is created; a failure aborts the release
//! - post-tag: after the tag exists locally; a failure leaves a partial release
//! - post-push: after the tag reached the remote; failures are only warnings
//!
//! Hooks run either to completion through [HookRunner] or in the background
//! through [run_streaming], and both honour a [CancelToken].

pub mod buffer;
pub mod cancel;
pub mod executor;
pub mod lifecycle;
pub mod streaming;

pub use buffer::{OutputBuffer, OutputLine, StreamKind};
pub use cancel::{CancelCause, CancelToken};
pub use executor::{FailurePolicy, HookRunner, OutputMode, SequenceReport};
pub use lifecycle::{create_hooks, Hook, HookContext, HookFailure, HookPhase, HookResult};
pub use streaming::{run_streaming, StreamingHook, DRAIN_GRACE, LINE_CHANNEL_CAPACITY};
