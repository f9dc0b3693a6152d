//! Cooperative cancellation for running hooks.
//!
//! A [`CancelToken`] is a shared flag with an optional deadline. Runners poll
//! it while a child process is alive and kill the child once it fires. The CLI
//! sets the flag from a Ctrl+C handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{BumpkinError, Result};
use crate::hooks::HookFailure;

/// Why a token fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    Cancelled,
    DeadlineExceeded,
}

impl From<CancelCause> for HookFailure {
    fn from(cause: CancelCause) -> Self {
        match cause {
            CancelCause::Cancelled => HookFailure::Cancelled,
            CancelCause::DeadlineExceeded => HookFailure::DeadlineExceeded,
        }
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag; the deadline is fixed per clone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that only fires when [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also fires once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    /// Same flag, with `deadline` attached.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some()
    }

    /// An explicit cancel wins over an expired deadline.
    pub fn cause(&self) -> Option<CancelCause> {
        if self.flag.load(Ordering::SeqCst) {
            return Some(CancelCause::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelCause::DeadlineExceeded),
            _ => None,
        }
    }

    /// Cancel this token when the process receives SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already registered for the process.
    pub fn cancel_on_ctrlc(&self) -> Result<()> {
        let flag = Arc::clone(&self.flag);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| BumpkinError::hook(format!("cannot install Ctrl-C handler: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert_eq!(token.cause(), None);
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.cause(), Some(CancelCause::Cancelled));
    }

    #[test]
    fn test_expired_deadline() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert_eq!(token.cause(), Some(CancelCause::DeadlineExceeded));
    }

    #[test]
    fn test_future_deadline_not_fired() {
        let token = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_explicit_cancel_wins_over_deadline() {
        let token = CancelToken::new().with_deadline(Instant::now());
        token.cancel();
        assert_eq!(token.cause(), Some(CancelCause::Cancelled));
    }

    #[test]
    fn test_cause_maps_to_hook_failure() {
        assert_eq!(HookFailure::from(CancelCause::Cancelled), HookFailure::Cancelled);
        assert_eq!(
            HookFailure::from(CancelCause::DeadlineExceeded),
            HookFailure::DeadlineExceeded
        );
    }
}
