use crate::error::BumpkinError;
use crate::hooks::streaming::{run_streaming, shell_command, supervise};
use crate::hooks::{CancelToken, Hook, HookContext, HookFailure, HookResult, OutputBuffer};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where a hook's stdout and stderr go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Straight to the terminal; results carry no output
    #[default]
    Inherit,
    /// Into an [`OutputBuffer`] of this many lines, rendered into the result
    Capture { max_lines: usize },
}

/// What a failing hook does to the rest of its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and report it as an error
    FailClosed,
    /// Run every hook; failures become warnings
    FailOpen,
}

/// Outcome of running a list of hooks
#[derive(Debug, Default)]
pub struct SequenceReport {
    /// One entry per hook that actually ran, in order
    pub results: Vec<HookResult>,
    pub warnings: Vec<String>,
    /// Set only under [`FailurePolicy::FailClosed`]
    pub error: Option<BumpkinError>,
}

impl SequenceReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Executes hook commands through the platform shell
#[derive(Debug, Clone, Copy, Default)]
pub struct HookRunner {
    output_mode: OutputMode,
}

impl HookRunner {
    pub fn new(output_mode: OutputMode) -> Self {
        HookRunner { output_mode }
    }

    /// Run one hook to completion
    ///
    /// The command sees the inherited environment plus the context variables.
    /// A fired `cancel` token kills it.
    pub fn run_hook(&self, hook: &Hook, ctx: &HookContext, cancel: &CancelToken) -> HookResult {
        if hook.is_noop() {
            return HookResult::success(hook.clone(), Duration::ZERO);
        }

        debug!(phase = %hook.phase, command = %hook.command, "running hook");
        let result = match self.output_mode {
            OutputMode::Inherit => run_inherited(hook, ctx, cancel),
            OutputMode::Capture { max_lines } => {
                let buffer = OutputBuffer::new(max_lines);
                let mut result = run_streaming(hook.clone(), ctx, cancel).collect_into(&buffer);
                let output = buffer.render();
                if !output.is_empty() {
                    debug!(command = %hook.command, lines = buffer.line_count(), "captured hook output:\n{}", output);
                }
                result.output = Some(output);
                result
            }
        };

        match &result.error {
            None => debug!(
                command = %hook.command,
                duration_ms = result.duration.as_millis() as u64,
                "hook succeeded"
            ),
            Some(failure) => warn!(command = %hook.command, %failure, "hook failed"),
        }
        result
    }

    /// Run `hooks` in order under `policy`
    pub fn run_sequence(
        &self,
        hooks: &[Hook],
        ctx: &HookContext,
        policy: FailurePolicy,
        cancel: &CancelToken,
    ) -> SequenceReport {
        let mut report = SequenceReport::default();
        if !hooks.is_empty() {
            info!(phase = %hooks[0].phase, count = hooks.len(), ?policy, "running hooks");
        }

        for hook in hooks {
            let result = self.run_hook(hook, ctx, cancel);
            let failure = result.failure_message();
            report.results.push(result);

            if let Some(message) = failure {
                match policy {
                    FailurePolicy::FailClosed => {
                        report.error = Some(BumpkinError::hook(message));
                        break;
                    }
                    FailurePolicy::FailOpen => report.warnings.push(message),
                }
            }
        }

        report
    }
}

fn run_inherited(hook: &Hook, ctx: &HookContext, cancel: &CancelToken) -> HookResult {
    let started = Instant::now();
    let mut child = match shell_command(&hook.command, ctx).spawn() {
        Ok(child) => child,
        Err(e) => {
            return HookResult::failure(
                hook.clone(),
                HookFailure::Spawn(e.to_string()),
                started.elapsed(),
            )
        }
    };

    match supervise(&mut child, cancel) {
        Ok(()) => HookResult::success(hook.clone(), started.elapsed()),
        Err(failure) => HookResult::failure(hook.clone(), failure, started.elapsed()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::hooks::{create_hooks, HookPhase};

    fn capture() -> HookRunner {
        HookRunner::new(OutputMode::Capture { max_lines: 100 })
    }

    fn hooks(commands: &[&str]) -> Vec<Hook> {
        let commands: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
        create_hooks(&commands, HookPhase::PreTag)
    }

    #[test]
    fn test_fail_closed_stops_at_first_failure() {
        let report = capture().run_sequence(
            &hooks(&["echo a", "exit 1", "echo b"]),
            &HookContext::default(),
            FailurePolicy::FailClosed,
            &CancelToken::new(),
        );

        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].succeeded);
        assert!(!report.results[1].succeeded);
        assert!(report.warnings.is_empty());
        let error = report.error.unwrap().to_string();
        assert!(error.contains("hook 'exit 1' failed"), "{}", error);
    }

    #[test]
    fn test_fail_open_runs_everything() {
        let report = capture().run_sequence(
            &hooks(&["echo a", "exit 1", "echo b"]),
            &HookContext::default(),
            FailurePolicy::FailOpen,
            &CancelToken::new(),
        );

        assert_eq!(report.results.len(), 3);
        assert!(report.is_success());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("hook 'exit 1' failed:"));
        assert_eq!(report.results[2].output.as_deref(), Some("[stdout] b"));
    }

    #[test]
    fn test_capture_renders_output() {
        let result = capture().run_hook(
            &Hook::new("echo hello; echo oops >&2", HookPhase::PostTag),
            &HookContext::default(),
            &CancelToken::new(),
        );
        assert!(result.succeeded);
        let output = result.output.unwrap();
        assert!(output.contains("[stdout] hello"));
        assert!(output.contains("[stderr] oops"));
    }

    #[test]
    fn test_inherit_mode_has_no_output() {
        let result = HookRunner::default().run_hook(
            &Hook::new("true", HookPhase::PostPush),
            &HookContext::default(),
            &CancelToken::new(),
        );
        assert!(result.succeeded);
        assert!(result.output.is_none());
    }

    #[test]
    fn test_inherit_mode_reports_exit_code() {
        let result = HookRunner::default().run_hook(
            &Hook::new("exit 7", HookPhase::PreTag),
            &HookContext::default(),
            &CancelToken::new(),
        );
        assert_eq!(result.error, Some(HookFailure::Exit { code: Some(7) }));
    }

    #[test]
    fn test_empty_command_is_noop() {
        let result = capture().run_hook(
            &Hook::new("", HookPhase::PreTag),
            &HookContext::default(),
            &CancelToken::new(),
        );
        assert!(result.succeeded);
        assert_eq!(result.duration, Duration::ZERO);
        assert!(result.output.is_none());
    }

    #[test]
    fn test_context_env_vars_reach_the_hook() {
        let ctx = HookContext {
            version: "1.4.0".to_string(),
            previous_version: "1.3.2".to_string(),
            tag: "v1.4.0".to_string(),
            prefix: "v".to_string(),
            remote: "origin".to_string(),
            commit_hash: "deadbeef".to_string(),
            dry_run: false,
        };
        let result = capture().run_hook(
            &Hook::new(
                "test \"$BUMPKIN_VERSION\" = 1.4.0 && test \"$BUMPKIN_PREVIOUS_VERSION\" = 1.3.2 \
                 && test \"$TAG\" = v1.4.0 && test \"$BUMPKIN_COMMIT\" = deadbeef \
                 && test \"$BUMPKIN_DRY_RUN\" = false",
                HookPhase::PreTag,
            ),
            &ctx,
            &CancelToken::new(),
        );
        assert!(result.succeeded, "{:?}", result);
    }

    #[test]
    fn test_cancelled_token_fails_hook() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let started = Instant::now();
        let report = HookRunner::default().run_sequence(
            &hooks(&["exec sleep 5", "echo never"]),
            &HookContext::default(),
            FailurePolicy::FailClosed,
            &cancel,
        );

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(report.results.len(), 1);
        assert!(report.error.unwrap().to_string().contains("cancelled"));
    }

    #[test]
    fn test_deadline_kills_long_hook() {
        let cancel = CancelToken::with_timeout(Duration::from_millis(100));
        let result = capture().run_hook(
            &Hook::new("exec sleep 5", HookPhase::PreTag),
            &HookContext::default(),
            &cancel,
        );
        assert_eq!(result.error, Some(HookFailure::DeadlineExceeded));
        assert!(result
            .failure_message()
            .unwrap()
            .contains("deadline exceeded"));
    }
}
