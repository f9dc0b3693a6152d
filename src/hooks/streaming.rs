//! Live hook execution.
//!
//! [`run_streaming`] starts the command right away and hands back two
//! channels: one carrying output lines as they are produced, one carrying the
//! single final [`HookResult`]. One thread reads each pipe and a supervisor
//! thread waits for the child, killing it when the [`CancelToken`] fires.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::hooks::{
    CancelToken, Hook, HookContext, HookFailure, HookResult, OutputBuffer, OutputLine, StreamKind,
};

/// Lines buffered between the pipe readers and the consumer
pub const LINE_CHANNEL_CAPACITY: usize = 100;

pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long lines are still collected after the result of a hook arrived
pub const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Handle to a hook running in the background
pub struct StreamingHook {
    hook: Hook,
    /// Output lines in the order each pipe produced them
    ///
    /// Closes once both pipes reach end of file.
    pub lines: Receiver<OutputLine>,
    /// Receives exactly one result
    pub done: Receiver<HookResult>,
}

impl StreamingHook {
    /// Deliver every line to `on_line` and return the final result
    ///
    /// After the result arrives, lines keep flowing until both pipes close.
    /// When a cancelled hook leaves a grandchild holding a pipe open, draining
    /// stops after [`DRAIN_GRACE`].
    pub fn wait<F: FnMut(OutputLine)>(self, mut on_line: F) -> HookResult {
        loop {
            if let Ok(result) = self.done.try_recv() {
                drain_lines(&self.lines, &mut on_line);
                return result;
            }

            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => on_line(line),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.done.recv().unwrap_or_else(|_| {
            HookResult::failure(
                self.hook.clone(),
                HookFailure::Wait("supervisor exited without a result".to_string()),
                Duration::ZERO,
            )
        })
    }

    /// Wait for completion, appending every line to `buffer`
    pub fn collect_into(self, buffer: &OutputBuffer) -> HookResult {
        self.wait(|line| buffer.add_line(line))
    }
}

fn drain_lines<F: FnMut(OutputLine)>(lines: &Receiver<OutputLine>, on_line: &mut F) {
    let deadline = Instant::now() + DRAIN_GRACE;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!("hook pipes still open after grace period, dropping further output");
            return;
        }
        match lines.recv_timeout(remaining) {
            Ok(line) => on_line(line),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// The platform shell invocation for `command`
pub(crate) fn shell_command(command: &str, ctx: &HookContext) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };

    cmd.envs(ctx.to_env_vars());
    cmd
}

/// Poll `child` until it exits or `cancel` fires
///
/// A fired token kills and reaps the child.
pub(crate) fn supervise(child: &mut Child, cancel: &CancelToken) -> Result<(), HookFailure> {
    loop {
        if let Some(cause) = cancel.cause() {
            warn!(pid = child.id(), ?cause, "killing hook process");
            let _ = child.kill();
            let _ = child.wait();
            return Err(cause.into());
        }

        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Ok(()),
            Ok(Some(status)) => return Err(HookFailure::Exit { code: status.code() }),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HookFailure::Wait(e.to_string()));
            }
        }
    }
}

/// Split `pipe` into lines; invalid UTF-8 is replaced rather than dropped
fn spawn_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
    stream: StreamKind,
    tx: SyncSender<OutputLine>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let Some(pipe) = pipe else {
            return;
        };
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let line = match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => OutputLine::new(trim_line_ending(&buf), stream),
                Err(e) => {
                    let _ = tx.send(OutputLine::new(
                        format!("[read error: {}]", e),
                        StreamKind::Stderr,
                    ));
                    break;
                }
            };
            // Consumer went away; stop reading.
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

fn trim_line_ending(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Start `hook` and stream its output
///
/// Blank commands resolve immediately with success and no output.
pub fn run_streaming(hook: Hook, ctx: &HookContext, cancel: &CancelToken) -> StreamingHook {
    let (line_tx, lines) = sync_channel(LINE_CHANNEL_CAPACITY);
    let (done_tx, done) = sync_channel(1);
    let handle = StreamingHook {
        hook: hook.clone(),
        lines,
        done,
    };

    if hook.is_noop() {
        let _ = done_tx.send(HookResult::success(hook, Duration::ZERO));
        return handle;
    }

    let started = Instant::now();
    let spawned = shell_command(&hook.command, ctx)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            let failure = HookFailure::Spawn(e.to_string());
            let _ = done_tx.send(HookResult::failure(hook, failure, started.elapsed()));
            return handle;
        }
    };
    debug!(command = %hook.command, pid = child.id(), "hook started");

    let stdout = spawn_reader(child.stdout.take(), StreamKind::Stdout, line_tx.clone());
    let stderr = spawn_reader(child.stderr.take(), StreamKind::Stderr, line_tx);

    let cancel = cancel.clone();
    thread::spawn(move || {
        let outcome = supervise(&mut child, &cancel);

        // On cancellation a grandchild may still hold the pipes open, so the
        // readers are left to finish on their own.
        let cancelled = matches!(
            outcome,
            Err(HookFailure::Cancelled | HookFailure::DeadlineExceeded)
        );
        if !cancelled {
            let _ = stdout.join();
            let _ = stderr.join();
        }

        let duration = started.elapsed();
        let result = match outcome {
            Ok(()) => HookResult::success(hook, duration),
            Err(failure) => HookResult::failure(hook, failure, duration),
        };
        let _ = done_tx.send(result);
    });

    handle
}
