use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default number of lines kept per captured hook
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// One line of hook output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputLine {
    pub text: String,
    pub stream: StreamKind,
    pub timestamp: DateTime<Utc>,
}

impl OutputLine {
    pub fn new(text: impl Into<String>, stream: StreamKind) -> Self {
        OutputLine {
            text: text.into(),
            stream,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stream, self.text)
    }
}

/// Bounded, thread-safe ring of output lines
///
/// Once `max_lines` is reached the oldest line is evicted on every append.
/// A buffer with capacity 0 keeps nothing.
#[derive(Debug)]
pub struct OutputBuffer {
    max_lines: usize,
    lines: RwLock<VecDeque<OutputLine>>,
}

impl OutputBuffer {
    pub fn new(max_lines: usize) -> Self {
        OutputBuffer {
            max_lines,
            lines: RwLock::new(VecDeque::with_capacity(max_lines.min(DEFAULT_MAX_LINES))),
        }
    }

    /// Append a line, evicting the oldest ones past capacity
    pub fn add_line(&self, line: OutputLine) {
        if self.max_lines == 0 {
            return;
        }
        let mut lines = self.write();
        lines.push_back(line);
        while lines.len() > self.max_lines {
            lines.pop_front();
        }
    }

    /// Snapshot of the buffered lines, oldest first
    pub fn lines(&self) -> Vec<OutputLine> {
        self.read().iter().cloned().collect()
    }

    pub fn line_count(&self) -> usize {
        self.read().len()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// `[stdout] text` / `[stderr] text` lines joined with newlines
    pub fn render(&self) -> String {
        let snapshot = self.lines();
        snapshot
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // A writer that panicked mid-append leaves a valid deque behind, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<OutputLine>> {
        self.lines.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<OutputLine>> {
        self.lines.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_evicts_oldest_first() {
        let buffer = OutputBuffer::new(3);
        for i in 0..5 {
            buffer.add_line(OutputLine::new(format!("Line {}", i), StreamKind::Stdout));
        }

        assert_eq!(buffer.line_count(), 3);
        let texts: Vec<_> = buffer.lines().into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["Line 2", "Line 3", "Line 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let buffer = OutputBuffer::new(0);
        buffer.add_line(OutputLine::new("dropped", StreamKind::Stderr));
        assert_eq!(buffer.line_count(), 0);
        assert_eq!(buffer.render(), "");
    }

    #[test]
    fn test_render_tags_streams() {
        let buffer = OutputBuffer::new(10);
        buffer.add_line(OutputLine::new("building", StreamKind::Stdout));
        buffer.add_line(OutputLine::new("warning: x", StreamKind::Stderr));

        assert_eq!(buffer.render(), "[stdout] building\n[stderr] warning: x");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(OutputBuffer::default().render(), "");
    }

    #[test]
    fn test_clear() {
        let buffer = OutputBuffer::new(10);
        buffer.add_line(OutputLine::new("a", StreamKind::Stdout));
        buffer.clear();
        assert_eq!(buffer.line_count(), 0);
    }

    #[test]
    fn test_lines_returns_copy() {
        let buffer = OutputBuffer::new(10);
        buffer.add_line(OutputLine::new("a", StreamKind::Stdout));
        let snapshot = buffer.lines();
        buffer.add_line(OutputLine::new("b", StreamKind::Stdout));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_concurrent_writers_respect_capacity() {
        let buffer = Arc::new(OutputBuffer::new(50));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..100 {
                        buffer.add_line(OutputLine::new(format!("{}-{}", t, i), StreamKind::Stdout));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.line_count(), 50);
    }
}
