//! CaptureSink for capturing output in tests
//!
//! A [`ChannelSink`] that records every line together with the channel it
//! was written to, instead of writing to the standard streams.

use std::sync::{Arc, Mutex};

use sevlog_core::Channel;
use strip_ansi_escapes::strip_str;

use crate::console::{ChannelSink, style_lines};

/// A sink that captures output for testing
///
/// Clones share one buffer, so a clone can be handed to a
/// [`Logger`](crate::Logger) while the original is kept for assertions.
pub struct CaptureSink {
    buffer: Arc<Mutex<CaptureBuffer>>,
    styled: bool,
}

#[derive(Debug, Default)]
struct CaptureBuffer {
    /// Lines with ANSI codes stripped
    lines: Vec<(Channel, String)>,
    /// Lines as written
    raw_lines: Vec<(Channel, String)>,
    writes: usize,
}

impl CaptureSink {
    /// Create a sink that captures plain text
    #[must_use]
    pub fn new() -> Self {
        Self::new_inner(false)
    }

    /// Create a sink that styles lines the way the console would before
    /// capturing them
    #[must_use]
    pub fn new_styled() -> Self {
        Self::new_inner(true)
    }

    fn new_inner(styled: bool) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(CaptureBuffer::default())),
            styled,
        }
    }

    /// All captured lines in write order (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, line)| line).collect()
    }

    /// All captured lines with their channel (ANSI codes stripped)
    #[must_use]
    pub fn entries(&self) -> Vec<(Channel, String)> {
        self.buffer
            .lock()
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    /// All captured lines as written, with any ANSI codes
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.raw_lines.iter().map(|(_, line)| line.clone()).collect())
            .unwrap_or_default()
    }

    /// Lines written to one channel
    #[must_use]
    pub fn lines_on(&self, channel: Channel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line)
            .collect()
    }

    /// Lines that would land on stderr
    #[must_use]
    pub fn stderr_lines(&self) -> Vec<String> {
        self.stream_lines(true)
    }

    /// Lines that would land on stdout
    #[must_use]
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stream_lines(false)
    }

    fn stream_lines(&self, error_stream: bool) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(c, _)| c.is_error_stream() == error_stream)
            .map(|(_, line)| line)
            .collect()
    }

    /// Number of `write_line` calls received
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.buffer.lock().map(|b| b.writes).unwrap_or_default()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual,
            expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected,
            actual,
            self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.lines.clear();
            buf.raw_lines.clear();
            buf.writes = 0;
        }
    }

    /// Print output for debugging (in tests)
    pub fn debug_print(&self) {
        eprintln!("=== CaptureSink Output ===");
        for (i, (channel, line)) in self.entries().iter().enumerate() {
            eprintln!("{:3} [{channel}]: {line}", i + 1);
        }
        eprintln!("==========================");
    }
}

impl ChannelSink for CaptureSink {
    fn write_line(&self, channel: Channel, text: &str) {
        let raw = if self.styled {
            style_lines(channel, text)
        } else {
            text.to_string()
        };

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.writes += 1;
            buffer
                .raw_lines
                .extend(raw.split('\n').map(|line| (channel, line.to_string())));
            let stripped = strip_str(&raw);
            buffer
                .lines
                .extend(stripped.split('\n').map(|line| (channel, line.to_string())));
        }
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CaptureSink {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            styled: self.styled,
        }
    }
}

impl std::fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSink")
            .field("styled", &self.styled)
            .field("line_count", &self.output().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_with_channel() {
        let sink = CaptureSink::new();
        sink.write_line(Channel::Error, "error:    boom");
        sink.write_line(Channel::Info, "info:     ok");
        assert_eq!(
            sink.entries(),
            [
                (Channel::Error, "error:    boom".to_string()),
                (Channel::Info, "info:     ok".to_string()),
            ]
        );
        assert_eq!(sink.stderr_lines(), ["error:    boom"]);
        assert_eq!(sink.stdout_lines(), ["info:     ok"]);
    }

    #[test]
    fn test_multi_line_writes_split() {
        let sink = CaptureSink::new();
        sink.write_line(Channel::Info, "a\nb\nc");
        sink.assert_line_count(3);
        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_styled_output_is_stripped() {
        let sink = CaptureSink::new_styled();
        sink.write_line(Channel::Warn, "warning:  careful");
        assert_eq!(sink.output(), ["warning:  careful"]);
        assert!(sink.raw_output()[0].contains("\u{1b}["));
    }

    #[test]
    fn test_contains_case_insensitive() {
        let sink = CaptureSink::new();
        sink.write_line(Channel::Plain, "Hello World");
        assert!(sink.contains("hello"));
        assert!(sink.contains_all(&["HELLO", "world"]));
        sink.assert_not_contains("error");
    }

    #[test]
    fn test_matches_regex() {
        let sink = CaptureSink::new();
        sink.write_line(Channel::Info, "info:     code 42");
        assert!(sink.matches(r"^info:\s+code \d+$"));
        assert!(!sink.matches(r"code [a-z]+"));
        assert!(!sink.matches(r"("));
    }

    #[test]
    fn test_clone_shares_buffer() {
        let sink = CaptureSink::new();
        let clone = sink.clone();
        clone.write_line(Channel::Debug, "x");
        assert_eq!(sink.lines_on(Channel::Debug), ["x"]);
        sink.clear();
        assert!(clone.output().is_empty());
        assert_eq!(clone.write_count(), 0);
    }
}
