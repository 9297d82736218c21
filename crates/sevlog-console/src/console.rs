//! Channel sinks
//!
//! A [`ChannelSink`] is the only place rendered text leaves the logger.
//! [`ConsoleSink`] routes error and warn channels to stderr and everything
//! else to stdout.

use std::io::{self, Write};
use std::sync::Arc;

use ::console::Style;
use sevlog_core::Channel;

use crate::detection::ColorChoice;

/// Destination for rendered log text
pub trait ChannelSink {
    /// Write `text` (possibly several lines) to `channel`
    fn write_line(&self, channel: Channel, text: &str);
}

impl<S: ChannelSink + ?Sized> ChannelSink for &S {
    fn write_line(&self, channel: Channel, text: &str) {
        (**self).write_line(channel, text);
    }
}

impl<S: ChannelSink + ?Sized> ChannelSink for Box<S> {
    fn write_line(&self, channel: Channel, text: &str) {
        (**self).write_line(channel, text);
    }
}

impl<S: ChannelSink + ?Sized> ChannelSink for Arc<S> {
    fn write_line(&self, channel: Channel, text: &str) {
        (**self).write_line(channel, text);
    }
}

/// Sink writing to the process's standard streams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSink {
    color: ColorChoice,
}

impl ConsoleSink {
    /// Create with automatic color detection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit color choice
    #[must_use]
    pub fn with_color(color: ColorChoice) -> Self {
        Self { color }
    }

    /// The configured color choice
    #[must_use]
    pub fn color(&self) -> ColorChoice {
        self.color
    }
}

impl ChannelSink for ConsoleSink {
    fn write_line(&self, channel: Channel, text: &str) {
        let text = if self.color.should_style(channel) {
            style_lines(channel, text)
        } else {
            text.to_string()
        };

        // A closed pipe must not take the program down with it
        if channel.is_error_stream() {
            let _ = writeln!(io::stderr().lock(), "{text}");
        } else {
            let _ = writeln!(io::stdout().lock(), "{text}");
        }
    }
}

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

/// Style for a channel, forced on regardless of terminal detection
#[must_use]
pub fn channel_style(channel: Channel) -> Style {
    let style = match channel {
        Channel::Error => Style::new().red(),
        Channel::Warn => Style::new().yellow(),
        Channel::Info => Style::new(),
        Channel::Debug => Style::new().dim(),
        Channel::Plain => return Style::new(),
    };
    style.force_styling(true)
}

/// Apply the channel style to each line separately
#[must_use]
pub fn style_lines(channel: Channel, text: &str) -> String {
    let style = channel_style(channel);
    text.split('\n')
        .map(|line| style.apply_to(line).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
