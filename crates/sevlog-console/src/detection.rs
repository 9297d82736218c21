//! Color detection
//!
//! Decides whether channel output should be styled, based on explicit
//! choice, environment, and whether the target stream is a terminal.

use std::str::FromStr;

use serde::Deserialize;
use sevlog_core::{Channel, LogError};

/// When to style console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Style only when writing to an attended terminal
    #[default]
    Auto,
    /// Always style
    Always,
    /// Never style
    Never,
}

impl ColorChoice {
    /// Read `SEVLOG_COLOR`; unset or unrecognized values yield `None`
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("SEVLOG_COLOR").ok()?.parse().ok()
    }

    /// Whether output on `channel` should be styled
    #[must_use]
    pub fn should_style(self, channel: Channel) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => should_enable_color(channel),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" | "1" | "true" => Ok(ColorChoice::Always),
            "never" | "0" | "false" => Ok(ColorChoice::Never),
            other => Err(LogError::config(format!("unknown color choice {other:?}"))),
        }
    }
}

/// Determine if color has been disabled by the environment
///
/// Any of `NO_COLOR`, `SEVLOG_PLAIN` or `CI` being set disables color for
/// [`ColorChoice::Auto`]. `SEVLOG_FORCE_COLOR` takes precedence over all three.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
        || std::env::var("SEVLOG_PLAIN").is_ok()
        // CI logs are read by machines more often than by people
        || std::env::var("CI").is_ok()
}

/// Determine if styled output should be used for `channel`
#[must_use]
pub fn should_enable_color(channel: Channel) -> bool {
    // Explicit enable always wins
    if std::env::var("SEVLOG_FORCE_COLOR").is_ok() {
        return true;
    }

    if is_color_disabled() {
        return false;
    }

    if channel.is_error_stream() {
        ::console::user_attended_stderr()
    } else {
        ::console::user_attended()
    }
}
