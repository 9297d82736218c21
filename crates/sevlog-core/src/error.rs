//! Error types for sevlog operations.
//!
//! Every error here is a contract violation by the caller: a malformed
//! taxonomy, a level name that does not exist, or a bad truncation limit.
//! Serialization and rendering never fail.

/// Classifies a [`LogError`] without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogErrorKind {
    /// Malformed or missing level taxonomy.
    Config,
    /// A level name that is not part of the taxonomy.
    UnknownLevel,
    /// An argument outside the accepted domain (e.g. a non-finite limit).
    InvalidArgument,
}

/// Error raised by level registry construction, level lookup and truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The level taxonomy is malformed or empty.
    Config(String),
    /// The named level does not exist in the taxonomy.
    UnknownLevel(String),
    /// An argument was rejected.
    InvalidArgument(String),
}

/// Result alias for sevlog operations.
pub type LogResult<T> = Result<T, LogError>;

impl LogError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an unknown-level error for the given level name.
    #[must_use]
    pub fn unknown_level(name: impl Into<String>) -> Self {
        Self::UnknownLevel(name.into())
    }

    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LogError::Config(_) => LogErrorKind::Config,
            LogError::UnknownLevel(_) => LogErrorKind::UnknownLevel,
            LogError::InvalidArgument(_) => LogErrorKind::InvalidArgument,
        }
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::Config(msg) => write!(f, "invalid levels configuration: {msg}"),
            LogError::UnknownLevel(name) => write!(f, "invalid level: {name:?}"),
            LogError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(LogError::config("empty").kind(), LogErrorKind::Config);
        assert_eq!(
            LogError::unknown_level("fatal").kind(),
            LogErrorKind::UnknownLevel
        );
        assert_eq!(
            LogError::invalid_argument("NaN").kind(),
            LogErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_error_display() {
        assert!(LogError::config("levels is empty").to_string().contains("levels is empty"));
        assert!(LogError::unknown_level("fatal").to_string().contains("\"fatal\""));
        assert!(LogError::invalid_argument("limit is NaN").to_string().contains("limit is NaN"));
    }

    #[test]
    fn test_error_has_no_source() {
        use std::error::Error;
        assert!(LogError::config("x").source().is_none());
    }
}
