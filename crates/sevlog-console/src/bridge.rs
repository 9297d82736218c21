//! `log` crate bridge.
//!
//! [`SevLogger`] installs a [`Logger`] as the global `log` backend, so
//! `log::warn!` and friends come out with sevlog labels and channels.
//!
//! ```ignore
//! use sevlog_console::{LoggerConfig, bridge::SevLogger};
//!
//! SevLogger::console(LoggerConfig::from_env())?.init()?;
//! log::warn!("disk almost full");   // "warning:  disk almost full" on stderr
//! ```
//!
//! Records from sevlog's own targets are ignored so diagnostics emitted
//! while logging never re-enter the logger.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use sevlog_core::logging::is_internal_target;
use sevlog_core::{Input, LogResult};

use crate::config::LoggerConfig;
use crate::console::{ChannelSink, ConsoleSink};
use crate::logger::Logger;

/// Global `log` backend wrapping a [`Logger`].
pub struct SevLogger<S = ConsoleSink> {
    inner: Mutex<Logger<S>>,
}

impl SevLogger<ConsoleSink> {
    /// Build a console-backed bridge from a config.
    ///
    /// # Errors
    ///
    /// Returns the error [`Logger::from_config`] reports.
    pub fn console(config: LoggerConfig) -> LogResult<Self> {
        Ok(Self::new(Logger::from_config(config)?))
    }
}

impl<S: ChannelSink + Send + 'static> SevLogger<S> {
    /// Wrap an existing logger.
    #[must_use]
    pub fn new(logger: Logger<S>) -> Self {
        Self {
            inner: Mutex::new(logger),
        }
    }

    /// Most verbose `log` filter this logger lets through.
    #[must_use]
    pub fn max_level(&self) -> LevelFilter {
        let Ok(logger) = self.inner.lock() else {
            return LevelFilter::Off;
        };
        [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error]
            .into_iter()
            .find(|level| logger.is_enabled(sevlog_level(&*logger, *level)))
            .map_or(LevelFilter::Off, |level| level.to_level_filter())
    }

    /// Run `f` against the wrapped logger; `None` if the lock is poisoned.
    pub fn with_logger<R>(&self, f: impl FnOnce(&mut Logger<S>) -> R) -> Option<R> {
        self.inner.lock().ok().map(|mut logger| f(&mut logger))
    }

    /// Install as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let filter = self.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    /// Install as the global logger, ignoring errors if already set.
    pub fn try_init(self) {
        let _ = self.init();
    }
}

/// Level name a `log` record is written at.
///
/// Falls back to the default level when the taxonomy lacks the mapped name.
fn sevlog_level<S: ChannelSink>(logger: &Logger<S>, level: Level) -> &str {
    let name = match level {
        Level::Error => "error",
        Level::Warn => "warning",
        Level::Info => "info",
        Level::Debug | Level::Trace => "debug",
    };
    if logger.registry().contains(name) {
        name
    } else {
        logger.default_level().name()
    }
}

impl<S: ChannelSink + Send + 'static> Log for SevLogger<S> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if is_internal_target(metadata.target()) {
            return false;
        }
        self.inner
            .lock()
            .is_ok_and(|logger| logger.is_enabled(sevlog_level(&*logger, metadata.level())))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Formatting runs user Display code, which may log again; the lock
        // must not be held while it runs.
        let message = Input::from(record.args().to_string());

        let Ok(mut logger) = self.inner.lock() else {
            return;
        };
        let level = sevlog_level(&*logger, record.level()).to_string();
        // The level was just resolved against the registry
        let _ = logger.log(&level, [message]);
    }

    fn flush(&self) {}
}

impl<S> std::fmt::Debug for SevLogger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SevLogger").finish_non_exhaustive()
    }
}
