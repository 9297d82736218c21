//! The leveled logger facade.
//!
//! A [`Logger`] owns a level registry, the active threshold and the most
//! recently ingested items. Every call that passes at least one value
//! replaces the stored items; calls with no values reuse them, which is
//! what makes `truncate(..)` followed by `render(level, [])` work.
//!
//! # Example
//!
//! ```ignore
//! use sevlog_console::{Logger, values};
//!
//! let mut logger = Logger::new();
//! logger.info(values!["server started", serde_json::json!({ "port": 8080 })])?;
//!
//! let text = logger
//!     .truncate(10.0, values!["abcdefghijklmnopqrstuvwxyz"])?
//!     .render("info", [])?;
//! assert_eq!(text.as_deref(), Some("info:     abcd...xyz"));
//! ```

use sevlog_core::logging::targets;
use sevlog_core::{
    Input, Item, LevelRegistry, LevelSpec, LogResult, check_limit, render_level, serialize,
    truncate,
};

use crate::config::LoggerConfig;
use crate::console::{ChannelSink, ConsoleSink};

/// Name of the level `log_default` prefers when the taxonomy defines it.
pub const LOG_LEVEL_NAME: &str = "log";

/// Leveled logger writing to a [`ChannelSink`].
///
/// Not synchronized: share it across threads behind a `Mutex` (as
/// [`SevLogger`](crate::bridge::SevLogger) does).
#[derive(Debug)]
pub struct Logger<S = ConsoleSink> {
    registry: LevelRegistry,
    threshold: LevelSpec,
    default_level: LevelSpec,
    items: Vec<Item>,
    sink: S,
}

impl Logger<ConsoleSink> {
    /// Create a logger with the built-in syslog levels writing to the console.
    #[must_use]
    pub fn new() -> Self {
        let registry = LevelRegistry::syslog();
        let threshold = registry.resolve_default_max().clone();
        let default_level = registry.resolve_default().clone();
        Self {
            registry,
            threshold,
            default_level,
            items: Vec::new(),
            sink: ConsoleSink::new(),
        }
    }

    /// Create a console logger from a config.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`](sevlog_core::LogError::Config) for an
    /// invalid taxonomy and
    /// [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel) if the
    /// configured default or max level is not part of it.
    pub fn from_config(config: LoggerConfig) -> LogResult<Self> {
        let sink = ConsoleSink::with_color(config.color);
        Self::with_sink(config, sink)
    }
}

impl Default for Logger<ConsoleSink> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates one convenience method per built-in level.
macro_rules! level_methods {
    ($($name:ident => $doc:literal),* $(,)?) => {
        $(
            #[doc = $doc]
            ///
            /// # Errors
            ///
            /// Returns [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel)
            /// if the taxonomy has no level of this name.
            pub fn $name(&mut self, values: impl IntoIterator<Item = Input>) -> LogResult<&mut Self> {
                self.log(stringify!($name), values)
            }
        )*
    };
}

impl<S: ChannelSink> Logger<S> {
    /// Create a logger from a config, writing to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`](sevlog_core::LogError::Config) for an
    /// invalid taxonomy and
    /// [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel) if the
    /// configured default or max level is not part of it.
    pub fn with_sink(config: LoggerConfig, sink: S) -> LogResult<Self> {
        let registry = config.registry()?;
        let threshold = match &config.max_level {
            Some(name) => registry.validate(name)?.clone(),
            None => registry.resolve_default_max().clone(),
        };
        let default_level = match &config.default_level {
            Some(name) => registry.validate(name)?.clone(),
            None => registry.resolve_default().clone(),
        };

        log::debug!(
            target: targets::LOGGER,
            "logger ready: {} levels, threshold {}, default {}",
            registry.len(),
            threshold.name(),
            default_level.name()
        );

        Ok(Self {
            registry,
            threshold,
            default_level,
            items: Vec::new(),
            sink,
        })
    }

    // ─────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────

    /// Ingest `values` and, if `level` passes the threshold, write the
    /// rendered text to the level's channel.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel)
    /// if `level` is not part of the taxonomy.
    pub fn log(
        &mut self,
        level: &str,
        values: impl IntoIterator<Item = Input>,
    ) -> LogResult<&mut Self> {
        let spec = self.registry.validate(level)?.clone();
        self.ingest(values);

        match render_level(&spec, &self.threshold, &self.items) {
            Some(text) => self.sink.write_line(spec.channel(), &text),
            None => log::trace!(
                target: targets::LOGGER,
                "{level} suppressed by threshold {}",
                self.threshold.name()
            ),
        }
        Ok(self)
    }

    /// Log at the level named `log` if there is one, else at the default level.
    pub fn log_default(&mut self, values: impl IntoIterator<Item = Input>) -> &mut Self {
        let spec = self
            .registry
            .get(LOG_LEVEL_NAME)
            .unwrap_or(&self.default_level)
            .clone();
        self.ingest(values);
        if let Some(text) = render_level(&spec, &self.threshold, &self.items) {
            self.sink.write_line(spec.channel(), &text);
        }
        self
    }

    /// Ingest `values` and return the text `log` would write, without
    /// writing it. `None` means the level is below the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel)
    /// if `level` is not part of the taxonomy.
    pub fn render(
        &mut self,
        level: &str,
        values: impl IntoIterator<Item = Input>,
    ) -> LogResult<Option<String>> {
        let spec = self.registry.validate(level)?.clone();
        self.ingest(values);
        Ok(render_level(&spec, &self.threshold, &self.items))
    }

    /// Ingest `values`, log them at the default level, and return the
    /// serialized form: the item itself for one value, a sequence for
    /// several, `None` for none.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownLevel`](sevlog_core::LogError::UnknownLevel)
    /// if the default level is not part of the taxonomy.
    pub fn jsonify(&mut self, values: impl IntoIterator<Item = Input>) -> LogResult<Option<Item>> {
        let count = self.ingest(values);
        let level = self.default_level.name().to_string();
        self.log(&level, [])?;

        Ok(match count {
            0 => None,
            1 => self.items.first().cloned(),
            _ => Some(Item::Seq(self.items.clone())),
        })
    }

    /// Ingest `values`, then truncate the stored items in place.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidArgument`](sevlog_core::LogError::InvalidArgument)
    /// if `limit` is not finite.
    pub fn truncate(
        &mut self,
        limit: f64,
        values: impl IntoIterator<Item = Input>,
    ) -> LogResult<&mut Self> {
        // Validated before ingest so a rejected limit leaves the items alone
        check_limit(limit)?;
        self.ingest(values);
        truncate(limit, &mut self.items)?;
        Ok(self)
    }

    level_methods! {
        emerg => "Log at `emerg` (system is unusable).",
        alert => "Log at `alert` (action must be taken immediately).",
        crit => "Log at `crit` (critical conditions).",
        error => "Log at `error` (error conditions).",
        warning => "Log at `warning` (warning conditions).",
        notice => "Log at `notice` (normal but significant condition).",
        info => "Log at `info` (informational messages).",
        debug => "Log at `debug` (debug-level messages).",
    }

    // ─────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────

    /// Whether `level` exists and passes the threshold.
    #[must_use]
    pub fn is_enabled(&self, level: &str) -> bool {
        self.registry
            .get(level)
            .is_some_and(|spec| spec.passes(&self.threshold))
    }

    /// The level taxonomy.
    #[must_use]
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// The active threshold.
    #[must_use]
    pub fn threshold(&self) -> &LevelSpec {
        &self.threshold
    }

    /// The default level.
    #[must_use]
    pub fn default_level(&self) -> &LevelSpec {
        &self.default_level
    }

    /// Level names in definition order.
    #[must_use]
    pub fn level_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// The stored items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The output sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    // Replaces the stored items unless `values` is empty.
    fn ingest(&mut self, values: impl IntoIterator<Item = Input>) -> usize {
        let values: Vec<Input> = values.into_iter().collect();
        if !values.is_empty() {
            self.items = serialize(&values);
        }
        values.len()
    }
}
