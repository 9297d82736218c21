//! Severity taxonomy.
//!
//! A [`LevelRegistry`] is an ordered set of named levels. Lower values are
//! more severe. Every level carries an output [`Channel`] and a display
//! label padded so that all labels of one registry share a column width.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{LogError, LogResult};
use crate::logging::targets;

/// Output stream class a level's text is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Error stream.
    Error,
    /// Warning stream.
    Warn,
    /// Informational stream.
    Info,
    /// Debug stream.
    Debug,
    /// Untagged output.
    #[default]
    #[serde(alias = "log")]
    Plain,
}

impl Channel {
    /// All channels, most severe first.
    pub const ALL: [Channel; 5] = [
        Channel::Error,
        Channel::Warn,
        Channel::Info,
        Channel::Debug,
        Channel::Plain,
    ];

    /// Lowercase channel name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Error => "error",
            Channel::Warn => "warn",
            Channel::Info => "info",
            Channel::Debug => "debug",
            Channel::Plain => "plain",
        }
    }

    /// True for channels that go to the error stream.
    #[must_use]
    pub fn is_error_stream(&self) -> bool {
        matches!(self, Channel::Error | Channel::Warn)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Channel::Error),
            "warn" | "warning" => Ok(Channel::Warn),
            "info" => Ok(Channel::Info),
            "debug" => Ok(Channel::Debug),
            "plain" | "log" => Ok(Channel::Plain),
            other => Err(LogError::config(format!("unknown channel {other:?}"))),
        }
    }
}

/// User-supplied definition of one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LevelDef {
    /// Severity rank; lower is more severe.
    pub value: i64,
    /// Output channel; `None` means [`Channel::Plain`].
    #[serde(default, alias = "console")]
    pub channel: Option<Channel>,
    /// Marks the default level.
    #[serde(default, alias = "isDefault")]
    pub default: bool,
    /// Marks the default threshold.
    #[serde(default, alias = "defaultMax", alias = "isDefaultMax")]
    pub default_max: bool,
}

impl LevelDef {
    /// Creates a definition with the given rank and no channel.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Sets the output channel.
    #[must_use]
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Flags this level as the default level.
    #[must_use]
    pub fn default_level(mut self) -> Self {
        self.default = true;
        self
    }

    /// Flags this level as the default threshold.
    #[must_use]
    pub fn default_max(mut self) -> Self {
        self.default_max = true;
        self
    }
}

/// A resolved level inside a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSpec {
    name: String,
    value: i64,
    channel: Channel,
    label: String,
    is_default: bool,
    is_default_max: bool,
}

impl LevelSpec {
    /// Level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Severity rank.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Output channel.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Padded display label, e.g. `"info:    "`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the definition flagged this level as default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Whether the definition flagged this level as default threshold.
    #[must_use]
    pub fn is_default_max(&self) -> bool {
        self.is_default_max
    }

    /// True when this level is at least as severe as `threshold`.
    #[must_use]
    pub fn passes(&self, threshold: &LevelSpec) -> bool {
        self.value <= threshold.value
    }
}

const SYSLOG_LEVELS: [(&str, i64, Channel); 8] = [
    ("emerg", 0, Channel::Error),
    ("alert", 1, Channel::Error),
    ("crit", 2, Channel::Error),
    ("error", 3, Channel::Error),
    ("warning", 4, Channel::Warn),
    ("notice", 5, Channel::Info),
    ("info", 6, Channel::Info),
    ("debug", 7, Channel::Debug),
];

/// Ordered severity taxonomy with precomputed labels and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRegistry {
    levels: Vec<LevelSpec>,
    index: HashMap<String, usize>,
    default_level: usize,
    default_max_level: usize,
}

impl LevelRegistry {
    /// Builds a registry from level definitions in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if `defs` is empty, or contains an
    /// empty or duplicated name.
    pub fn new<N, I>(defs: I) -> LogResult<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, LevelDef)>,
    {
        let defs: Vec<(String, LevelDef)> =
            defs.into_iter().map(|(name, def)| (name.into(), def)).collect();
        if defs.is_empty() {
            return Err(LogError::config("levels must not be empty"));
        }

        let width = defs
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);

        let mut levels = Vec::with_capacity(defs.len());
        let mut index = HashMap::with_capacity(defs.len());
        for (name, def) in defs {
            if name.is_empty() {
                return Err(LogError::config("level names must not be empty"));
            }
            if index.contains_key(&name) {
                return Err(LogError::config(format!("duplicate level {name:?}")));
            }
            let label = make_label(&name, width);
            index.insert(name.clone(), levels.len());
            levels.push(LevelSpec {
                name,
                value: def.value,
                channel: def.channel.unwrap_or_default(),
                label,
                is_default: def.default,
                is_default_max: def.default_max,
            });
        }

        let default_level = levels
            .iter()
            .position(|l| l.is_default)
            .unwrap_or_else(|| first_extreme(&levels, |candidate, best| candidate < best));
        let default_max_level = levels
            .iter()
            .position(|l| l.is_default_max)
            .unwrap_or_else(|| first_extreme(&levels, |candidate, best| candidate > best));

        log::debug!(
            target: targets::REGISTRY,
            "built registry with {} levels (default={}, default max={})",
            levels.len(),
            levels[default_level].name,
            levels[default_max_level].name
        );

        Ok(Self {
            levels,
            index,
            default_level,
            default_max_level,
        })
    }

    /// The built-in syslog-like taxonomy, `emerg` (0) through `debug` (7).
    ///
    /// `info` is both the default level and the default threshold.
    #[must_use]
    pub fn syslog() -> Self {
        let defs = SYSLOG_LEVELS.iter().map(|&(name, value, channel)| {
            let def = LevelDef::new(value).channel(channel);
            let def = if name == "info" {
                def.default_level().default_max()
            } else {
                def
            };
            (name, def)
        });
        match Self::new(defs) {
            Ok(registry) => registry,
            Err(_) => unreachable!("built-in taxonomy is valid"),
        }
    }

    /// Builds a registry from a JSON object of level definitions.
    ///
    /// Object key order is the definition order.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if `levels` is not an object, is empty,
    /// or any entry does not have the shape of a [`LevelDef`].
    pub fn from_json(levels: &serde_json::Value) -> LogResult<Self> {
        let map = levels
            .as_object()
            .ok_or_else(|| LogError::config("levels must be an object"))?;
        let mut defs = Vec::with_capacity(map.len());
        for (name, raw) in map {
            let def = LevelDef::deserialize(raw)
                .map_err(|e| LogError::config(format!("level {name:?}: {e}")))?;
            defs.push((name.clone(), def));
        }
        Self::new(defs)
    }

    /// Looks up a level by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LevelSpec> {
        self.index.get(name).map(|&i| &self.levels[i])
    }

    /// Looks up a level by name, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownLevel`] if `name` is not in the registry.
    pub fn validate(&self, name: &str) -> LogResult<&LevelSpec> {
        self.get(name).ok_or_else(|| LogError::unknown_level(name))
    }

    /// Returns true if the registry has a level called `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// First level flagged default, else the first with the lowest value.
    #[must_use]
    pub fn resolve_default(&self) -> &LevelSpec {
        &self.levels[self.default_level]
    }

    /// First level flagged default max, else the first with the highest value.
    #[must_use]
    pub fn resolve_default_max(&self) -> &LevelSpec {
        &self.levels[self.default_max_level]
    }

    /// Levels in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelSpec> {
        self.levels.iter()
    }

    /// Level names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(LevelSpec::name)
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Width shared by every label (longest name plus two).
    #[must_use]
    pub fn label_width(&self) -> usize {
        self.levels
            .first()
            .map(|l| l.label.chars().count())
            .unwrap_or(0)
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::syslog()
    }
}

fn make_label(name: &str, width: usize) -> String {
    let pad = width - name.chars().count() + 1;
    format!("{name}:{}", " ".repeat(pad))
}

// Index of the first level whose value wins `better` against every earlier one.
fn first_extreme(levels: &[LevelSpec], better: impl Fn(i64, i64) -> bool) -> usize {
    let mut best = 0;
    for (i, level) in levels.iter().enumerate().skip(1) {
        if better(level.value, levels[best].value) {
            best = i;
        }
    }
    best
}
