//! Logger configuration.
//!
//! `LoggerConfig` gathers everything a [`Logger`](crate::Logger) needs at
//! construction: the level taxonomy, the default level, the threshold and
//! the color choice. It can be built programmatically, from environment
//! variables, or from a TOML/JSON file.

use std::env;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};
use sevlog_core::{LevelDef, LevelRegistry, LogError, LogResult};

use crate::detection::ColorChoice;

/// Construction-time configuration for a logger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Custom taxonomy in definition order (None = built-in syslog levels)
    pub levels: Option<Vec<(String, LevelDef)>>,
    /// Level used by `log_default` and `jsonify` (None = resolve from taxonomy)
    pub default_level: Option<String>,
    /// Active threshold (None = resolve from taxonomy)
    pub max_level: Option<String>,
    /// Console styling
    pub color: ColorChoice,
}

impl LoggerConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `SEVLOG_MAX_LEVEL` | level name | Active threshold |
    /// | `SEVLOG_DEFAULT_LEVEL` | level name | Default level |
    /// | `SEVLOG_COLOR` | auto/always/never | Console styling |
    ///
    /// With `SEVLOG_COLOR` unset or `auto`, styling is also checked per write
    /// against `SEVLOG_FORCE_COLOR`, `NO_COLOR`, `SEVLOG_PLAIN` and `CI`
    /// (see [`is_color_disabled`](crate::detection::is_color_disabled)).
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of this config
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(level) = non_empty_var("SEVLOG_MAX_LEVEL") {
            self.max_level = Some(level);
        }
        if let Some(level) = non_empty_var("SEVLOG_DEFAULT_LEVEL") {
            self.default_level = Some(level);
        }
        if let Some(color) = ColorChoice::from_env() {
            self.color = color;
        }
        self
    }

    /// Parse a TOML document
    ///
    /// ```toml
    /// max_level = "notice"
    ///
    /// [levels.fatal]
    /// value = 0
    /// channel = "error"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if the document is not valid TOML or
    /// does not have the expected shape.
    pub fn from_toml_str(source: &str) -> LogResult<Self> {
        let raw: RawConfig = toml::from_str(source).map_err(|e| LogError::config(e.to_string()))?;
        raw.into_config()
    }

    /// Parse a JSON document with the same shape as the TOML form
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if the document is not valid JSON or
    /// does not have the expected shape.
    pub fn from_json_str(source: &str) -> LogResult<Self> {
        let raw: RawConfig =
            serde_json::from_str(source).map_err(|e| LogError::config(e.to_string()))?;
        raw.into_config()
    }

    /// Load a config file; `.json` files are JSON, anything else TOML
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> LogResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| LogError::config(format!("cannot read {}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        }
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Replace the taxonomy
    #[must_use]
    pub fn with_levels<N, I>(mut self, levels: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, LevelDef)>,
    {
        self.levels = Some(
            levels
                .into_iter()
                .map(|(name, def)| (name.into(), def))
                .collect(),
        );
        self
    }

    /// Set the default level
    #[must_use]
    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Set the threshold
    #[must_use]
    pub fn with_max_level(mut self, level: impl Into<String>) -> Self {
        self.max_level = Some(level.into());
        self
    }

    /// Set the color choice
    #[must_use]
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// Build the level registry this config describes
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if the custom taxonomy is invalid.
    pub fn registry(&self) -> LogResult<LevelRegistry> {
        match &self.levels {
            Some(levels) => LevelRegistry::new(levels.iter().cloned()),
            None => Ok(LevelRegistry::syslog()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    levels: Option<OrderedLevels>,
    #[serde(default, alias = "defaultLevel")]
    default_level: Option<String>,
    #[serde(default, alias = "maxLevel")]
    max_level: Option<String>,
    #[serde(default)]
    color: Option<ColorChoice>,
}

impl RawConfig {
    fn into_config(self) -> LogResult<LoggerConfig> {
        let levels = match self.levels {
            Some(OrderedLevels(levels)) if levels.is_empty() => {
                return Err(LogError::config("levels must not be empty"));
            }
            Some(OrderedLevels(levels)) => Some(levels),
            None => None,
        };
        Ok(LoggerConfig {
            levels,
            default_level: self.default_level,
            max_level: self.max_level,
            color: self.color.unwrap_or_default(),
        })
    }
}

/// Level table that remembers document order
#[derive(Debug)]
struct OrderedLevels(Vec<(String, LevelDef)>);

impl<'de> Deserialize<'de> for OrderedLevels {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelsVisitor;

        impl<'de> Visitor<'de> for LevelsVisitor {
            type Value = OrderedLevels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of level definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut levels = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, def)) = map.next_entry::<String, LevelDef>()? {
                    levels.push((name, def));
                }
                Ok(OrderedLevels(levels))
            }
        }

        deserializer.deserialize_map(LevelsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevlog_core::Channel;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::new();
        assert!(config.levels.is_none());
        assert!(config.max_level.is_none());
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.registry().unwrap().len(), 8);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoggerConfig::new()
            .with_levels([("loud", LevelDef::new(0)), ("quiet", LevelDef::new(1))])
            .with_default_level("quiet")
            .with_max_level("loud")
            .with_color(ColorChoice::Never);

        assert_eq!(config.default_level.as_deref(), Some("quiet"));
        assert_eq!(config.max_level.as_deref(), Some("loud"));
        assert_eq!(config.color, ColorChoice::Never);
        let names: Vec<_> = config.registry().unwrap().names().map(String::from).collect();
        assert_eq!(names, ["loud", "quiet"]);
    }

    #[test]
    fn test_toml_preserves_level_order() {
        let config = LoggerConfig::from_toml_str(
            r#"
            max_level = "trace"
            color = "never"

            [levels.fatal]
            value = 0
            channel = "error"

            [levels.chatty]
            value = 9
            channel = "debug"

            [levels.trace]
            value = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.max_level.as_deref(), Some("trace"));
        assert_eq!(config.color, ColorChoice::Never);
        let registry = config.registry().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["fatal", "chatty", "trace"]);
        assert_eq!(registry.validate("trace").unwrap().channel(), Channel::Plain);
    }

    #[test]
    fn test_json_accepts_camel_case() {
        let config = LoggerConfig::from_json_str(
            r#"{
                "levels": { "a": { "value": 0, "isDefault": true }, "b": { "value": 1 } },
                "maxLevel": "a",
                "defaultLevel": "b"
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_level.as_deref(), Some("a"));
        assert_eq!(config.default_level.as_deref(), Some("b"));
        assert!(config.registry().unwrap().validate("a").unwrap().is_default());
    }

    #[test]
    fn test_bad_shapes_are_config_errors() {
        for source in [
            "levels = 3",
            "levels = []",
            "[levels]",
            "[levels.a]\nchannel = \"info\"",
            "[levels.a]\nvalue = 1\nchannel = \"syslog\"",
            "not = [valid",
        ] {
            let err = LoggerConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, LogError::Config(_)), "{source:?} gave {err:?}");
        }
    }

    #[test]
    fn test_missing_file() {
        let err = LoggerConfig::from_file(Path::new("/nonexistent/sevlog.toml")).unwrap_err();
        assert!(matches!(err, LogError::Config(_)));
    }
}
