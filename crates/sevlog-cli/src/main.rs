//! sevlog CLI - leveled logging from the command line.
//!
//! Commands:
//! - `log` - Write values at a level through the console channels
//! - `render` - Print the text a level would produce, without routing it
//! - `levels` - List the level taxonomy

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use sevlog_console::{ColorChoice, Logger, LoggerConfig};
use sevlog_core::{Input, LevelRegistry, LogResult};

/// sevlog - Leveled console logging with labels and severity channels.
#[derive(Parser)]
#[command(name = "sevlog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct GlobalOptions {
    /// Level taxonomy file (TOML, or JSON with a .json extension).
    #[arg(long, global = true, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Threshold level; overrides SEVLOG_MAX_LEVEL.
    #[arg(long, global = true, value_name = "NAME")]
    max_level: Option<String>,

    /// Default level; overrides SEVLOG_DEFAULT_LEVEL.
    #[arg(long, global = true, value_name = "NAME")]
    default_level: Option<String>,

    /// Truncate strings, sequences and mappings longer than LIMIT.
    #[arg(long, global = true, value_name = "LIMIT")]
    truncate: Option<f64>,

    /// Take values as plain strings instead of parsing them as JSON.
    #[arg(long, global = true)]
    raw: bool,

    /// When to style output (auto, always, never); overrides SEVLOG_COLOR.
    #[arg(long, global = true, value_name = "WHEN")]
    color: Option<ColorChoice>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log values at a level.
    ///
    /// Error-class levels and warnings go to stderr, everything else to
    /// stdout. Levels below the threshold print nothing.
    Log {
        /// Level name.
        level: String,

        /// Values to log; each is parsed as JSON, falling back to a string.
        values: Vec<String>,
    },

    /// Print the rendered text for a level to stdout.
    ///
    /// Prints nothing when the level is below the threshold.
    Render {
        /// Level name.
        level: String,

        /// Values to render; each is parsed as JSON, falling back to a string.
        values: Vec<String>,
    },

    /// List the level taxonomy.
    Levels,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Log { level, values } => cmd_log(&cli.options, &level, &values),
        Commands::Render { level, values } => cmd_render(&cli.options, &level, &values),
        Commands::Levels => cmd_levels(&cli.options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_log(options: &GlobalOptions, level: &str, values: &[String]) -> LogResult<()> {
    let mut logger = Logger::from_config(load_config(options)?)?;
    let values = parse_values(values, options.raw);
    match options.truncate {
        Some(limit) => logger.truncate(limit, values)?.log(level, [])?,
        None => logger.log(level, values)?,
    };
    Ok(())
}

fn cmd_render(options: &GlobalOptions, level: &str, values: &[String]) -> LogResult<()> {
    let mut logger = Logger::from_config(load_config(options)?)?;
    let values = parse_values(values, options.raw);
    let text = match options.truncate {
        Some(limit) => logger.truncate(limit, values)?.render(level, [])?,
        None => logger.render(level, values)?,
    };
    if let Some(text) = text {
        println!("{text}");
    }
    Ok(())
}

fn cmd_levels(options: &GlobalOptions) -> LogResult<()> {
    let config = load_config(options)?;
    let registry = config.registry()?;
    let logger = Logger::from_config(config)?;
    print!(
        "{}",
        format_levels(&registry, logger.threshold().name(), logger.default_level().name())
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Config from file (if any), then environment, then explicit flags.
fn load_config(options: &GlobalOptions) -> LogResult<LoggerConfig> {
    let base = match &options.levels {
        Some(path) => LoggerConfig::from_file(path)?,
        None => LoggerConfig::new(),
    };
    let mut config = base.with_env_overrides();

    if let Some(level) = &options.max_level {
        config = config.with_max_level(level.as_str());
    }
    if let Some(level) = &options.default_level {
        config = config.with_default_level(level.as_str());
    }
    if let Some(color) = options.color {
        config = config.with_color(color);
    }
    Ok(config)
}

fn parse_values(raw_values: &[String], raw: bool) -> Vec<Input> {
    raw_values
        .iter()
        .map(|value| parse_value(value, raw))
        .collect()
}

/// Parse one argument as JSON, falling back to the literal string.
fn parse_value(value: &str, raw: bool) -> Input {
    if raw {
        return Input::from(value);
    }
    serde_json::from_str::<Value>(value).map_or_else(|_| Input::from(value), Input::from)
}

fn format_levels(registry: &LevelRegistry, threshold: &str, default_level: &str) -> String {
    let width = registry
        .names()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!("{:<width$}  {:>5}  {:<7}  FLAGS\n", "NAME", "VALUE", "CHANNEL");
    for level in registry.iter() {
        let mut flags = Vec::new();
        if level.name() == default_level {
            flags.push("default");
        }
        if level.name() == threshold {
            flags.push("threshold");
        }
        let line = format!(
            "{:<width$}  {:>5}  {:<7}  {}",
            level.name(),
            level.value(),
            level.channel().as_str(),
            flags.join(", ")
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
