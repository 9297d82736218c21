#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod bridge; // `log` crate backend
pub mod config;
pub mod console; // Channel sinks
pub mod detection; // Color detection
pub mod logger;
pub mod testing; // Test utilities

pub use crate::bridge::SevLogger;
pub use crate::config::LoggerConfig;
pub use crate::console::{ChannelSink, ConsoleSink};
pub use crate::detection::{ColorChoice, should_enable_color};
pub use crate::logger::Logger;

pub use sevlog_core;
pub use sevlog_core::{
    CIRCULAR_REFERENCE, Channel, ErrorRecord, Input, Item, LevelDef, LevelRegistry, LevelSpec,
    LogError, LogResult, MapRef, Record, SeqRef, values,
};
