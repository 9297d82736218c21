//! Core types for sevlog.
//!
//! This crate provides the formatting pipeline behind the leveled logger:
//! - [`LevelRegistry`]: the severity taxonomy, labels and defaults
//! - [`serialize()`]: cycle-safe conversion of [`Input`] values into [`Item`] trees
//! - [`truncate()`]: in-place bounding of strings, sequences and mappings
//! - [`render()`]: label-prefixed, multi-line text
//! - [`LogError`]: the error taxonomy
//!
//! Nothing here writes output; see `sevlog-console` for the logger facade
//! and its channel sinks.

#![forbid(unsafe_code)]

mod error;
mod input;
mod item;
mod level;
pub mod logging;
mod render;
mod serialize;
mod truncate;

pub use error::{LogError, LogErrorKind, LogResult};
pub use input::{ErrorRecord, Input, MapRef, Record, SeqRef};
pub use item::{CIRCULAR_REFERENCE, ELLIPSIS, Item};
pub use level::{Channel, LevelDef, LevelRegistry, LevelSpec};
pub use render::{render, render_level, render_lines};
pub use serialize::serialize;
pub use truncate::{check_limit, truncate, truncate_str};
