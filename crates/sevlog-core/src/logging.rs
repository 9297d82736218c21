//! Internal diagnostics for sevlog.
//!
//! sevlog reports its own activity through the standard [`log`] facade,
//! never through the leveled logger it implements. No backend is bundled;
//! applications pick one (or install `sevlog_console::bridge::SevLogger`).
//!
//! # Log Targets
//!
//! - `sevlog`: Root target for all sevlog diagnostics
//! - `sevlog::registry`: Taxonomy construction and default resolution
//! - `sevlog::serialize`: Input serialization
//! - `sevlog::truncate`: Structural truncation
//! - `sevlog::logger`: Facade dispatch and threshold gating
//!
//! Example filter: `RUST_LOG=sevlog::registry=debug`

pub use log::{debug, trace, warn};

/// Log targets used by sevlog components.
pub mod targets {
    /// Root target for all sevlog diagnostics.
    pub const SEVLOG: &str = "sevlog";

    /// Taxonomy construction and default resolution.
    pub const REGISTRY: &str = "sevlog::registry";

    /// Input serialization.
    pub const SERIALIZE: &str = "sevlog::serialize";

    /// Structural truncation.
    pub const TRUNCATE: &str = "sevlog::truncate";

    /// Facade dispatch and threshold gating.
    pub const LOGGER: &str = "sevlog::logger";
}

/// Returns true when `target` belongs to sevlog's own diagnostics.
#[inline]
#[must_use]
pub fn is_internal_target(target: &str) -> bool {
    target == targets::SEVLOG || target.starts_with("sevlog::") || target.starts_with("sevlog_")
}
