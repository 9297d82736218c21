//! Testing utilities for sevlog output
//!
//! Provides `CaptureSink` for capturing and asserting on channel output in tests.

mod capture_sink;

pub use capture_sink::CaptureSink;
