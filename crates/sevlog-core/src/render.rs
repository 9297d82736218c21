//! Label-prefixed text rendering.
//!
//! Rendering is pure: it produces text and never writes it anywhere.

use crate::item::Item;
use crate::level::LevelSpec;

/// Renders `items` under `label` if the gate passed.
///
/// Returns `None` when `gate` is false, which is distinct from rendering
/// an empty item list (`Some("")`).
#[must_use]
pub fn render(gate: bool, label: &str, items: &[Item]) -> Option<String> {
    gate.then(|| render_lines(label, items))
}

/// Renders `items` at `level` if it is at least as severe as `threshold`.
#[must_use]
pub fn render_level(level: &LevelSpec, threshold: &LevelSpec, items: &[Item]) -> Option<String> {
    render(level.passes(threshold), level.label(), items)
}

/// Prefixes every line of every item with `label` and a space.
///
/// Lines break on `\n` and `\r\n`; the output is joined with `\n`.
#[must_use]
pub fn render_lines(label: &str, items: &[Item]) -> String {
    let mut lines = Vec::new();
    for item in items {
        let text = item.to_text();
        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            // Only a `\r` directly before a `\n` belongs to the line break
            let line = if segments.peek().is_some() {
                segment.strip_suffix('\r').unwrap_or(segment)
            } else {
                segment
            };
            lines.push(format!("{label} {line}"));
        }
    }
    lines.join("\n")
}
