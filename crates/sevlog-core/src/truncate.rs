//! Structural truncation of item trees.
//!
//! With a limit `n`:
//! - a string longer than `n` keeps `ceil(n/2 - 1)` leading and
//!   `floor(n/2 - 2)` trailing characters around `"..."`;
//! - a sequence or mapping with more than `n` entries keeps the first
//!   `ceil(n/2) - 1` and the last `floor(n/2)` entries around one `"..."`
//!   marker (a `"...": "..."` entry for mappings).
//!
//! Both halves derive from `n` alone, so very small limits can leave empty
//! halves and results longer than `n`.

use crate::error::{LogError, LogResult};
use crate::item::{ELLIPSIS, Item};
use crate::logging::targets;

/// Rejects limits that are not finite numbers.
///
/// # Errors
///
/// Returns [`LogError::InvalidArgument`] for NaN and infinities.
pub fn check_limit(limit: f64) -> LogResult<()> {
    if limit.is_finite() {
        Ok(())
    } else {
        Err(LogError::invalid_argument(format!(
            "truncation limit must be a finite number, got {limit}"
        )))
    }
}

/// Truncates every item in place.
///
/// The item list itself is not shortened; each item is.
///
/// # Errors
///
/// Returns [`LogError::InvalidArgument`] if `limit` is not finite.
pub fn truncate(limit: f64, items: &mut [Item]) -> LogResult<()> {
    check_limit(limit)?;

    let mut stats = Stats::default();
    for item in items.iter_mut() {
        truncate_item(limit, item, &mut stats);
    }

    log::trace!(
        target: targets::TRUNCATE,
        "limit {limit}: shortened {} strings and {} structures",
        stats.strings,
        stats.structures
    );
    Ok(())
}

#[derive(Debug, Default)]
struct Stats {
    strings: usize,
    structures: usize,
}

fn truncate_item(limit: f64, item: &mut Item, stats: &mut Stats) {
    match item {
        Item::String(s) => {
            if let Some(short) = truncate_str(limit, s) {
                *s = short;
                stats.strings += 1;
            }
        }
        Item::Seq(items) => {
            let marker = elide(items, limit, || Item::from(ELLIPSIS));
            if marker.is_some() {
                stats.structures += 1;
            }
            for (i, child) in items.iter_mut().enumerate() {
                if Some(i) != marker {
                    truncate_item(limit, child, stats);
                }
            }
        }
        Item::Map(entries) => {
            let marker = elide(entries, limit, || (ELLIPSIS.to_string(), Item::from(ELLIPSIS)));
            if marker.is_some() {
                stats.structures += 1;
            }
            for (i, (_, child)) in entries.iter_mut().enumerate() {
                if Some(i) != marker {
                    truncate_item(limit, child, stats);
                }
            }
        }
        Item::Absent | Item::Circular | Item::Null | Item::Bool(_) | Item::Number(_) => {}
    }
}

/// Shortens `s` if it has more than `limit` characters.
#[must_use]
pub fn truncate_str(limit: f64, s: &str) -> Option<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() as f64 <= limit {
        return None;
    }

    let left = count((limit / 2.0 - 1.0).ceil()).min(chars.len());
    let right = count((limit / 2.0 - 2.0).floor()).min(chars.len() - left);

    let mut out = String::with_capacity(left + right + ELLIPSIS.len());
    out.extend(&chars[..left]);
    out.push_str(ELLIPSIS);
    out.extend(&chars[chars.len() - right..]);
    Some(out)
}

// Replaces the middle of `entries` with one marker when there are more than
// `limit` of them. Returns the marker's index.
fn elide<T>(entries: &mut Vec<T>, limit: f64, marker: impl FnOnce() -> T) -> Option<usize> {
    let len = entries.len();
    if len as f64 <= limit {
        return None;
    }

    let head = count((limit / 2.0).ceil() - 1.0).min(len);
    let tail = count((limit / 2.0).floor()).min(len - head);

    drop(entries.splice(head..len - tail, std::iter::once(marker())));
    Some(head)
}

fn count(n: f64) -> usize {
    if n <= 0.0 { 0 } else { n as usize }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seq(range: std::ops::RangeInclusive<i64>) -> Item {
        Item::Seq(range.map(Item::from).collect())
    }

    #[test]
    fn test_string_truncation() {
        let mut items = vec![Item::from("abcdefghijklmnopqrstuvwxyz")];
        truncate(10.0, &mut items).unwrap();
        assert_eq!(items[0].as_str(), Some("abcd...xyz"));
    }

    #[test]
    fn test_string_at_limit_untouched() {
        assert_eq!(truncate_str(10.0, "abcdefghij"), None);
        assert_eq!(truncate_str(10.0, "abcdefghijk").as_deref(), Some("abcd...ijk"));
    }

    #[test]
    fn test_tiny_limits_keep_formula() {
        assert_eq!(truncate_str(1.0, "abcdef").as_deref(), Some("..."));
        assert_eq!(truncate_str(2.0, "abcdef").as_deref(), Some("..."));
        assert_eq!(truncate_str(4.0, "abcdef").as_deref(), Some("a..."));
        assert_eq!(truncate_str(6.0, "abcdefg").as_deref(), Some("ab...g"));
    }

    #[test]
    fn test_string_counts_characters() {
        let text = "ααααααααααββββββββββ";
        assert_eq!(truncate_str(10.0, text).as_deref(), Some("αααα...βββ"));
    }

    #[test]
    fn test_sequence_truncation() {
        let mut items = vec![seq(1..=11)];
        truncate(10.0, &mut items).unwrap();
        assert_eq!(items[0].to_json(), json!([1, 2, 3, 4, "...", 7, 8, 9, 10, 11]));
    }

    #[test]
    fn test_sequence_at_limit_untouched() {
        let mut items = vec![seq(1..=10)];
        truncate(10.0, &mut items).unwrap();
        assert_eq!(items[0], seq(1..=10));
    }

    #[test]
    fn test_mapping_truncation() {
        let entries = ('a'..='k')
            .zip(1_i64..)
            .map(|(k, v)| (k.to_string(), Item::from(v)))
            .collect();
        let mut items = vec![Item::Map(entries)];
        truncate(10.0, &mut items).unwrap();
        assert_eq!(
            items[0].keys(),
            ["a", "b", "c", "d", "...", "g", "h", "i", "j", "k"]
        );
        assert_eq!(items[0].get("...").and_then(Item::as_str), Some("..."));
        assert_eq!(items[0].get("g").and_then(Item::as_i64), Some(7));
    }

    #[test]
    fn test_nested_strings_truncated() {
        let mut items = vec![
            Item::from("abcdefghijklmnopqrstuvwxyz"),
            Item::Map(vec![("value".into(), Item::from("abcdefghijklmnopqrstuvwxyz"))]),
        ];
        truncate(10.0, &mut items).unwrap();
        assert_eq!(items[0].as_str(), Some("abcd...xyz"));
        assert_eq!(items[1].get("value").and_then(Item::as_str), Some("abcd...xyz"));
    }

    #[test]
    fn test_kept_elements_recurse() {
        let inner = Item::Seq(vec![seq(1..=5), Item::from("0123456789")]);
        let mut items = vec![inner];
        truncate(4.0, &mut items).unwrap();
        assert_eq!(items[0].to_json(), json!([[1, "...", 4, 5], "0..."]));
    }

    #[test]
    fn test_markers_survive_tiny_limits() {
        let mut items = vec![seq(1..=5)];
        truncate(1.0, &mut items).unwrap();
        assert_eq!(items[0].to_json(), json!(["..."]));
    }

    #[test]
    fn test_item_list_not_shortened() {
        let mut items: Vec<Item> = (1_i64..=20).map(Item::from).collect();
        truncate(3.0, &mut items).unwrap();
        assert_eq!(items.len(), 20);
    }

    #[test]
    fn test_circular_marker_untouched() {
        let mut items = vec![Item::Circular];
        truncate(4.0, &mut items).unwrap();
        assert!(items[0].is_circular());
    }

    #[test]
    fn test_non_finite_limit_rejected() {
        let mut items = vec![Item::from("abc")];
        for limit in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = truncate(limit, &mut items).unwrap_err();
            assert!(matches!(err, LogError::InvalidArgument(_)));
        }
    }
}
