//! Serialized item tree.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};

/// Text substituted for a repeated object identity.
pub const CIRCULAR_REFERENCE: &str = "CIRCULAR REFERENCE";

/// Marker used by truncation for elided elements, keys and string middles.
pub const ELLIPSIS: &str = "...";

/// A cycle-free, plain value tree produced by serialization.
///
/// Mappings keep insertion order. [`Item::Absent`] and [`Item::Circular`]
/// are leaf markers distinct from every real value.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// No value present; renders as `undefined` at the top level.
    Absent,
    /// Repeated object identity.
    Circular,
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// String.
    String(String),
    /// Ordered sequence.
    Seq(Vec<Item>),
    /// Ordered mapping.
    Map(Vec<(String, Item)>),
}

impl Item {
    /// True for sequences and mappings.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        matches!(self, Item::Seq(_) | Item::Map(_))
    }

    /// True for [`Item::Absent`].
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Item::Absent)
    }

    /// True for [`Item::Circular`].
    #[must_use]
    pub fn is_circular(&self) -> bool {
        matches!(self, Item::Circular)
    }

    /// String content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Item::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integral number.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Item::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Value of the first mapping entry named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Item> {
        match self {
            Item::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Sequence element at `index`.
    #[must_use]
    pub fn index(&self, index: usize) -> Option<&Item> {
        match self {
            Item::Seq(items) => items.get(index),
            _ => None,
        }
    }

    /// Mapping keys in order; empty for non-mappings.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Item::Map(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Converts to JSON. Absent becomes null, circular becomes its sentinel text.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Item::Absent | Item::Null => Value::Null,
            Item::Circular => Value::String(CIRCULAR_REFERENCE.to_string()),
            Item::Bool(b) => Value::Bool(*b),
            Item::Number(n) => Value::Number(n.clone()),
            Item::String(s) => Value::String(s.clone()),
            Item::Seq(items) => Value::Array(items.iter().map(Item::to_json).collect()),
            Item::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Human-readable text: pretty JSON with two-space indents for
    /// structures, plain text for everything else.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Item::Absent => "undefined".to_string(),
            Item::Circular => CIRCULAR_REFERENCE.to_string(),
            Item::Null => "null".to_string(),
            Item::Bool(b) => b.to_string(),
            Item::Number(n) => n.to_string(),
            Item::String(s) => s.clone(),
            Item::Seq(_) | Item::Map(_) => {
                serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json().to_string())
            }
        }
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Item::Absent | Item::Null => serializer.serialize_unit(),
            Item::Circular => serializer.serialize_str(CIRCULAR_REFERENCE),
            Item::Bool(b) => serializer.serialize_bool(*b),
            Item::Number(n) => n.serialize(serializer),
            Item::String(s) => serializer.serialize_str(s),
            Item::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Item::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::String(s.to_string())
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::Number(Number::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Item)]) -> Item {
        Item::Map(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(Item::Absent.to_text(), "undefined");
        assert_eq!(Item::Null.to_text(), "null");
        assert_eq!(Item::Bool(true).to_text(), "true");
        assert_eq!(Item::from(42_i64).to_text(), "42");
        assert_eq!(Item::from("plain \"text\"").to_text(), "plain \"text\"");
        assert_eq!(Item::Circular.to_text(), "CIRCULAR REFERENCE");
    }

    #[test]
    fn test_structure_text_is_pretty_json() {
        let item = map(&[
            ("a", Item::from(1_i64)),
            ("b", Item::Seq(vec![Item::from("x"), Item::Absent, Item::Circular])),
        ]);
        assert_eq!(
            item.to_text(),
            "{\n  \"a\": 1,\n  \"b\": [\n    \"x\",\n    null,\n    \"CIRCULAR REFERENCE\"\n  ]\n}"
        );
    }

    #[test]
    fn test_empty_structures() {
        assert_eq!(Item::Map(Vec::new()).to_text(), "{}");
        assert_eq!(Item::Seq(Vec::new()).to_text(), "[]");
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let item = map(&[("z", Item::from(1_i64)), ("a", Item::from(2_i64))]);
        assert_eq!(item.to_text(), "{\n  \"z\": 1,\n  \"a\": 2\n}");
        assert_eq!(item.keys(), ["z", "a"]);
    }

    #[test]
    fn test_accessors() {
        let item = map(&[("message", Item::from("foo"))]);
        assert_eq!(item.get("message").and_then(Item::as_str), Some("foo"));
        assert!(item.get("missing").is_none());
        let seq = Item::Seq(vec![Item::from(7_i64)]);
        assert_eq!(seq.index(0).and_then(Item::as_i64), Some(7));
    }

    #[test]
    fn test_to_json() {
        let item = Item::Seq(vec![Item::Absent, Item::Circular]);
        assert_eq!(item.to_json(), serde_json::json!([null, "CIRCULAR REFERENCE"]));
    }
}
