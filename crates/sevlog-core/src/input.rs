//! Values accepted by the logger.
//!
//! [`Input`] is a tagged variant over primitives, shared sequences, shared
//! mappings and opaque records. Sequences and mappings are reference-counted
//! handles ([`SeqRef`], [`MapRef`]) so callers can build shared and cyclic
//! structures; the serializer tracks their identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::logging::targets;

/// Exposes the directly declared fields of an opaque value.
///
/// Implement this for types that should render as a property bag.
///
/// ```ignore
/// struct Point { x: i64, y: i64 }
///
/// impl Record for Point {
///     fn fields(&self) -> Vec<(String, Input)> {
///         vec![("x".into(), self.x.into()), ("y".into(), self.y.into())]
///     }
/// }
/// ```
pub trait Record {
    /// Own fields in declaration order.
    fn fields(&self) -> Vec<(String, Input)>;
}

/// A value passed to the logger.
#[derive(Clone, Default)]
pub enum Input {
    /// No value present.
    #[default]
    Absent,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(Number),
    /// String.
    String(String),
    /// Shared ordered sequence.
    Seq(SeqRef),
    /// Shared ordered mapping.
    Map(MapRef),
    /// Opaque value serialized through its own fields.
    Record(Rc<dyn Record>),
}

impl Input {
    /// Builds a fresh mapping from key/value pairs.
    #[must_use]
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Input>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = MapRef::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Input::Map(map)
    }

    /// Builds a fresh sequence.
    #[must_use]
    pub fn seq<V, I>(items: I) -> Self
    where
        V: Into<Input>,
        I: IntoIterator<Item = V>,
    {
        Input::Seq(SeqRef::from_iter(items))
    }

    /// Wraps an opaque record.
    #[must_use]
    pub fn record(record: impl Record + 'static) -> Self {
        Input::Record(Rc::new(record))
    }

    /// Wraps an error so that its message (and source chain) is visible.
    #[must_use]
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Input::record(ErrorRecord::capture(err))
    }

    /// Converts any `Serialize` value into a plain tree.
    ///
    /// Values serde cannot represent as JSON become [`Input::Absent`].
    #[must_use]
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Input::from(value),
            Err(e) => {
                log::debug!(target: targets::SERIALIZE, "unserializable input: {e}");
                Input::Absent
            }
        }
    }

    /// True for [`Input::Absent`].
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Input::Absent)
    }

    /// Address of the shared allocation behind sequences, mappings and records.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Input::Seq(seq) => Some(Rc::as_ptr(&seq.0).cast::<()>() as usize),
            Input::Map(map) => Some(Rc::as_ptr(&map.0).cast::<()>() as usize),
            Input::Record(record) => Some(Rc::as_ptr(record).cast::<()>() as usize),
            _ => None,
        }
    }
}

// Cyclic inputs make a derived Debug recurse forever; only show the top level.
impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Absent => f.write_str("Absent"),
            Input::Null => f.write_str("Null"),
            Input::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Input::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Input::String(s) => f.debug_tuple("String").field(s).finish(),
            Input::Seq(seq) => seq.fmt(f),
            Input::Map(map) => map.fmt(f),
            Input::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// Shared handle to a mutable sequence.
#[derive(Clone, Default)]
pub struct SeqRef(Rc<RefCell<Vec<Input>>>);

impl SeqRef {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push(&self, value: impl Into<Input>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Input> {
        self.0.borrow().clone()
    }
}

impl<V: Into<Input>> FromIterator<V> for SeqRef {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())))
    }
}

impl fmt::Debug for SeqRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeqRef(len={})", self.len())
    }
}

/// Shared handle to a mutable, insertion-ordered mapping.
#[derive(Clone, Default)]
pub struct MapRef(Rc<RefCell<Vec<(String, Input)>>>);

impl MapRef {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the original position of an existing key.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Input>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Input> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Input)> {
        self.0.borrow().clone()
    }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.0.borrow().iter().map(|(k, _)| k.clone()).collect();
        f.debug_struct("MapRef").field("keys", &keys).finish()
    }
}

/// Record view of an error: its message and, recursively, its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    message: String,
    source: Option<Box<ErrorRecord>>,
}

impl ErrorRecord {
    /// Captures the message and source chain of `err`.
    #[must_use]
    pub fn capture(err: &(dyn std::error::Error + '_)) -> Self {
        Self {
            message: err.to_string(),
            source: err.source().map(|source| Box::new(Self::capture(source))),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Record for ErrorRecord {
    fn fields(&self) -> Vec<(String, Input)> {
        let mut fields = vec![("message".to_string(), Input::from(self.message.as_str()))];
        if let Some(source) = &self.source {
            fields.push(("source".to_string(), Input::record((**source).clone())));
        }
        fields
    }
}

/// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// Integral doubles become integers so they print as `1`, not `1.0`;
// non-finite doubles have no JSON form and become null.
fn from_f64(n: f64) -> Input {
    if !n.is_finite() {
        return Input::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Input::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Input::Null, Input::Number)
}

fn from_number(n: Number) -> Input {
    match n.as_f64() {
        Some(f) if n.is_f64() => from_f64(f),
        _ => Input::Number(n),
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Input::Null,
            Value::Bool(b) => Input::Bool(b),
            Value::Number(n) => from_number(n),
            Value::String(s) => Input::String(s),
            Value::Array(items) => Input::seq(items),
            Value::Object(entries) => Input::map(entries),
        }
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Input::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Input {
                fn from(n: $ty) -> Self {
                    Input::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Input {
    fn from(n: f64) -> Self {
        from_f64(n)
    }
}

impl From<f32> for Input {
    fn from(n: f32) -> Self {
        from_f64(f64::from(n))
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::String(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::String(s)
    }
}

impl From<&String> for Input {
    fn from(s: &String) -> Self {
        Input::String(s.clone())
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Absent, Into::into)
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(items: Vec<T>) -> Self {
        Input::seq(items)
    }
}

impl From<SeqRef> for Input {
    fn from(seq: SeqRef) -> Self {
        Input::Seq(seq)
    }
}

impl From<MapRef> for Input {
    fn from(map: MapRef) -> Self {
        Input::Map(map)
    }
}

impl From<ErrorRecord> for Input {
    fn from(record: ErrorRecord) -> Self {
        Input::record(record)
    }
}

/// Builds a `Vec<Input>` from heterogeneous expressions.
///
/// ```ignore
/// let values = values!["message", 42, serde_json::json!({ "a": 1 })];
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Input>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Input::from($value)),+]
    };
}
