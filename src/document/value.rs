//! Tree value representation walked by path expressions.
//!
//! A `Value` is an already-parsed document: nested mappings and sequences
//! with scalar leaves. Any YAML or JSON document deserializes straight into
//! it; scalar mapping keys (`1: a`, `true: b`) become their text form.
//!
//! # Example
//!
//! ```
//! use treewalker::document::value::{Number, Value};
//!
//! let doc: Value = serde_yaml::from_str("name: treewalker\nversion: 2").unwrap();
//! assert!(doc.is_mapping());
//! assert_eq!(
//!     doc.as_mapping().and_then(|m| m.get("version")),
//!     Some(&Value::Number(Number::Integer(2)))
//! );
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Represents numbers (integer or float)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// A node of a parsed document.
///
/// `Null` doubles as the "absent" marker: a mapping lookup that misses and an
/// out-of-range index both produce it, and the walker ends a branch on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An absent or null value
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// A number (integer or float)
    Number(Number),
    /// A string
    String(String),
    /// An ordered sequence of values
    Sequence(Vec<Value>),
    /// Key-value pairs in document order
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Returns true if this value is null.
    ///
    /// # Example
    ///
    /// ```
    /// use treewalker::document::value::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::from(0).is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns true if this value is a sequence.
    ///
    /// # Example
    ///
    /// ```
    /// use treewalker::document::value::Value;
    ///
    /// let seq = Value::Sequence(vec![]);
    /// assert!(seq.is_sequence());
    /// assert!(!Value::from("text").is_sequence());
    /// ```
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(Number::Integer(_)) => "int",
            Value::Number(Number::Float(_)) => "float",
            Value::String(_) => "str",
            Value::Sequence(_) => "list",
            Value::Mapping(_) => "dict",
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML or JSON value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(i))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        // Beyond i64 only a float can hold it.
        Ok(i64::try_from(u)
            .map(Value::from)
            .unwrap_or(Value::from(u as f64)))
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(f))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(s))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((MapKey(key), value)) = map.next_entry::<MapKey, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

/// A mapping key; scalar keys are kept as their text.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E>(self, b: bool) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(b.to_string()))
    }

    fn visit_i64<E>(self, i: i64) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(i.to_string()))
    }

    fn visit_u64<E>(self, u: u64) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(u.to_string()))
    }

    fn visit_f64<E>(self, f: f64) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(Number::Float(f).to_string()))
    }

    fn visit_str<E>(self, s: &str) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey(s))
    }

    fn visit_unit<E>(self) -> Result<MapKey, E>
    where
        E: de::Error,
    {
        Ok(MapKey("null".to_string()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Integer(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(Number::Integer(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}
