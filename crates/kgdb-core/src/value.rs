//! The tagged value type stored under the `OBJ` column encoding.
//!
//! Claims, qualifiers and dump-derived metadata don't fit a single
//! scalar type — the source stores them as nested Python objects
//! (dicts, lists, ints, strings). `Value` is the Rust shape of that
//! same nesting, serialized via `rmp-serde` so a claim's qualifiers
//! round-trip without a fixed schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamically-typed value used for `OBJ`-encoded columns (claims,
/// qualifiers, dump sidecar metadata).
///
/// `Map` uses `BTreeMap` rather than a hash map so encoded bytes are
/// stable across runs, which matters for columns that get diffed or
/// hashed for compaction bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value, distinct from an empty string or list.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar, wide enough for any LID or claim count.
    Int(i64),
    /// Floating point scalar (PageRank scores, label similarity).
    Float(f64),
    /// UTF-8 text scalar.
    Text(String),
    /// Ordered sequence of values, e.g. a claim's qualifier list.
    Array(Vec<Value>),
    /// Keyed bag of values, e.g. a claim's qualifier map keyed by PID.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// `true` for `Value::Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow as a string slice, if this is `Value::Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow as an `i64`, if this is `Value::Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as a slice of values, if this is `Value::Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Borrow as a map, if this is `Value::Map`.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reports_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn accessors_return_none_on_type_mismatch() {
        let v = Value::Int(5);
        assert_eq!(v.as_text(), None);
        assert_eq!(v.as_int(), Some(5));
        assert_eq!(v.as_array(), None);
    }

    #[test]
    fn map_is_ordered_by_key() {
        let mut m = BTreeMap::new();
        m.insert("P31".to_string(), Value::Text("Q5".into()));
        m.insert("P21".to_string(), Value::Text("Q6581097".into()));
        let v = Value::Map(m);
        let keys: Vec<&str> = v.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["P21", "P31"]);
    }

    #[test]
    fn nested_array_round_trips_through_msgpack() {
        let v = Value::Array(vec![Value::Int(1), Value::Text("a".into()), Value::Null]);
        let bytes = rmp_serde::to_vec(&v).expect("encode");
        let decoded: Value = rmp_serde::from_slice(&bytes).expect("decode");
        assert_eq!(v, decoded);
    }

    #[test]
    fn from_conversions_build_expected_variants() {
        assert_eq!(Value::from("x"), Value::Text("x".into()));
        assert_eq!(Value::from(3i64), Value::Int(3));
        assert_eq!(Value::from(true), Value::Bool(true));
    }
}
