//! Flat column-name → value records flowing between joiner and aggregator

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Hashable, ordered form of the value for join and group keys.
    ///
    /// NULL has no key: it never joins and never forms a group.
    pub fn key(&self) -> Option<KeyValue> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(KeyValue::Integer(*v)),
            // Fold -0.0 into 0.0 so equal reals hash equally
            Value::Real(v) if *v == 0.0 => Some(KeyValue::Real(0.0f64.to_bits())),
            Value::Real(v) if v.is_nan() => None,
            Value::Real(v) => Some(KeyValue::Real(v.to_bits())),
            Value::Text(v) => Some(KeyValue::Text(v.clone())),
            Value::Date(v) => Some(KeyValue::Date(*v)),
            Value::DateTime(v) => Some(KeyValue::DateTime(*v)),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Value::Null, Value::Integer)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

/// Key form of a non-null [`Value`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Integer(i64),
    Real(u64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&KeyValue> for Value {
    fn from(key: &KeyValue) -> Self {
        match key {
            KeyValue::Integer(v) => Value::Integer(*v),
            KeyValue::Real(bits) => Value::Real(f64::from_bits(*bits)),
            KeyValue::Text(v) => Value::Text(v.clone()),
            KeyValue::Date(v) => Value::Date(*v),
            KeyValue::DateTime(v) => Value::DateTime(*v),
        }
    }
}

/// Anything that exposes named fields to filters
pub trait Fields {
    fn field(&self, name: &str) -> Option<&Value>;
}

/// One merged row: column name → value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Fields for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_has_no_key() {
        assert_eq!(Value::Null.key(), None);
        assert_eq!(Value::Real(f64::NAN).key(), None);
    }

    #[test]
    fn test_signed_zero_keys_match() {
        assert_eq!(Value::Real(-0.0).key(), Value::Real(0.0).key());
    }

    #[test]
    fn test_key_round_trips_to_value() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let key = Value::Date(date).key().unwrap();
        assert_eq!(Value::from(&key), Value::Date(date));
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new().with("id", 7).with("login", "alice");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&Value::Integer(7)));
        assert_eq!(record.get("login").and_then(Value::as_text), Some("alice"));
        assert!(record.get("email").is_none());
    }
}
