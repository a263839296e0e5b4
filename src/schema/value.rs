//! Value representations
//!
//! - builtin: `serde_json::Value`, the JSON-safe wire form
//! - model: [`Value`], the rich in-memory form
//! - presence: [`Slot`], separating "not supplied" from "explicitly null"

use chrono::{DateTime, Utc};

use super::model::Model;

/// Builtin (JSON-safe) representation of a single value
pub type Builtin = serde_json::Value;

/// Ordered builtin mapping, as consumed by `create` and produced by `dump`
pub type BuiltinMap = serde_json::Map<String, serde_json::Value>;

/// A value in model representation.
///
/// Null is not a `Value`; it lives one level up as `Slot::Null` for fields and
/// as `None` for list items.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    /// Homogeneous sequence, `None` items are nulls
    List(Vec<Option<Value>>),
    Model(Model),
}

impl Value {
    /// Builds a list value from items that are all non-null.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(|item| Some(item.into())).collect())
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Model(_) => "model",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Option<Value>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Value::Model(m) => Some(m),
            _ => None,
        }
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

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Model> for Value {
    fn from(m: Model) -> Self {
        Value::Model(m)
    }
}

/// Three-way presence of a field value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    /// No value was supplied
    #[default]
    Missing,
    /// Explicitly null
    Null,
    Present(Value),
}

impl Slot {
    pub fn is_missing(&self) -> bool {
        matches!(self, Slot::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Null)
    }

    /// Returns the value, if one is present
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for Slot {
    fn from(v: Value) -> Self {
        Slot::Present(v)
    }
}

impl From<Option<Value>> for Slot {
    fn from(v: Option<Value>) -> Self {
        match v {
            Some(v) => Slot::Present(v),
            None => Slot::Null,
        }
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Slot::Present(s.into())
    }
}

impl From<String> for Slot {
    fn from(s: String) -> Self {
        Slot::Present(s.into())
    }
}

impl From<i32> for Slot {
    fn from(i: i32) -> Self {
        Slot::Present(i.into())
    }
}

impl From<i64> for Slot {
    fn from(i: i64) -> Self {
        Slot::Present(i.into())
    }
}

impl From<f64> for Slot {
    fn from(f: f64) -> Self {
        Slot::Present(f.into())
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Slot::Present(b.into())
    }
}

impl From<DateTime<Utc>> for Slot {
    fn from(dt: DateTime<Utc>) -> Self {
        Slot::Present(dt.into())
    }
}

impl From<Model> for Slot {
    fn from(m: Model) -> Self {
        Slot::Present(m.into())
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn builtin_type_name(value: &Builtin) -> &'static str {
    match value {
        Builtin::Null => "null",
        Builtin::Bool(_) => "boolean",
        Builtin::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Builtin::String(_) => "string",
        Builtin::Array(_) => "list",
        Builtin::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_is_not_null() {
        assert_ne!(Slot::Missing, Slot::Null);
        assert_ne!(Slot::Missing, Slot::from(""));
        assert_eq!(Slot::default(), Slot::Missing);
    }

    #[test]
    fn test_option_none_is_null() {
        assert_eq!(Slot::from(None::<Value>), Slot::Null);
        assert_eq!(Slot::from(Some(Value::from(3))), Slot::Present(Value::Integer(3)));
    }

    #[test]
    fn test_list_helper_wraps_items() {
        let list = Value::list(["a", "b"]);
        assert_eq!(
            list.as_list().map(|items| items.len()),
            Some(2)
        );
        assert_eq!(list.type_name(), "list");
    }

    #[test]
    fn test_builtin_type_names() {
        assert_eq!(builtin_type_name(&json!(null)), "null");
        assert_eq!(builtin_type_name(&json!(1)), "integer");
        assert_eq!(builtin_type_name(&json!(1.5)), "float");
        assert_eq!(builtin_type_name(&json!("x")), "string");
        assert_eq!(builtin_type_name(&json!([])), "list");
        assert_eq!(builtin_type_name(&json!({})), "mapping");
    }
}
