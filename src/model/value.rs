//! Gale value types
//!
//! This module defines the runtime value model produced by evaluation and
//! supplied through the execution context.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Core value type for Gale expressions
///
/// Structured caller data (JSON objects) stays wrapped in [`GaleValue::Json`]
/// so path navigation can walk it lazily; JSON scalars and arrays convert to
/// native variants on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GaleValue {
    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with exact precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Array of values
    Array(Vec<GaleValue>),

    /// Structured JSON value (objects and anything not yet converted)
    Json(JsonValue),

    /// Null value
    Null,
}

impl GaleValue {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            GaleValue::Boolean(_) => "Boolean",
            GaleValue::Integer(_) => "Integer",
            GaleValue::Decimal(_) => "Decimal",
            GaleValue::String(_) => "String",
            GaleValue::Array(_) => "Array",
            GaleValue::Json(value) => match value {
                JsonValue::Object(_) => "Object",
                JsonValue::Array(_) => "Array",
                JsonValue::String(_) => "String",
                JsonValue::Number(_) => "Number",
                JsonValue::Bool(_) => "Boolean",
                JsonValue::Null => "Null",
            },
            GaleValue::Null => "Null",
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            GaleValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            GaleValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get decimal value if this is a decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            GaleValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            GaleValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get array items if this is an array
    pub fn as_array(&self) -> Option<&[GaleValue]> {
        match self {
            GaleValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, GaleValue::Null)
    }
}

impl From<bool> for GaleValue {
    fn from(value: bool) -> Self {
        GaleValue::Boolean(value)
    }
}

impl From<i64> for GaleValue {
    fn from(value: i64) -> Self {
        GaleValue::Integer(value)
    }
}

impl From<Decimal> for GaleValue {
    fn from(value: Decimal) -> Self {
        GaleValue::Decimal(value)
    }
}

impl From<&str> for GaleValue {
    fn from(value: &str) -> Self {
        GaleValue::String(value.to_string())
    }
}

impl From<String> for GaleValue {
    fn from(value: String) -> Self {
        GaleValue::String(value)
    }
}

impl From<Vec<GaleValue>> for GaleValue {
    fn from(value: Vec<GaleValue>) -> Self {
        GaleValue::Array(value)
    }
}

impl From<JsonValue> for GaleValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => GaleValue::Null,
            JsonValue::Bool(b) => GaleValue::Boolean(b),
            JsonValue::Number(ref number) => {
                if let Some(i) = number.as_i64() {
                    GaleValue::Integer(i)
                } else if let Some(f) = number.as_f64() {
                    match Decimal::from_f64_retain(f) {
                        Some(d) => GaleValue::Decimal(d),
                        None => GaleValue::Null,
                    }
                } else {
                    GaleValue::Null
                }
            }
            JsonValue::String(s) => GaleValue::String(s),
            JsonValue::Array(items) => {
                GaleValue::Array(items.into_iter().map(GaleValue::from).collect())
            }
            JsonValue::Object(_) => GaleValue::Json(value),
        }
    }
}

impl fmt::Display for GaleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaleValue::Boolean(b) => write!(f, "{b}"),
            GaleValue::Integer(i) => write!(f, "{i}"),
            GaleValue::Decimal(d) => write!(f, "{d}"),
            GaleValue::String(s) => write!(f, "{s}"),
            GaleValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            GaleValue::Json(value) => write!(f, "{value}"),
            GaleValue::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(GaleValue::Boolean(true).type_name(), "Boolean");
        assert_eq!(GaleValue::Integer(1).type_name(), "Integer");
        assert_eq!(GaleValue::String("a".into()).type_name(), "String");
        assert_eq!(GaleValue::Json(json!({"a": 1})).type_name(), "Object");
        assert_eq!(GaleValue::Null.type_name(), "Null");
    }

    #[test]
    fn test_from_json_converts_scalars_and_arrays() {
        assert_eq!(GaleValue::from(json!(true)), GaleValue::Boolean(true));
        assert_eq!(GaleValue::from(json!(7)), GaleValue::Integer(7));
        assert_eq!(GaleValue::from(json!("hi")), GaleValue::String("hi".into()));
        assert_eq!(GaleValue::from(json!(null)), GaleValue::Null);
        assert_eq!(
            GaleValue::from(json!([1, "two"])),
            GaleValue::Array(vec![GaleValue::Integer(1), GaleValue::String("two".into())])
        );
    }

    #[test]
    fn test_from_json_keeps_objects_wrapped() {
        let value = GaleValue::from(json!({"name": "gale"}));
        assert_eq!(value.type_name(), "Object");
        assert!(matches!(value, GaleValue::Json(JsonValue::Object(_))));
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(GaleValue::String("hello".into()).to_string(), "hello");
        assert_eq!(GaleValue::Integer(42).to_string(), "42");
        assert_eq!(
            GaleValue::Array(vec![GaleValue::Integer(1), GaleValue::Integer(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(GaleValue::Null.to_string(), "null");
    }
}
