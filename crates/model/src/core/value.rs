use crate::core::utils::{encode_hex, quote_sql_string};
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// A single cell value as returned by the query engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Null,
}

/// The runtime type of a [`Value`], used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    Float,
    String,
    Bytes,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        use Value::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Int(v) => v.hash(state),
            // Hash the bits of the float to handle NaN and -0.0 consistently
            Float(v) => v.to_bits().hash(state),
            String(v) => v.hash(state),
            Bytes(v) => v.hash(state),
            Null => {}
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Human-readable text for a cell, as opposed to the SQL literal
    /// produced by `Display`.
    pub fn display_text(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Bytes(_) => "<BLOB>".to_string(),
            Value::Null => "NULL".to_string(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Renders the value as an SQL literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(&quote_sql_string(v)),
            Value::Bytes(v) => write!(f, "X'{}'", encode_hex(v)),
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_sql_literals() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::from("o'clock").to_string(), "'o''clock'");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_string(), "X'dead'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_kind_and_accessors() {
        assert_eq!(Value::Int(1).kind(), ValueKind::Int);
        assert_eq!(Value::from("x").kind().to_string(), "string");
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::Float(7.0).as_i64(), None);
        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Null.display_text(), "NULL");
        assert_eq!(Value::Bytes(vec![1]).display_text(), "<BLOB>");
        assert_eq!(Value::from("name").display_text(), "name");
    }
}
