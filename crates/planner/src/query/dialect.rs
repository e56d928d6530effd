//! Defines the `Dialect` trait for engine-specific SQL syntax.

use model::core::{utils::encode_hex, value::Value};
use serde::{Deserialize, Serialize};

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table, alias or column name) in the
    /// correct quotation marks for the dialect, escaping embedded quotes.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Renders a value as an inline SQL literal. String values are always
    /// quoted and escaped; nothing is ever embedded raw.
    fn render_literal(&self, value: &Value) -> String;

    /// Returns the name of the dialect (e.g., "SQLite", "PostgreSQL").
    fn name(&self) -> String;
}

fn double_quoted(ident: &str) -> String {
    format!(r#""{}""#, ident.replace('"', r#""""#))
}

/// The dialect of the trace processor's SQLite-based engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        double_quoted(ident)
    }

    fn render_literal(&self, value: &Value) -> String {
        // `Value`'s Display already produces SQLite literals.
        value.to_string()
    }

    fn name(&self) -> String {
        "SQLite".into()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        double_quoted(ident)
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bytes(bytes) => format!("'\\x{}'::bytea", encode_hex(bytes)),
            other => other.to_string(),
        }
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

/// Serializable selector for one of the built-in dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Sqlite,
    Postgres,
}

impl DialectKind {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Sqlite => &Sqlite,
            DialectKind::Postgres => &Postgres,
        }
    }
}
