use model::{core::value::ValueKind, records::batch::RecordError};
use serde::Serialize;
use thiserror::Error;

/// A cell-scoped rendering failure. It is displayed in place of the value
/// and never aborts the rest of the row.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum RenderError {
    #[error("Wrong type for {role} column {column_id}: {expected} expected, {actual} found")]
    WrongType {
        role: String,
        column_id: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}

impl RenderError {
    pub fn column_id(&self) -> &str {
        match self {
            RenderError::WrongType { column_id, .. } => column_id,
        }
    }
}

/// Errors reported by the table manager while executing a query.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The engine rejected or failed the query.
    #[error("Query failed: {0}")]
    Query(String),

    /// The engine returned a malformed result set.
    #[error("Invalid result: {0}")]
    Result(#[from] RecordError),

    /// An expected output column is missing from the result.
    #[error("Missing output column: {0}")]
    MissingColumn(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

/// Hard errors: composition bugs and failed operations. These always
/// propagate to the caller.
#[derive(Debug, Error)]
pub enum ColumnError {
    /// A joined reference declares no join key.
    #[error("Join on `{table}` has no join key")]
    EmptyJoinKey { table: String },

    /// A reference with an empty table or field name.
    #[error("Invalid column reference: {0}")]
    InvalidReference(String),

    /// Two different references were requested under the same output alias.
    #[error("Output alias `{0}` is bound to two different columns")]
    DuplicateAlias(String),

    /// A query was requested without any output column.
    #[error("Query has no output columns")]
    EmptyProjection,

    /// A primary key column holds a value of the wrong type.
    #[error("{column_id} is expected to be {expected}, got {actual}")]
    PrimaryKeyType {
        column_id: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Table manager error: {0}")]
    Manager(#[from] ManagerError),
}
