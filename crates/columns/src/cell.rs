//! Rendered cells: what to display plus the actions offered on it.

use crate::{
    error::RenderError,
    filter::{Filter, FilterOp},
    format::{format_duration, format_timestamp},
    sql_column::SqlColumn,
};
use model::core::value::{Value, ValueKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub content: CellContent,
    pub actions: Vec<CellAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellContent {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    /// A blob; only its size is shown.
    Blob(usize),
    /// Nanoseconds since trace start.
    Timestamp(i64),
    /// Nanoseconds.
    Duration(i64),
    Link { label: String, target: EntityRef },
    Error(RenderError),
}

/// One row of an entity table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    pub table: String,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CellAction {
    Navigate { target: EntityRef },
    ShowDetails { target: EntityRef },
    Copy { label: String, text: String },
    AddFilter { label: String, filters: Vec<Filter> },
    Submenu { label: String, actions: Vec<CellAction> },
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Cell {
            content,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = CellAction>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, CellContent::Null)
    }

    pub fn error(&self) -> Option<&RenderError> {
        match &self.content {
            CellContent::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl CellContent {
    pub fn text(&self) -> String {
        match self {
            CellContent::Null => "NULL".to_string(),
            CellContent::Text(text) => text.clone(),
            CellContent::Int(v) => v.to_string(),
            CellContent::Float(v) => v.to_string(),
            CellContent::Blob(len) => format!("<BLOB {len} bytes>"),
            CellContent::Timestamp(ns) => format_timestamp(*ns),
            CellContent::Duration(ns) => format_duration(*ns),
            CellContent::Link { label, .. } => label.clone(),
            CellContent::Error(err) => err.to_string(),
        }
    }
}

impl From<&Value> for CellContent {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(v) => CellContent::Int(*v),
            Value::Float(v) => CellContent::Float(*v),
            Value::String(v) => CellContent::Text(v.clone()),
            Value::Bytes(v) => CellContent::Blob(v.len()),
            Value::Null => CellContent::Null,
        }
    }
}

pub fn copy_action(label: impl Into<String>, text: impl Into<String>) -> CellAction {
    CellAction::Copy {
        label: label.into(),
        text: text.into(),
    }
}

fn filter_action(filter: Filter) -> CellAction {
    CellAction::AddFilter {
        label: filter.label(),
        filters: vec![filter],
    }
}

/// "Add filter" actions for `value` read from `column`. Blobs and
/// non-finite floats, which have no SQL literal, get none.
pub fn standard_filters(column: &SqlColumn, value: &Value) -> Vec<CellAction> {
    let ops = match value {
        Value::Null => vec![FilterOp::IsNull, FilterOp::IsNotNull],
        Value::Float(v) if !v.is_finite() => vec![],
        Value::String(_) => vec![FilterOp::Eq(value.clone()), FilterOp::NotEq(value.clone())],
        Value::Int(_) | Value::Float(_) => vec![
            FilterOp::Eq(value.clone()),
            FilterOp::NotEq(value.clone()),
            FilterOp::Gt(value.clone()),
            FilterOp::GtEq(value.clone()),
            FilterOp::Lt(value.clone()),
            FilterOp::LtEq(value.clone()),
        ],
        Value::Bytes(_) => vec![],
    };
    ops.into_iter()
        .map(|op| filter_action(Filter::column(column.clone(), op)))
        .collect()
}

/// Copy plus standard filters. Null and blob values are not copyable.
pub fn standard_actions(column: &SqlColumn, value: &Value) -> Vec<CellAction> {
    let mut actions = Vec::new();
    if !matches!(value, Value::Null | Value::Bytes(_)) {
        actions.push(copy_action("Copy", value.display_text()));
    }
    actions.extend(standard_filters(column, value));
    actions
}

pub fn standard_cell(column: &SqlColumn, value: &Value) -> Cell {
    Cell::new(CellContent::from(value)).with_actions(standard_actions(column, value))
}

/// The cell shown for a null primary value, whatever the column kind.
pub fn empty_cell(column: &SqlColumn) -> Cell {
    standard_cell(column, &Value::Null)
}

/// A cell reporting that `column` holds a value of the wrong type.
pub fn wrong_type(role: &str, column: &SqlColumn, expected: ValueKind, actual: &Value) -> Cell {
    Cell::new(CellContent::Error(RenderError::WrongType {
        role: role.to_string(),
        column_id: column.id(),
        expected,
        actual: actual.kind(),
    }))
}
