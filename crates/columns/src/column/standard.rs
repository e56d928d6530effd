use crate::{
    cell::{Cell, CellContent, empty_cell, standard_actions, standard_cell, wrong_type},
    column::params::ColumnParams,
    sql_column::SqlColumn,
};
use model::{
    core::value::{Value, ValueKind},
    records::row::RowData,
};

/// A column displaying one value as-is, or as a time value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    pub column: SqlColumn,
    pub params: ColumnParams,
}

impl ValueColumn {
    pub fn new(column: SqlColumn, params: ColumnParams) -> Self {
        ValueColumn { column, params }
    }

    fn value(&self, row: &RowData) -> Value {
        row.get_value(&self.column.id())
    }

    pub(crate) fn render_standard(&self, row: &RowData) -> Cell {
        standard_cell(&self.column, &self.value(row))
    }

    /// Renders an integer nanosecond value with `content`, e.g.
    /// `CellContent::Timestamp`.
    pub(crate) fn render_time(&self, row: &RowData, role: &str, content: fn(i64) -> CellContent) -> Cell {
        match self.value(row) {
            Value::Null => empty_cell(&self.column),
            Value::Int(ns) => {
                Cell::new(content(ns)).with_actions(standard_actions(&self.column, &Value::Int(ns)))
            }
            other => wrong_type(role, &self.column, ValueKind::Int, &other),
        }
    }
}
