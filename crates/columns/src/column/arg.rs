use crate::{
    cell::{Cell, CellContent, copy_action, empty_cell, standard_filters},
    column::params::ColumnParams,
    sql_column::{SourceTable, SqlColumn},
};
use model::{core::value::Value, records::row::RowData};
use serde::Deserialize;
use std::sync::Arc;

/// Layout of the key/value attribute table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttributeTable {
    pub table: String,
    /// Column holding the attribute set id rows are grouped by.
    pub owner_field: String,
    pub key_field: String,
    pub display_field: String,
    pub string_field: String,
    pub int_field: String,
    pub real_field: String,
}

impl AttributeTable {
    /// The trace processor's `args` table.
    pub fn args() -> Self {
        AttributeTable {
            table: "args".to_string(),
            owner_field: "arg_set_id".to_string(),
            key_field: "key".to_string(),
            display_field: "display_value".to_string(),
            string_field: "string_value".to_string(),
            int_field: "int_value".to_string(),
            real_field: "real_value".to_string(),
        }
    }

    /// The row of `arg_set_id`'s set holding `key`.
    pub fn source(&self, arg_set_id: SqlColumn, key: &str) -> Arc<SourceTable> {
        Arc::new(
            SourceTable::new(self.table.as_str())
                .join_on(self.owner_field.as_str(), arg_set_id)
                .join_on_literal(self.key_field.as_str(), key),
        )
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self::args()
    }
}

/// The display value of attribute `key` in the set `arg_set_id` points to.
pub fn arg_sql_column(attributes: &AttributeTable, arg_set_id: SqlColumn, key: &str) -> SqlColumn {
    attributes
        .source(arg_set_id, key)
        .column(attributes.display_field.as_str())
}

/// Values an attribute column reads from one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgValues {
    pub display: Value,
    pub string: Value,
    pub int: Value,
    pub real: Value,
}

/// One attribute key of an attribute set.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgColumn {
    pub arg_set_id: SqlColumn,
    pub key: String,
    pub params: ColumnParams,
    display: SqlColumn,
    string: SqlColumn,
    int: SqlColumn,
    real: SqlColumn,
}

impl ArgColumn {
    pub fn new(arg_set_id: SqlColumn, key: impl Into<String>, attributes: &AttributeTable, params: ColumnParams) -> Self {
        let key = key.into();
        let source = attributes.source(arg_set_id.clone(), &key);
        ArgColumn {
            display: source.column(attributes.display_field.as_str()),
            string: source.column(attributes.string_field.as_str()),
            int: source.column(attributes.int_field.as_str()),
            real: source.column(attributes.real_field.as_str()),
            arg_set_id,
            key,
            params,
        }
    }

    pub fn display_column(&self) -> &SqlColumn {
        &self.display
    }

    pub(crate) fn typed_columns(&self) -> Vec<SqlColumn> {
        vec![self.string.clone(), self.int.clone(), self.real.clone()]
    }

    pub fn title(&self) -> String {
        format!("{}[{}]", self.arg_set_id.id(), self.key)
    }

    pub fn values(&self, row: &RowData) -> ArgValues {
        ArgValues {
            display: row.get_value(&self.display.id()),
            string: row.get_value(&self.string.id()),
            int: row.get_value(&self.int.id()),
            real: row.get_value(&self.real.id()),
        }
    }

    pub(crate) fn render(&self, row: &RowData) -> Cell {
        let values = self.values(row);
        if values.display.is_null() {
            return empty_cell(&self.display);
        }

        // Filters target the typed column so numbers compare as numbers.
        let typed = [
            (&self.string, &values.string),
            (&self.int, &values.int),
            (&self.real, &values.real),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_null());

        let mut actions = vec![copy_action("Copy", values.display.display_text())];
        match typed {
            Some((column, value)) => actions.extend(standard_filters(column, value)),
            None => actions.extend(standard_filters(&self.display, &values.display)),
        }
        Cell::new(CellContent::from(&values.display)).with_actions(actions)
    }
}
