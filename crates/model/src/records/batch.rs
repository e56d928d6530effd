use crate::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate output column: {0}")]
    DuplicateColumn(String),
}

/// The result of one query: named columns plus row-major values.
///
/// Column-major access is available through [`QueryResult::column`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, RecordError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(RecordError::DuplicateColumn(name.clone()));
            }
        }

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(RecordError::RowWidth {
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column-major view over one output column. Yields nothing when the
    /// column is unknown.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
        let index = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|i| row.get(i)))
    }

    pub fn row(&self, index: usize) -> Option<RowData> {
        self.rows.get(index).map(|values| self.to_row(values))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowData> + '_ {
        self.rows.iter().map(|values| self.to_row(values))
    }

    fn to_row(&self, values: &[Value]) -> RowData {
        RowData::new(
            self.columns
                .iter()
                .zip(values)
                .map(|(name, value)| FieldValue {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        )
    }
}
