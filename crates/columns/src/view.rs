use crate::{
    cell::Cell,
    column::Column,
    column_set::ColumnSet,
    compiler::Projection,
    error::ColumnError,
    manager::{QueryRequest, TableManager},
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// The visible columns of a table, in display order.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Appends `column` unless a column with the same key is visible.
    pub fn add(&mut self, column: Column) -> bool {
        let key = column.key();
        if self.columns.iter().any(|c| c.key() == key) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.key() != key);
        self.columns.len() != before
    }

    /// Shows the initial columns of `set`. Returns how many were added.
    pub fn add_initial(&mut self, set: &ColumnSet) -> usize {
        set.initial_columns()
            .into_iter()
            .filter(|column| self.add(column.clone()))
            .count()
    }

    /// Every reference the visible columns read, once each.
    pub fn projections(&self) -> Vec<Projection> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .flat_map(Column::required_columns)
            .filter(|column| seen.insert(column.id()))
            .map(Projection::of)
            .collect()
    }

    /// Fetches and renders the current page.
    pub async fn load(&self, manager: &dyn TableManager) -> Result<RenderedPage, ColumnError> {
        let query = manager.state().page_query(&self.projections())?;
        let result = manager.query(QueryRequest::rows(query.sql)).await?;
        debug!(rows = result.len(), columns = self.columns.len(), "Rendering table page");

        let rows = result
            .rows()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.render(&row))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RenderedPage {
            headers: self.columns.iter().map(Column::title).collect(),
            rows,
        })
    }
}
