//! Groups of columns that are only partly known up front.
//!
//! A set offers its initial columns synchronously. Everything else is
//! found by `discover`, which may query the table. Discovered entries can
//! be sets themselves and are expanded one level per call.

use crate::{column::Column, error::ColumnError, manager::TableManager};
use futures::future::try_join_all;

pub mod attributes;
pub mod entity;

use attributes::ArgSetColumnSet;
use entity::EntityColumnSet;

#[derive(Debug, Clone)]
pub enum ColumnSet {
    Entity(EntityColumnSet),
    Attributes(ArgSetColumnSet),
}

#[derive(Debug, Clone)]
pub enum ColumnOrSet {
    Column(Column),
    Set(ColumnSet),
}

#[derive(Debug, Clone)]
pub struct DiscoveredColumn {
    /// Stable name of the entry within its set.
    pub key: String,
    pub column: ColumnOrSet,
}

impl DiscoveredColumn {
    pub fn column(key: impl Into<String>, column: Column) -> Self {
        DiscoveredColumn {
            key: key.into(),
            column: ColumnOrSet::Column(column),
        }
    }

    pub fn set(key: impl Into<String>, set: ColumnSet) -> Self {
        DiscoveredColumn {
            key: key.into(),
            column: ColumnOrSet::Set(set),
        }
    }
}

impl ColumnSet {
    pub fn title(&self) -> String {
        match self {
            ColumnSet::Entity(set) => set.title(),
            ColumnSet::Attributes(set) => set.title(),
        }
    }

    pub fn initial_columns(&self) -> Vec<Column> {
        match self {
            ColumnSet::Entity(set) => set.initial_columns(),
            ColumnSet::Attributes(_) => Vec::new(),
        }
    }

    pub async fn discover(&self, manager: &dyn TableManager) -> Result<Vec<DiscoveredColumn>, ColumnError> {
        match self {
            ColumnSet::Entity(set) => Ok(set.discover()),
            ColumnSet::Attributes(set) => set.discover(manager).await,
        }
    }
}

impl From<Column> for ColumnOrSet {
    fn from(column: Column) -> Self {
        ColumnOrSet::Column(column)
    }
}

impl From<ColumnSet> for ColumnOrSet {
    fn from(set: ColumnSet) -> Self {
        ColumnOrSet::Set(set)
    }
}

/// Discovers several sets concurrently. Results keep the order of `sets`;
/// the first failure aborts the whole call.
pub async fn discover_all(
    sets: &[ColumnSet],
    manager: &dyn TableManager,
) -> Result<Vec<Vec<DiscoveredColumn>>, ColumnError> {
    try_join_all(sets.iter().map(|set| set.discover(manager))).await
}
