use crate::{
    cell::{
        Cell, CellAction, CellContent, EntityRef, copy_action, empty_cell, standard_actions,
        standard_filters, wrong_type,
    },
    column::params::ColumnParams,
    entity::{EntityStyle, EntityTable},
    error::ColumnError,
    filter::{Filter, FilterOp},
    sql_column::{SourceTable, SqlColumn},
};
use model::{
    core::value::{Value, ValueKind},
    records::row::RowData,
};
use std::sync::Arc;
use tracing::debug;

/// A foreign key into an entity table that has no display name. Renders
/// as a link labelled with the id.
#[derive(Debug, Clone, PartialEq)]
pub struct IdRefColumn {
    pub column: SqlColumn,
    pub table: String,
    pub params: ColumnParams,
}

impl IdRefColumn {
    pub fn new(column: SqlColumn, table: impl Into<String>, params: ColumnParams) -> Self {
        IdRefColumn {
            column,
            table: table.into(),
            params,
        }
    }

    pub(crate) fn render(&self, row: &RowData) -> Cell {
        let value = row.get_value(&self.column.id());
        match value {
            Value::Null => empty_cell(&self.column),
            Value::Int(id) => {
                let target = EntityRef {
                    table: self.table.clone(),
                    id,
                };
                let mut actions = vec![CellAction::Navigate {
                    target: target.clone(),
                }];
                actions.extend(standard_actions(&self.column, &value));
                Cell::new(CellContent::Link {
                    label: id.to_string(),
                    target,
                })
                .with_actions(actions)
            }
            other => wrong_type("id", &self.column, ValueKind::Int, &other),
        }
    }
}

/// Values an entity column reads from one row.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFields {
    pub id: Value,
    pub name: Value,
    pub secondary_id: Value,
    /// The id as seen from the joined table. Null when the reference
    /// dangles.
    pub target_id: Value,
}

/// A foreign key into a named entity table, displayed as
/// `name [secondary id]`.
#[derive(Debug, Clone)]
pub struct EntityColumn {
    pub column: SqlColumn,
    pub entity: EntityTable,
    pub params: ColumnParams,
    source: Arc<SourceTable>,
}

impl EntityColumn {
    /// `not_null` promises that every row references an existing entity;
    /// the entity table is then inner joined.
    pub fn new(column: SqlColumn, entity: EntityTable, params: ColumnParams, not_null: bool) -> Self {
        let source = Arc::new(
            SourceTable::new(entity.table.clone())
                .join_on(entity.id_field.clone(), column.clone())
                .inner_join(not_null),
        );
        EntityColumn {
            column,
            entity,
            params,
            source,
        }
    }

    pub fn source(&self) -> &Arc<SourceTable> {
        &self.source
    }

    pub fn name_column(&self) -> Option<SqlColumn> {
        match &self.entity.style {
            EntityStyle::Named { name_field, .. } => Some(self.source.column(name_field.as_str())),
            EntityStyle::IdOnly => None,
        }
    }

    pub fn secondary_column(&self) -> Option<SqlColumn> {
        match &self.entity.style {
            EntityStyle::Named {
                secondary_field: Some(field),
                ..
            } => Some(self.source.column(field.as_str())),
            _ => None,
        }
    }

    pub fn target_id_column(&self) -> SqlColumn {
        self.source.column(self.entity.id_field.as_str())
    }

    pub(crate) fn dependent_columns(&self) -> Vec<SqlColumn> {
        self.name_column()
            .into_iter()
            .chain(self.secondary_column())
            .chain([self.target_id_column()])
            .collect()
    }

    pub fn fields(&self, row: &RowData) -> EntityFields {
        let read = |column: Option<SqlColumn>| {
            column.map_or(Value::Null, |column| row.get_value(&column.id()))
        };
        EntityFields {
            id: row.get_value(&self.column.id()),
            name: read(self.name_column()),
            secondary_id: read(self.secondary_column()),
            target_id: row.get_value(&self.target_id_column().id()),
        }
    }

    pub(crate) fn render(&self, row: &RowData) -> Cell {
        let fields = self.fields(row);
        let id = match fields.id {
            Value::Null => return empty_cell(&self.column),
            Value::Int(id) => id,
            ref other => return wrong_type("id", &self.column, ValueKind::Int, other),
        };

        let name = match &fields.name {
            Value::Null => None,
            Value::String(name) => Some(name.as_str()),
            other => {
                let column = self.name_column().unwrap_or_else(|| self.column.clone());
                return wrong_type("name", &column, ValueKind::String, other);
            }
        };
        let secondary = match &fields.secondary_id {
            Value::Null => None,
            Value::Int(v) => Some(*v),
            other => {
                let column = self.secondary_column().unwrap_or_else(|| self.column.clone());
                return wrong_type("secondary id", &column, ValueKind::Int, other);
            }
        };

        if fields.target_id.is_null() {
            debug!(
                table = %self.entity.table,
                id,
                "Reference from {} does not match any row", self.column
            );
        }

        let label = entity_label(&self.entity.kind, id, name, secondary);
        let target = EntityRef {
            table: self.entity.table.clone(),
            id,
        };
        Cell::new(CellContent::Link {
            label,
            target: target.clone(),
        })
        .with_actions(self.actions(target, &fields))
    }

    fn actions(&self, target: EntityRef, fields: &EntityFields) -> Vec<CellAction> {
        let kind = &self.entity.kind;
        let mut filters = standard_filters(&self.column, &fields.id);
        if let (Some(column), Value::String(_)) = (self.name_column(), &fields.name) {
            filters.push(CellAction::AddFilter {
                label: format!("{kind} name = {}", fields.name),
                filters: vec![Filter::column(column, FilterOp::Eq(fields.name.clone()))],
            });
        }
        if let (Some(column), Value::Int(_)) = (self.secondary_column(), &fields.secondary_id) {
            filters.push(CellAction::AddFilter {
                label: format!("{} = {}", column.name(), fields.secondary_id),
                filters: vec![Filter::column(column, FilterOp::Eq(fields.secondary_id.clone()))],
            });
        }

        vec![
            CellAction::Navigate { target: target.clone() },
            copy_action(format!("Copy {kind} id"), target.id.to_string()),
            CellAction::Submenu {
                label: "Add filter".to_string(),
                actions: filters,
            },
        ]
    }
}

impl PartialEq for EntityColumn {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column && self.params == other.params && self.source == other.source
    }
}

pub fn entity_label(kind: &str, id: i64, name: Option<&str>, secondary: Option<i64>) -> String {
    match (name, secondary) {
        (Some(name), Some(secondary)) => format!("{name} [{secondary}]"),
        (Some(name), None) => name.to_string(),
        (None, Some(secondary)) => format!("{kind} {secondary}"),
        (None, None) => format!("{kind} {id}"),
    }
}

/// The id column of an entity table itself. Ids are always integers, so a
/// value of any other type is a hard error.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKeyColumn {
    pub column: SqlColumn,
    pub table: String,
    pub params: ColumnParams,
}

impl PrimaryKeyColumn {
    pub fn new(column: SqlColumn, table: impl Into<String>, params: ColumnParams) -> Self {
        PrimaryKeyColumn {
            column,
            table: table.into(),
            params,
        }
    }

    pub(crate) fn render(&self, row: &RowData) -> Result<Cell, ColumnError> {
        let value = row.get_value(&self.column.id());
        let id = match value {
            Value::Null => return Ok(empty_cell(&self.column)),
            Value::Int(id) => id,
            ref other => {
                return Err(ColumnError::PrimaryKeyType {
                    column_id: self.column.id(),
                    expected: ValueKind::Int,
                    actual: other.kind(),
                });
            }
        };

        let target = EntityRef {
            table: self.table.clone(),
            id,
        };
        let mut actions = vec![CellAction::ShowDetails {
            target: target.clone(),
        }];
        actions.extend(standard_actions(&self.column, &value));
        Ok(Cell::new(CellContent::Link {
            label: id.to_string(),
            target,
        })
        .with_actions(actions))
    }
}
