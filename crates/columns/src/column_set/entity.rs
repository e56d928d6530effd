use crate::{
    column::Column,
    column_set::{ColumnOrSet, ColumnSet, DiscoveredColumn, attributes::ArgSetColumnSet},
    entity::{EntityTable, FieldKind},
    sql_column::{SourceTable, SqlColumn},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntitySetParams {
    pub title: Option<String>,
    /// Offer the entity column without showing it.
    pub starts_hidden: bool,
    /// Every row references an existing entity.
    pub not_null: bool,
}

/// The columns of the entity a foreign key points to.
#[derive(Debug, Clone)]
pub struct EntityColumnSet {
    pub column: SqlColumn,
    pub entity: EntityTable,
    pub params: EntitySetParams,
}

impl EntityColumnSet {
    pub fn new(column: impl Into<SqlColumn>, entity: EntityTable, params: EntitySetParams) -> Self {
        EntityColumnSet {
            column: column.into(),
            entity,
            params,
        }
    }

    pub fn title(&self) -> String {
        self.params
            .title
            .clone()
            .unwrap_or_else(|| self.column.id())
    }

    fn child_title(&self, key: &str) -> String {
        format!("{}.{key}", self.title())
    }

    /// The column representing the entity itself.
    pub fn entity_column(&self) -> Column {
        let column = if self.entity.is_named() {
            Column::entity(self.column.clone(), self.entity.clone(), self.params.not_null)
        } else {
            Column::id_ref(self.column.clone(), self.entity.table.as_str())
        };
        column.with_title(self.title())
    }

    pub fn initial_columns(&self) -> Vec<Column> {
        if self.params.starts_hidden {
            return Vec::new();
        }
        vec![self.entity_column()]
    }

    /// Lists the entity column, then one entry per described field. Foreign
    /// keys come back as nested sets, expanded only when asked.
    pub fn discover(&self) -> Vec<DiscoveredColumn> {
        let mut discovered = Vec::with_capacity(self.entity.fields.len() + 2);

        if self.entity.is_named() {
            discovered.push(DiscoveredColumn::column(self.entity.kind.as_str(), self.entity_column()));
            discovered.push(DiscoveredColumn::column(
                self.entity.id_label.as_str(),
                Column::primary_key(self.column.clone(), self.entity.table.as_str())
                    .with_title(self.child_title(&self.entity.id_label)),
            ));
        } else {
            discovered.push(DiscoveredColumn::column("id", self.entity_column()));
        }

        let source = Arc::new(
            SourceTable::new(self.entity.table.as_str())
                .join_on(self.entity.id_field.as_str(), self.column.clone())
                .inner_join(self.params.not_null),
        );

        for field in &self.entity.fields {
            let reference = source.column(field.field.as_str());
            let title = self.child_title(&field.key);
            let column = match field.kind {
                FieldKind::Standard => ColumnOrSet::Column(Column::standard(reference).with_title(title)),
                FieldKind::Timestamp => ColumnOrSet::Column(Column::timestamp(reference).with_title(title)),
                FieldKind::Duration => ColumnOrSet::Column(Column::duration(reference).with_title(title)),
                FieldKind::Entity(target) => ColumnOrSet::Set(ColumnSet::Entity(EntityColumnSet::new(
                    reference,
                    target(),
                    EntitySetParams {
                        title: Some(title),
                        ..Default::default()
                    },
                ))),
                FieldKind::ArgSet => ColumnOrSet::Set(ColumnSet::Attributes(
                    ArgSetColumnSet::new(reference).with_title(title),
                )),
            };
            discovered.push(DiscoveredColumn {
                key: field.key.clone(),
                column,
            });
        }

        debug!(
            entity = %self.entity.table,
            count = discovered.len(),
            "Expanded entity columns for {}", self.column
        );
        discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(discovered: &[DiscoveredColumn]) -> Vec<&str> {
        discovered.iter().map(|d| d.key.as_str()).collect()
    }

    #[test]
    fn test_initial_columns() {
        let set = EntityColumnSet::new("utid", EntityTable::thread(), EntitySetParams::default());
        let initial = set.initial_columns();
        assert_eq!(initial.len(), 1);
        assert!(matches!(initial[0], Column::Entity(_)));
        assert_eq!(initial[0].title(), "utid");

        let hidden = EntityColumnSet::new(
            "utid",
            EntityTable::thread(),
            EntitySetParams {
                starts_hidden: true,
                ..Default::default()
            },
        );
        assert!(hidden.initial_columns().is_empty());
    }

    #[test]
    fn test_discover_thread() {
        let set = EntityColumnSet::new(
            "utid",
            EntityTable::thread(),
            EntitySetParams {
                title: Some("thread".to_string()),
                ..Default::default()
            },
        );
        let discovered = set.discover();
        assert_eq!(
            keys(&discovered),
            vec!["thread", "utid", "tid", "name", "start_ts", "end_ts", "upid", "is_main_thread"]
        );

        match &discovered[3].column {
            ColumnOrSet::Column(column) => {
                assert_eq!(column.primary_column().id(), "thread[id=utid].name");
                assert_eq!(column.title(), "thread.name");
            }
            ColumnOrSet::Set(_) => panic!("name is a plain column"),
        }

        match &discovered[6].column {
            ColumnOrSet::Set(ColumnSet::Entity(process)) => {
                assert_eq!(process.column.id(), "thread[id=utid].upid");
                assert_eq!(process.entity.table, "process");
                assert_eq!(process.title(), "thread.upid");
            }
            _ => panic!("upid expands into the process set"),
        }
    }

    #[test]
    fn test_discover_is_stable() {
        let set = EntityColumnSet::new("upid", EntityTable::process(), EntitySetParams::default());
        let first: Vec<String> = set.discover().into_iter().map(|d| d.key).collect();
        let second: Vec<String> = set.discover().into_iter().map(|d| d.key).collect();
        assert_eq!(first, second);
        assert!(first.contains(&"arg_set_id (args)".to_string()));
    }

    #[test]
    fn test_id_only_entity() {
        let set = EntityColumnSet::new("slice_id", EntityTable::slice(), EntitySetParams::default());
        let discovered = set.discover();
        assert_eq!(discovered[0].key, "id");
        assert!(matches!(
            &discovered[0].column,
            ColumnOrSet::Column(Column::IdRef(_))
        ));
    }
}
