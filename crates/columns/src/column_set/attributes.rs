use crate::{
    column::{Column, arg::{ArgColumn, AttributeTable}, params::ColumnParams},
    column_set::DiscoveredColumn,
    compiler::Projection,
    error::{ColumnError, ManagerError},
    manager::{QueryRequest, TableManager},
    sql_column::SqlColumn,
};
use model::core::value::Value;
use planner::query::{
    ast::{common::JoinKind, expr::{BinaryOperator, Expr}},
    builder::select::SelectBuilder,
    qualified,
    renderer::render_sql,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Output name of the probe's key column.
const KEY_OUTPUT: &str = "key";
/// Alias of the embedded table query inside the probe.
const DATA_ALIAS: &str = "data";

/// One column per attribute key found in the sets the selected rows point to.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSetColumnSet {
    pub column: SqlColumn,
    /// Falls back to the manager's attribute table when unset.
    pub attributes: Option<AttributeTable>,
    pub title: Option<String>,
}

impl ArgSetColumnSet {
    pub fn new(column: impl Into<SqlColumn>) -> Self {
        ArgSetColumnSet {
            column: column.into(),
            attributes: None,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeTable) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.column.id())
    }

    /// SQL listing the distinct keys of the attribute sets referenced by
    /// `table_query`, which must project the set id as the owner field.
    pub fn probe_sql(&self, table_query: &str, manager: &dyn TableManager) -> String {
        let attrs = self.attribute_table(manager);
        let key = qualified(&attrs.table, &attrs.key_field);
        let probe = SelectBuilder::new()
            .distinct()
            .select(vec![Expr::Alias {
                expr: Box::new(key.clone()),
                alias: KEY_OUTPUT.to_string(),
            }])
            .from_subquery(table_query, DATA_ALIAS)
            .join(
                JoinKind::Inner,
                planner::table_ref!(attrs.table),
                None,
                Expr::binary(
                    qualified(&attrs.table, &attrs.owner_field),
                    BinaryOperator::Eq,
                    qualified(DATA_ALIAS, &attrs.owner_field),
                ),
            )
            .order_by(key, None)
            .build();
        render_sql(&probe, manager.dialect())
    }

    fn attribute_table<'a>(&'a self, manager: &'a dyn TableManager) -> &'a AttributeTable {
        self.attributes.as_ref().unwrap_or_else(|| manager.attributes())
    }

    pub async fn discover(&self, manager: &dyn TableManager) -> Result<Vec<DiscoveredColumn>, ColumnError> {
        let attributes = self.attribute_table(manager);
        let projection = Projection::new(attributes.owner_field.as_str(), self.column.clone());
        let table_query = manager.get_sql_query(&[projection])?;
        let sql = self.probe_sql(&table_query, manager);

        info!(column = %self.column, table = %attributes.table, "Probing attribute keys");
        let result = manager.query(QueryRequest::probe(sql)).await?;
        if result.column_index(KEY_OUTPUT).is_none() {
            return Err(ManagerError::MissingColumn(KEY_OUTPUT.to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut discovered = Vec::new();
        for value in result.column(KEY_OUTPUT) {
            let key = match value {
                Value::String(key) => key,
                other => {
                    warn!("Skipping attribute key of type {}", other.kind());
                    continue;
                }
            };
            if !seen.insert(key.as_str()) {
                debug!(key = %key, "Duplicate attribute key in probe result");
                continue;
            }

            let params = ColumnParams {
                title: self.title.as_ref().map(|title| format!("{title}[{key}]")),
                ..Default::default()
            };
            discovered.push(DiscoveredColumn::column(
                key.as_str(),
                Column::Arg(ArgColumn::new(self.column.clone(), key.as_str(), attributes, params)),
            ));
        }

        info!(column = %self.column, keys = discovered.len(), "Discovered attribute keys");
        Ok(discovered)
    }
}
