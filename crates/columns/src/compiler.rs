//! Compiles column references into a single SELECT.
//!
//! Every joined reference is reduced to its join identity. Identical join
//! paths share one alias and one JOIN clause, no matter how many columns
//! read through them. Joins are emitted in discovery order, which always
//! places a parent before the joins that depend on it.

use crate::{
    error::ColumnError,
    filter::{Filter, FilterOp, SortSpec},
    sql_column::{JoinValue, SourceTable, SqlColumn},
};
use model::core::value::Value;
use planner::query::{
    ast::{
        common::JoinKind,
        expr::{BinaryOperator, Expr},
        select::{FromSource, Select},
    },
    builder::select::SelectBuilder,
    dialect::Dialect,
    qualified,
    renderer::render_sql,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Alias of the base table in every compiled query.
pub const BASE_ALIAS: &str = "base";

/// What the query reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSource {
    Table(String),
    /// SQL text used as a sub-query.
    Query(String),
}

impl BaseSource {
    fn to_from_source(&self) -> FromSource {
        match self {
            BaseSource::Table(name) => FromSource::Table(planner::table_ref!(name)),
            BaseSource::Query(sql) => FromSource::Subquery(sql.clone()),
        }
    }
}

/// One output column: a reference and the name it is returned under.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub alias: String,
    pub column: SqlColumn,
}

impl Projection {
    pub fn new(alias: impl Into<String>, column: SqlColumn) -> Self {
        Projection {
            alias: alias.into(),
            column,
        }
    }

    /// Projects `column` under its canonical id.
    pub fn of(column: SqlColumn) -> Self {
        Projection {
            alias: column.id(),
            column,
        }
    }
}

/// Everything one query needs besides the base source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectRequest {
    pub projections: Vec<Projection>,
    pub filters: Vec<Filter>,
    pub order_by: Vec<SortSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    /// Output names, in SELECT order.
    pub columns: Vec<String>,
    /// Number of JOIN clauses emitted.
    pub join_count: usize,
}

#[derive(Debug, Clone)]
struct PlannedJoin {
    alias: String,
    table: String,
    on: Expr,
    inner: bool,
}

/// Alias table for one compilation. It is consumed by [`QueryCompiler::compile`]
/// and never shared between queries.
pub struct QueryCompiler<'a> {
    base: BaseSource,
    dialect: &'a dyn Dialect,
    aliases: HashMap<String, usize>,
    joins: Vec<PlannedJoin>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(base: BaseSource, dialect: &'a dyn Dialect) -> Self {
        Self {
            base,
            dialect,
            aliases: HashMap::new(),
            joins: Vec::new(),
        }
    }

    pub fn compile(mut self, request: &SelectRequest) -> Result<CompiledQuery, ColumnError> {
        if request.projections.is_empty() {
            return Err(ColumnError::EmptyProjection);
        }

        let mut outputs: Vec<(&str, String)> = Vec::new();
        let mut select_list = Vec::new();
        for projection in &request.projections {
            let id = projection.column.id();
            if let Some((_, seen)) = outputs
                .iter()
                .find(|(alias, _)| *alias == projection.alias)
            {
                if *seen == id {
                    continue;
                }
                return Err(ColumnError::DuplicateAlias(projection.alias.clone()));
            }

            let expr = self.resolve(&projection.column)?;
            select_list.push(Expr::Alias {
                expr: Box::new(expr),
                alias: projection.alias.clone(),
            });
            outputs.push((projection.alias.as_str(), id));
        }

        let mut conditions = Vec::with_capacity(request.filters.len());
        for filter in &request.filters {
            conditions.push(self.filter_expr(filter)?);
        }

        let mut order_by = Vec::with_capacity(request.order_by.len());
        for sort in &request.order_by {
            order_by.push((self.resolve(&sort.column)?, sort.direction));
        }

        let mut builder = SelectBuilder::new()
            .select(select_list)
            .from_source(self.base.to_from_source(), Some(BASE_ALIAS));

        for join in &self.joins {
            let kind = if join.inner {
                JoinKind::Inner
            } else {
                JoinKind::LeftOuter
            };
            builder = builder.join(
                kind,
                planner::table_ref!(join.table),
                Some(join.alias.as_str()),
                join.on.clone(),
            );
        }

        if let Some(condition) = Expr::and_all(conditions) {
            builder = builder.where_clause(condition);
        }
        for (expr, direction) in order_by {
            builder = builder.order_by(expr, Some(direction.into()));
        }
        if let Some(limit) = request.limit {
            builder = builder.limit(planner::value!(Value::Int(to_i64(limit))));
        }
        if let Some(offset) = request.offset {
            builder = builder.offset(planner::value!(Value::Int(to_i64(offset))));
        }

        let select: Select = builder.build();
        let sql = render_sql(&select, self.dialect);
        debug!(joins = self.joins.len(), "Compiled table query: {sql}");

        Ok(CompiledQuery {
            sql,
            columns: outputs.into_iter().map(|(alias, _)| alias.to_string()).collect(),
            join_count: self.joins.len(),
        })
    }

    /// Resolves a reference to a qualified identifier, registering the joins
    /// it needs.
    pub fn resolve(&mut self, column: &SqlColumn) -> Result<Expr, ColumnError> {
        if column.name().is_empty() {
            return Err(ColumnError::InvalidReference(format!(
                "empty field name in `{}`",
                column.id()
            )));
        }

        let qualifier = match column.source() {
            None => BASE_ALIAS.to_string(),
            Some(source) => self.register(source)?,
        };
        Ok(qualified(&qualifier, column.name()))
    }

    fn register(&mut self, source: &SourceTable) -> Result<String, ColumnError> {
        let id = source.id();
        if let Some(&index) = self.aliases.get(&id) {
            let join = &mut self.joins[index];
            // A single outer requester keeps the join outer.
            join.inner &= source.is_inner_join();
            return Ok(join.alias.clone());
        }

        if source.table().is_empty() {
            return Err(ColumnError::InvalidReference(format!(
                "empty table name in `{id}`"
            )));
        }
        if source.join_keys().next().is_none() {
            return Err(ColumnError::EmptyJoinKey {
                table: source.table().to_string(),
            });
        }

        // Parents first: resolving the key values may register other joins.
        let mut predicates = Vec::new();
        let mut pending = Vec::new();
        for (field, value) in source.join_keys() {
            let right = match value {
                JoinValue::Column(column) => self.resolve(column)?,
                JoinValue::Literal(literal) => planner::value!(literal.clone()),
            };
            pending.push((field.clone(), right));
        }

        let alias = format!("{}_{}", source.table(), self.joins.len());
        for (field, right) in pending {
            predicates.push(Expr::binary(
                qualified(&alias, &field),
                BinaryOperator::Eq,
                right,
            ));
        }

        // join_keys() is non-empty, so there is at least one predicate.
        let on = Expr::and_all(predicates).ok_or_else(|| ColumnError::EmptyJoinKey {
            table: source.table().to_string(),
        })?;

        debug!(alias = %alias, join = %id, "Registered join");
        self.aliases.insert(id, self.joins.len());
        self.joins.push(PlannedJoin {
            alias: alias.clone(),
            table: source.table().to_string(),
            on,
            inner: source.is_inner_join(),
        });
        Ok(alias)
    }

    fn filter_expr(&mut self, filter: &Filter) -> Result<Expr, ColumnError> {
        match filter {
            Filter::Raw { sql } => Ok(Expr::Raw(sql.clone())),
            Filter::Column { column, op } => {
                let expr = self.resolve(column)?;
                Ok(match op {
                    FilterOp::IsNull => Expr::IsNull {
                        expr: Box::new(expr),
                        negated: false,
                    },
                    FilterOp::IsNotNull => Expr::IsNull {
                        expr: Box::new(expr),
                        negated: true,
                    },
                    other => match other.comparison() {
                        Some((op, value)) => Expr::binary(expr, op, planner::value!(value)),
                        None => expr,
                    },
                })
            }
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
