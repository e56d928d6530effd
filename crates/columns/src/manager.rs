use crate::{
    column::arg::AttributeTable,
    compiler::{BaseSource, CompiledQuery, Projection, QueryCompiler, SelectRequest},
    error::{ColumnError, ManagerError},
    filter::{Filter, SortSpec},
    settings::TableSettings,
};
use async_trait::async_trait;
use model::records::batch::QueryResult;
use planner::query::dialect::{Dialect, DialectKind};

/// Why a query is being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPurpose {
    /// Rows of the visible table.
    Rows,
    /// A discovery probe issued by a column set.
    Probe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub purpose: QueryPurpose,
}

impl QueryRequest {
    pub fn rows(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            purpose: QueryPurpose::Rows,
        }
    }

    pub fn probe(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            purpose: QueryPurpose::Probe,
        }
    }
}

/// The owner of a table: executes queries and exposes the query currently
/// backing the table so column sets can embed it.
#[async_trait]
pub trait TableManager: Send + Sync {
    fn state(&self) -> &TableState;

    async fn query(&self, request: QueryRequest) -> Result<QueryResult, ManagerError>;

    /// The current table query projecting `projections`. Filters apply;
    /// sort order and pagination do not.
    fn get_sql_query(&self, projections: &[Projection]) -> Result<String, ColumnError> {
        Ok(self.state().filtered_query(projections)?.sql)
    }

    fn filters(&self) -> Vec<Filter> {
        self.state().filters().to_vec()
    }

    fn dialect(&self) -> &'static dyn Dialect {
        self.state().dialect().dialect()
    }

    /// Layout of the attribute table attribute sets probe unless they
    /// name their own.
    fn attributes(&self) -> &AttributeTable {
        self.state().attributes()
    }
}

/// Table-side state a manager keeps between queries.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    base: BaseSource,
    dialect: DialectKind,
    attributes: AttributeTable,
    filters: Vec<Filter>,
    sort: Vec<SortSpec>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl TableState {
    pub fn new(base: BaseSource) -> Self {
        Self {
            base,
            dialect: DialectKind::default(),
            attributes: AttributeTable::default(),
            filters: Vec::new(),
            sort: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn from_settings(settings: &TableSettings) -> Self {
        Self {
            limit: settings.page_size,
            attributes: settings.attributes.clone(),
            ..Self::new(settings.base.clone()).with_dialect(settings.dialect)
        }
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn base(&self) -> &BaseSource {
        &self.base
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: AttributeTable) {
        self.attributes = attributes;
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Adds a filter. Returns `false` if an identical filter is already set.
    pub fn add_filter(&mut self, filter: Filter) -> bool {
        if self.filters.contains(&filter) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    pub fn remove_filter(&mut self, filter: &Filter) {
        self.filters.retain(|f| f != filter);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn set_sort(&mut self, sort: Vec<SortSpec>) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, limit: Option<u64>, offset: Option<u64>) {
        self.limit = limit;
        self.offset = offset;
    }

    /// The filtered query without ordering or paging, suitable for
    /// embedding as a sub-query.
    pub fn filtered_query(&self, projections: &[Projection]) -> Result<CompiledQuery, ColumnError> {
        self.compile(SelectRequest {
            projections: projections.to_vec(),
            filters: self.filters.clone(),
            ..Default::default()
        })
    }

    /// The query for the visible page.
    pub fn page_query(&self, projections: &[Projection]) -> Result<CompiledQuery, ColumnError> {
        self.compile(SelectRequest {
            projections: projections.to_vec(),
            filters: self.filters.clone(),
            order_by: self.sort.clone(),
            limit: self.limit,
            offset: self.offset,
        })
    }

    fn compile(&self, request: SelectRequest) -> Result<CompiledQuery, ColumnError> {
        QueryCompiler::new(self.base.clone(), self.dialect.dialect()).compile(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::FilterOp,
        sql_column::{SourceTable, SqlColumn},
    };
    use model::core::value::Value;

    fn state() -> TableState {
        TableState::new(BaseSource::Table("slice".to_string()))
    }

    #[test]
    fn test_filtered_query_ignores_sort_and_paging() {
        let mut state = state();
        state.add_filter(Filter::raw("dur > 0"));
        state.set_sort(vec![SortSpec::asc(SqlColumn::field("ts"))]);
        state.set_page(Some(10), Some(20));

        let projections = [Projection::of(SqlColumn::field("id"))];
        let filtered = state.filtered_query(&projections).unwrap();
        assert_eq!(
            filtered.sql,
            r#"SELECT "base"."id" AS "id" FROM "slice" AS "base" WHERE (dur > 0)"#
        );

        let page = state.page_query(&projections).unwrap();
        assert_eq!(
            page.sql,
            concat!(
                r#"SELECT "base"."id" AS "id" FROM "slice" AS "base" WHERE (dur > 0) "#,
                r#"ORDER BY "base"."ts" ASC LIMIT 10 OFFSET 20"#
            )
        );
    }

    #[test]
    fn test_add_filter_skips_duplicates() {
        let mut state = state();
        let utid = SqlColumn::field("utid");
        assert!(state.add_filter(Filter::column(utid.clone(), FilterOp::Eq(Value::Int(1)))));
        assert!(!state.add_filter(Filter::column(utid.clone(), FilterOp::Eq(Value::Int(1)))));
        assert!(state.add_filter(Filter::column(utid, FilterOp::IsNotNull)));
        assert_eq!(state.filters().len(), 2);

        state.remove_filter(&Filter::column(SqlColumn::field("utid"), FilterOp::IsNotNull));
        assert_eq!(state.filters().len(), 1);
        state.clear_filters();
        assert!(state.filters().is_empty());
    }

    #[test]
    fn test_state_from_settings() {
        let settings = TableSettings::from_json(
            r#"{"base": {"table": "sched"}, "dialect": "postgres", "page_size": 25}"#,
        )
        .unwrap();
        let state = TableState::from_settings(&settings);
        assert_eq!(state.dialect(), DialectKind::Postgres);
        assert_eq!(*state.attributes(), AttributeTable::args());

        let page = state
            .page_query(&[Projection::of(SqlColumn::field("id"))])
            .unwrap();
        assert_eq!(
            page.sql,
            r#"SELECT "base"."id" AS "id" FROM "sched" AS "base" LIMIT 25"#
        );
    }

    #[test]
    fn test_state_keeps_configured_attribute_table() {
        let settings = TableSettings::from_json(
            r#"{"base": {"table": "slice"}, "attributes": {"table": "attrs", "owner_field": "set_id"}}"#,
        )
        .unwrap();
        let state = TableState::from_settings(&settings);
        assert_eq!(state.attributes().table, "attrs");
        assert_eq!(state.attributes().owner_field, "set_id");
        assert_eq!(state.attributes().display_field, "display_value");
    }

    #[test]
    fn test_joined_filter_pulls_in_join() {
        let mut state = state();
        let name = SqlColumn::joined(
            "name",
            SourceTable::new("thread").join_on("id", SqlColumn::field("utid")),
        );
        state.add_filter(Filter::column(name, FilterOp::Eq(Value::from("main"))));

        let query = state
            .filtered_query(&[Projection::of(SqlColumn::field("id"))])
            .unwrap();
        assert_eq!(query.join_count, 1);
        assert!(query.sql.ends_with(r#"WHERE ("thread_0"."name" = 'main')"#));
    }
}
