//! Renderable columns.
//!
//! A column reads its primary reference plus a fixed set of dependent
//! references from each row and turns them into a [`Cell`].

use crate::{
    cell::{Cell, CellContent},
    entity::EntityTable,
    error::ColumnError,
    filter::{SortDirection, SortSpec},
    sql_column::SqlColumn,
};
use model::records::row::RowData;

pub mod arg;
pub mod entity;
pub mod params;
pub mod standard;

use arg::ArgColumn;
use entity::{EntityColumn, IdRefColumn, PrimaryKeyColumn};
use params::ColumnParams;
use standard::ValueColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Standard(ValueColumn),
    Timestamp(ValueColumn),
    Duration(ValueColumn),
    IdRef(IdRefColumn),
    Entity(EntityColumn),
    PrimaryKey(PrimaryKeyColumn),
    Arg(ArgColumn),
}

impl Column {
    pub fn standard(column: impl Into<SqlColumn>) -> Self {
        Column::Standard(ValueColumn::new(column.into(), ColumnParams::default()))
    }

    pub fn timestamp(column: impl Into<SqlColumn>) -> Self {
        Column::Timestamp(ValueColumn::new(column.into(), ColumnParams::default()))
    }

    pub fn duration(column: impl Into<SqlColumn>) -> Self {
        Column::Duration(ValueColumn::new(column.into(), ColumnParams::default()))
    }

    pub fn id_ref(column: impl Into<SqlColumn>, table: impl Into<String>) -> Self {
        Column::IdRef(IdRefColumn::new(column.into(), table, ColumnParams::default()))
    }

    pub fn entity(column: impl Into<SqlColumn>, entity: EntityTable, not_null: bool) -> Self {
        Column::Entity(EntityColumn::new(column.into(), entity, ColumnParams::default(), not_null))
    }

    pub fn primary_key(column: impl Into<SqlColumn>, table: impl Into<String>) -> Self {
        Column::PrimaryKey(PrimaryKeyColumn::new(column.into(), table, ColumnParams::default()))
    }

    pub fn params(&self) -> &ColumnParams {
        match self {
            Column::Standard(c) | Column::Timestamp(c) | Column::Duration(c) => &c.params,
            Column::IdRef(c) => &c.params,
            Column::Entity(c) => &c.params,
            Column::PrimaryKey(c) => &c.params,
            Column::Arg(c) => &c.params,
        }
    }

    fn params_mut(&mut self) -> &mut ColumnParams {
        match self {
            Column::Standard(c) | Column::Timestamp(c) | Column::Duration(c) => &mut c.params,
            Column::IdRef(c) => &mut c.params,
            Column::Entity(c) => &mut c.params,
            Column::PrimaryKey(c) => &mut c.params,
            Column::Arg(c) => &mut c.params,
        }
    }

    pub fn with_params(mut self, params: ColumnParams) -> Self {
        *self.params_mut() = params;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.params_mut().title = Some(title.into());
        self
    }

    /// The reference the column displays.
    pub fn primary_column(&self) -> SqlColumn {
        match self {
            Column::Standard(c) | Column::Timestamp(c) | Column::Duration(c) => c.column.clone(),
            Column::IdRef(c) => c.column.clone(),
            Column::Entity(c) => c.column.clone(),
            Column::PrimaryKey(c) => c.column.clone(),
            Column::Arg(c) => c.display_column().clone(),
        }
    }

    /// Extra references the column reads when rendering.
    pub fn dependent_columns(&self) -> Vec<SqlColumn> {
        match self {
            Column::Entity(c) => c.dependent_columns(),
            Column::Arg(c) => c.typed_columns(),
            _ => Vec::new(),
        }
    }

    /// References the table is ordered by when sorting on this column.
    pub fn sort_columns(&self) -> Vec<SqlColumn> {
        match self {
            Column::Arg(c) => c.typed_columns(),
            _ => vec![self.primary_column()],
        }
    }

    /// The ordering that sorts the table by this column.
    pub fn sort_specs(&self, direction: SortDirection) -> Vec<SortSpec> {
        self.sort_columns()
            .into_iter()
            .map(|column| SortSpec { column, direction })
            .collect()
    }

    /// Every reference the table query has to project for this column.
    pub fn required_columns(&self) -> Vec<SqlColumn> {
        let mut columns = vec![self.primary_column()];
        for column in self.dependent_columns().into_iter().chain(self.sort_columns()) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Distinguishes columns sharing a primary reference.
    pub fn tag(&self) -> &str {
        if let Some(alias) = &self.params().alias {
            return alias;
        }
        match self {
            Column::Standard(_) => "standard",
            Column::Timestamp(_) => "timestamp",
            Column::Duration(_) => "duration",
            Column::IdRef(_) => "id",
            Column::Entity(_) => "entity",
            Column::PrimaryKey(_) => "pk",
            Column::Arg(_) => "arg",
        }
    }

    /// Identity of the column within a table's visible set.
    pub fn key(&self) -> String {
        format!("{}:{}", self.tag(), self.primary_column().id())
    }

    pub fn title(&self) -> String {
        if let Some(title) = &self.params().title {
            return title.clone();
        }
        match self {
            Column::Arg(c) => c.title(),
            _ => self.primary_column().id(),
        }
    }

    pub fn render(&self, row: &RowData) -> Result<Cell, ColumnError> {
        let cell = match self {
            Column::Standard(c) => c.render_standard(row),
            Column::Timestamp(c) => c.render_time(row, "timestamp", CellContent::Timestamp),
            Column::Duration(c) => c.render_time(row, "duration", CellContent::Duration),
            Column::IdRef(c) => c.render(row),
            Column::Entity(c) => c.render(row),
            Column::PrimaryKey(c) => return c.render(row),
            Column::Arg(c) => c.render(row),
        };
        Ok(cell)
    }
}
