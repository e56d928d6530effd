//! Relationship-following table columns.
//!
//! Columns describe their values as [`SqlColumn`] references, either a field
//! of the base table or a field reached through joins. The visible columns of
//! a table compile into one query in which each distinct join path appears
//! once. Column sets add columns that are only found by querying the data.

pub mod cell;
pub mod column;
pub mod column_set;
pub mod compiler;
pub mod entity;
pub mod error;
pub mod filter;
pub mod format;
pub mod manager;
pub mod settings;
pub mod sql_column;
pub mod view;

pub use cell::{Cell, CellAction, CellContent, EntityRef};
pub use column::{Column, arg::arg_sql_column, params::ColumnParams};
pub use column_set::{ColumnOrSet, ColumnSet, DiscoveredColumn, discover_all};
pub use compiler::{BaseSource, CompiledQuery, Projection, QueryCompiler, SelectRequest};
pub use error::{ColumnError, ManagerError, RenderError, SettingsError};
pub use filter::{Filter, FilterOp, SortDirection, SortSpec};
pub use manager::{QueryPurpose, QueryRequest, TableManager, TableState};
pub use settings::TableSettings;
pub use sql_column::{JoinValue, SourceTable, SqlColumn};
pub use view::{RenderedPage, TableView};
