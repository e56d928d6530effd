use crate::sql_column::SqlColumn;
use model::core::value::Value;
use planner::query::ast::{common::OrderDir, expr::BinaryOperator};
use serde::Serialize;

/// A predicate appended to the WHERE clause of the table query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Caller-written SQL, embedded verbatim.
    Raw { sql: String },
    /// A comparison on a column reference. Joined references pull their
    /// joins into the query.
    Column { column: SqlColumn, op: FilterOp },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FilterOp {
    IsNull,
    IsNotNull,
    Eq(Value),
    NotEq(Value),
    Gt(Value),
    GtEq(Value),
    Lt(Value),
    LtEq(Value),
    Glob(String),
}

impl Filter {
    pub fn raw(sql: impl Into<String>) -> Self {
        Filter::Raw { sql: sql.into() }
    }

    pub fn column(column: SqlColumn, op: FilterOp) -> Self {
        Filter::Column { column, op }
    }

    /// Short description for menus and filter chips.
    pub fn label(&self) -> String {
        match self {
            Filter::Raw { sql } => sql.clone(),
            Filter::Column { column, op } => {
                let id = column.id();
                match op {
                    FilterOp::IsNull => format!("{id} is null"),
                    FilterOp::IsNotNull => format!("{id} is not null"),
                    FilterOp::Glob(pattern) => format!("{id} glob {}", Value::from(pattern.as_str())),
                    other => match other.comparison() {
                        Some((op, value)) => format!("{id} {} {value}", operator_symbol(op)),
                        None => id,
                    },
                }
            }
        }
    }
}

impl FilterOp {
    /// The binary comparison behind this operator, if any.
    pub fn comparison(&self) -> Option<(BinaryOperator, Value)> {
        let pair = match self {
            FilterOp::Eq(v) => (BinaryOperator::Eq, v.clone()),
            FilterOp::NotEq(v) => (BinaryOperator::NotEq, v.clone()),
            FilterOp::Gt(v) => (BinaryOperator::Gt, v.clone()),
            FilterOp::GtEq(v) => (BinaryOperator::GtEq, v.clone()),
            FilterOp::Lt(v) => (BinaryOperator::Lt, v.clone()),
            FilterOp::LtEq(v) => (BinaryOperator::LtEq, v.clone()),
            FilterOp::Glob(pattern) => (BinaryOperator::Glob, Value::from(pattern.as_str())),
            FilterOp::IsNull | FilterOp::IsNotNull => return None,
        };
        Some(pair)
    }
}

fn operator_symbol(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Eq => "=",
        BinaryOperator::NotEq => "!=",
        BinaryOperator::Lt => "<",
        BinaryOperator::LtEq => "<=",
        BinaryOperator::Gt => ">",
        BinaryOperator::GtEq => ">=",
        BinaryOperator::Glob => "glob",
        BinaryOperator::And => "and",
        BinaryOperator::Or => "or",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for OrderDir {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => OrderDir::Asc,
            SortDirection::Desc => OrderDir::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSpec {
    pub column: SqlColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column: SqlColumn) -> Self {
        SortSpec {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: SqlColumn) -> Self {
        SortSpec {
            column,
            direction: SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_column::SourceTable;

    #[test]
    fn test_filter_labels() {
        let name = SqlColumn::joined(
            "name",
            SourceTable::new("thread").join_on("id", SqlColumn::field("utid")),
        );

        assert_eq!(
            Filter::column(name.clone(), FilterOp::Eq(Value::from("main"))).label(),
            "thread[id=utid].name = 'main'"
        );
        assert_eq!(
            Filter::column(name, FilterOp::IsNull).label(),
            "thread[id=utid].name is null"
        );
        assert_eq!(
            Filter::column(SqlColumn::field("dur"), FilterOp::GtEq(Value::Int(5))).label(),
            "dur >= 5"
        );
        assert_eq!(Filter::raw("dur > 0").label(), "dur > 0");
    }

    #[test]
    fn test_filter_serializes_for_ui() {
        let filter = Filter::column(SqlColumn::field("utid"), FilterOp::Eq(Value::Int(3)));
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["type"], "column");
        assert_eq!(json["op"]["op"], "eq");
        assert_eq!(json["op"]["value"]["Int"], 3);
    }
}
