//! Column references: a field of the base table, or a field of another table
//! reached through a chain of joins.

use model::core::value::Value;
use serde::Serialize;
use std::{borrow::Cow, collections::BTreeMap, fmt, sync::Arc};

/// Describes how to obtain one value in the table query.
///
/// Two references with the same shape have the same [`SqlColumn::id`] and
/// compile to the same join, even when built independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SqlColumn {
    field: String,
    source: Option<Arc<SourceTable>>,
}

/// A table joined into the query. `join_on` maps fields of `table` to the
/// values they must equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceTable {
    table: String,
    join_on: BTreeMap<String, JoinValue>,
    inner_join: bool,
}

/// Right-hand side of one join predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum JoinValue {
    Column(SqlColumn),
    Literal(Value),
}

impl SqlColumn {
    /// A field of the base table.
    pub fn field(name: impl Into<String>) -> Self {
        SqlColumn {
            field: name.into(),
            source: None,
        }
    }

    /// A field of `source`.
    pub fn joined(name: impl Into<String>, source: impl Into<Arc<SourceTable>>) -> Self {
        SqlColumn {
            field: name.into(),
            source: Some(source.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.field
    }

    pub fn source(&self) -> Option<&Arc<SourceTable>> {
        self.source.as_ref()
    }

    pub fn is_joined(&self) -> bool {
        self.source.is_some()
    }

    /// Canonical identity: the field name for base fields,
    /// `<table>[<key>=<id>,...].<field>` for joined ones.
    ///
    /// Names that are not plain identifiers are double-quoted, so distinct
    /// references never share an id.
    pub fn id(&self) -> String {
        match &self.source {
            None => id_name(&self.field).into_owned(),
            Some(source) => format!("{}.{}", source.id(), id_name(&self.field)),
        }
    }
}

impl From<&str> for SqlColumn {
    fn from(name: &str) -> Self {
        SqlColumn::field(name)
    }
}

impl fmt::Display for SqlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl SourceTable {
    pub fn new(table: impl Into<String>) -> Self {
        SourceTable {
            table: table.into(),
            join_on: BTreeMap::new(),
            inner_join: false,
        }
    }

    /// Joins on `table.field = <column>`.
    pub fn join_on(mut self, field: impl Into<String>, column: SqlColumn) -> Self {
        self.join_on.insert(field.into(), JoinValue::Column(column));
        self
    }

    /// Joins on `table.field = <literal>`. The literal is quoted by the
    /// dialect when the query is rendered.
    pub fn join_on_literal(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.join_on
            .insert(field.into(), JoinValue::Literal(value.into()));
        self
    }

    /// Requests an INNER JOIN instead of a LEFT OUTER JOIN.
    ///
    /// Only set this when every row of the query has a matching row in
    /// `table`: nothing verifies it, and rows without a match are dropped
    /// from the result.
    pub fn inner_join(mut self, inner: bool) -> Self {
        self.inner_join = inner;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn join_keys(&self) -> impl Iterator<Item = (&String, &JoinValue)> {
        self.join_on.iter()
    }

    pub fn is_inner_join(&self) -> bool {
        self.inner_join
    }

    /// Identity of the join itself, shared by every field read through it.
    /// Keys are sorted, so declaration order never matters; the inner-join
    /// hint is not part of the identity.
    pub fn id(&self) -> String {
        let keys = self
            .join_on
            .iter()
            .map(|(field, value)| format!("{}={}", id_name(field), value.id()))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}[{}]", id_name(&self.table), keys)
    }

    /// Convenience for `SqlColumn::joined(field, self)`.
    pub fn column(self: &Arc<Self>, field: impl Into<String>) -> SqlColumn {
        SqlColumn::joined(field, Arc::clone(self))
    }
}

impl JoinValue {
    /// Literals start with a digit, a sign or a quote, or are one of the
    /// words [`id_name`] never leaves bare. Floats always carry a decimal
    /// point or an exponent so they differ from integers.
    pub fn id(&self) -> String {
        match self {
            JoinValue::Column(column) => column.id(),
            JoinValue::Literal(Value::Float(v)) => format!("{v:?}"),
            JoinValue::Literal(value) => value.to_string(),
        }
    }
}

/// Words a literal can render as.
const LITERAL_WORDS: [&str; 3] = ["null", "nan", "inf"];

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !LITERAL_WORDS.contains(&name.to_ascii_lowercase().as_str())
}

/// A table or field name as written inside an id.
fn id_name(name: &str) -> Cow<'_, str> {
    if is_plain_name(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}
