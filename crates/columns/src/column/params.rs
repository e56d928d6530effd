use serde::Deserialize;

/// Per-column presentation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnParams {
    /// Overrides the title derived from the column reference.
    pub title: Option<String>,
    /// Distinguishes columns sharing one primary reference, e.g. a `utid`
    /// column next to a `thread` column.
    pub alias: Option<String>,
    /// The column is known but not shown until requested.
    pub starts_hidden: bool,
}

impl ColumnParams {
    pub fn titled(title: impl Into<String>) -> Self {
        ColumnParams {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        ColumnParams {
            starts_hidden: true,
            ..Default::default()
        }
    }
}
