use crate::{column::arg::AttributeTable, compiler::BaseSource, error::SettingsError};
use planner::query::dialect::DialectKind;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Table configuration, usually loaded from JSON.
///
/// ```json
/// { "base": { "table": "slice" }, "dialect": "sqlite", "page_size": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub base: BaseSource,
    pub dialect: DialectKind,
    /// Rows per page; `null` disables paging.
    pub page_size: Option<u64>,
    pub attributes: AttributeTable,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            base: BaseSource::Table(String::new()),
            dialect: DialectKind::default(),
            page_size: Some(DEFAULT_PAGE_SIZE),
            attributes: AttributeTable::default(),
        }
    }
}

impl TableSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: TableSettings = serde_json::from_str(json)?;
        settings.validate()?;
        info!(
            dialect = ?settings.dialect,
            page_size = ?settings.page_size,
            "Loaded table settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let (key, text) = match &self.base {
            BaseSource::Table(name) => ("base.table", name),
            BaseSource::Query(sql) => ("base.query", sql),
        };
        if text.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: key.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.page_size == Some(0) {
            return Err(SettingsError::Invalid {
                key: "page_size".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
