#![allow(dead_code)]

use async_trait::async_trait;
use columns::{
    BaseSource, ManagerError, QueryPurpose, QueryRequest, TableManager, TableState,
};
use futures::lock::Mutex;
use model::{core::value::Value, records::batch::QueryResult};

/// In-memory table manager. Returns canned rows, answers attribute probes
/// from a fixed attribute table and records every request it receives.
pub struct FakeManager {
    state: TableState,
    rows: QueryResult,
    /// `(arg_set_id, key)` pairs of the attribute table.
    attributes: Vec<(i64, String)>,
    /// Attribute sets referenced by the rows currently in the table.
    selected_sets: Vec<i64>,
    failure: Option<String>,
    issued: Mutex<Vec<QueryRequest>>,
}

impl FakeManager {
    pub fn new(table: &str) -> Self {
        FakeManager {
            state: TableState::new(BaseSource::Table(table.to_string())),
            rows: QueryResult::default(),
            attributes: Vec::new(),
            selected_sets: Vec::new(),
            failure: None,
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.rows = QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
            .expect("canned rows are well formed");
        self
    }

    pub fn with_attributes(mut self, attributes: &[(i64, &str)], selected_sets: &[i64]) -> Self {
        self.attributes = attributes
            .iter()
            .map(|(set, key)| (*set, key.to_string()))
            .collect();
        self.selected_sets = selected_sets.to_vec();
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn state_mut(&mut self) -> &mut TableState {
        &mut self.state
    }

    pub async fn issued(&self) -> Vec<QueryRequest> {
        self.issued.lock().await.clone()
    }

    /// Keys of the selected sets in table order, duplicates included, the
    /// way an engine ignoring DISTINCT would return them.
    fn probe_result(&self) -> Result<QueryResult, ManagerError> {
        let rows = self
            .attributes
            .iter()
            .filter(|(set, _)| self.selected_sets.contains(set))
            .map(|(_, key)| vec![Value::from(key.as_str())])
            .collect();
        Ok(QueryResult::new(vec!["key".to_string()], rows)?)
    }
}

#[async_trait]
impl TableManager for FakeManager {
    fn state(&self) -> &TableState {
        &self.state
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResult, ManagerError> {
        self.issued.lock().await.push(request.clone());
        if let Some(message) = &self.failure {
            return Err(ManagerError::Query(message.clone()));
        }
        match request.purpose {
            QueryPurpose::Rows => Ok(self.rows.clone()),
            QueryPurpose::Probe => self.probe_result(),
        }
    }
}
