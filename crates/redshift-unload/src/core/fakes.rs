//! In-memory stand-ins for the warehouse and logger capabilities.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, UnloadError};

use super::schema::Row;
use super::traits::{UnloadLogger, WarehouseConnection};

/// Fake warehouse that answers every query with canned rows and records
/// everything it is asked to run.
#[derive(Default)]
pub struct FakeWarehouse {
    rows: Vec<Row>,
    fail_execute: Option<String>,
    fail_query: Option<String>,
    pub executed: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeWarehouse {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing_execute(mut self, message: &str) -> Self {
        self.fail_execute = Some(message.to_string());
        self
    }

    pub fn failing_query(mut self, message: &str) -> Self {
        self.fail_query = Some(message.to_string());
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<(String, Vec<String>)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarehouseConnection for FakeWarehouse {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        match &self.fail_execute {
            Some(message) => Err(UnloadError::Connection(message.clone())),
            None => Ok(()),
        }
    }

    async fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        self.queries
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        match &self.fail_query {
            Some(message) => Err(UnloadError::Connection(message.clone())),
            None => Ok(self.rows.clone()),
        }
    }
}

/// Build a catalog row the way `pg_table_def` reports it.
pub fn catalog_row(column: &str, data_type: &str, notnull: &str) -> Row {
    let mut row = Row::new();
    row.insert("column".to_string(), column.to_string());
    row.insert("type".to_string(), data_type.to_string());
    row.insert("notnull".to_string(), notnull.to_string());
    row
}

/// The four-column `my_table` used across tests.
pub fn my_table_rows() -> Vec<Row> {
    vec![
        catalog_row("id", "bigint", "t"),
        catalog_row("name", "character varying(100)", "t"),
        catalog_row("fax_number", "character varying(100)", "f"),
        catalog_row("year_of_birth", "smallint", "f"),
    ]
}

/// Logger that keeps every message with its level.
#[derive(Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn all(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl UnloadLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(("info", message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.messages.lock().unwrap().push(("debug", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(("warn", message.to_string()));
    }
}
