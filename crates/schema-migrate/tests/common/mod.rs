//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use schema_migrate::core::row::row;
use schema_migrate::{Connection, Result, Row, SchemaError};
use serde_json::Value;

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Build a row from string keys and JSON values.
pub fn r(pairs: &[(&str, Value)]) -> Row {
    row(pairs.iter().map(|(k, v)| (*k, v.clone())))
}

/// In-memory connection replaying canned rows.
///
/// Each response is keyed by a fragment of the SQL text; the first
/// fragment contained in a query wins. Unmatched queries return no rows.
pub struct ScriptedConnection {
    driver: String,
    name: String,
    responses: Vec<(String, Vec<Row>)>,
    fail_on: Option<String>,
    queries: RefCell<Vec<String>>,
}

impl ScriptedConnection {
    pub fn new(driver: &str, name: &str) -> Self {
        Self {
            driver: driver.to_string(),
            name: name.to_string(),
            responses: Vec::new(),
            fail_on: None,
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        self.responses.push((fragment.to_string(), rows));
        self
    }

    /// Fail any query containing `fragment`.
    pub fn fail_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl Connection for ScriptedConnection {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn connection_name(&self) -> &str {
        &self.name
    }

    fn run_list_query(&self, sql: &str) -> Result<Vec<Row>> {
        self.queries.borrow_mut().push(sql.to_string());
        if let Some(fragment) = &self.fail_on {
            if sql.contains(fragment.as_str()) {
                return Err(SchemaError::query("connection lost", sql));
            }
        }
        Ok(self
            .responses
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with warnings and errors logged into a buffer.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
