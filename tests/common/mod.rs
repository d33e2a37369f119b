//! Shared test fixtures: a scripted in-memory connector.
//!
//! Responses are keyed by exact SQL text. Every opened and closed session is
//! counted so tests can check that sessions never leak.

#![allow(dead_code)]

use mssql_mcp_server::config::ConnectionSettings;
use mssql_mcp_server::db::{ConfigResolver, Connector, NativeDriverRegistry, QueryExecutor, Session};
use mssql_mcp_server::error::{DbError, DbResult};
use mssql_mcp_server::models::{ConnectionDescriptor, TabularResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const LIST_TABLES_SQL: &str =
    "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'";

#[derive(Debug, Clone)]
pub enum Scripted {
    Rows(TabularResult),
    Affected(u64),
    Error(String),
}

#[derive(Default)]
struct FakeState {
    responses: Mutex<HashMap<String, Scripted>>,
    statements: Mutex<Vec<String>>,
    commits: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    fail_connect: AtomicBool,
    fail_close: AtomicBool,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<FakeState>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, sql: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        let result = TabularResult::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        );
        self.script(sql, Scripted::Rows(result))
    }

    pub fn with_affected(self, sql: &str, rows: u64) -> Self {
        self.script(sql, Scripted::Affected(rows))
    }

    pub fn with_error(self, sql: &str, message: &str) -> Self {
        self.script(sql, Scripted::Error(message.to_string()))
    }

    pub fn failing_connect(self) -> Self {
        self.state.fail_connect.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_close(self) -> Self {
        self.state.fail_close.store(true, Ordering::SeqCst);
        self
    }

    fn script(self, sql: &str, response: Scripted) -> Self {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(sql.to_string(), response);
        self
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    /// Statements received by sessions, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state.statements.lock().unwrap().clone()
    }
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, _descriptor: &ConnectionDescriptor) -> DbResult<FakeSession> {
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(DbError::execution("Login failed for user 'app'."));
        }
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSession {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct FakeSession {
    state: Arc<FakeState>,
}

impl FakeSession {
    fn respond(&self, sql: &str) -> Scripted {
        self.state.statements.lock().unwrap().push(sql.to_string());
        self.state
            .responses
            .lock()
            .unwrap()
            .get(sql)
            .cloned()
            .unwrap_or_else(|| {
                Scripted::Error(format!("Could not find stored response for: {}", sql))
            })
    }
}

impl Session for FakeSession {
    async fn fetch_all(&mut self, sql: &str) -> DbResult<TabularResult> {
        match self.respond(sql) {
            Scripted::Rows(result) => Ok(result),
            Scripted::Affected(_) => Ok(TabularResult::default()),
            Scripted::Error(message) => Err(DbError::execution(message)),
        }
    }

    async fn execute_and_commit(&mut self, sql: &str) -> DbResult<u64> {
        match self.respond(sql) {
            Scripted::Affected(rows) => {
                self.state.commits.fetch_add(1, Ordering::SeqCst);
                Ok(rows)
            }
            Scripted::Rows(_) => {
                self.state.commits.fetch_add(1, Ordering::SeqCst);
                Ok(0)
            }
            Scripted::Error(message) => Err(DbError::execution(message)),
        }
    }

    async fn close(self) -> DbResult<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(DbError::execution("connection reset by peer"));
        }
        Ok(())
    }
}

/// Descriptor for database `shop` with SQL authentication.
pub fn descriptor() -> ConnectionDescriptor {
    let settings = ConnectionSettings {
        database: Some("shop".to_string()),
        user: Some("app".to_string()),
        password: Some("s3cret".to_string()),
        ..ConnectionSettings::for_host("localhost")
    };
    ConfigResolver::new(NativeDriverRegistry)
        .resolve(&settings)
        .unwrap()
}

pub fn executor(connector: &FakeConnector) -> Arc<QueryExecutor<FakeConnector>> {
    Arc::new(QueryExecutor::new(connector.clone()))
}
