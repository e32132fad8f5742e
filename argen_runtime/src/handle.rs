//! The process-wide persistence handle generated code reads from.
//!
//! A generated module owns one `static DB: Handle`. The application sets it
//! once during startup through the generated `use_connection` function; every
//! finder and persistence method then reads it. There is no per-call handle
//! passing, and a handle can never be replaced once set.

use std::sync::OnceLock;

use log::debug;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{Row, Value};

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// A database connection the generated layer executes statements against.
///
/// Statements use `?` placeholders; `params` bind positionally.
pub trait Connection: Send + Sync {
    fn execute(&self, sql: &str, params: &[Value]) -> RuntimeResult<ExecResult>;

    fn query(&self, sql: &str, params: &[Value]) -> RuntimeResult<Vec<Row>>;
}

/// Write-once holder for a [`Connection`].
pub struct Handle {
    conn: OnceLock<Box<dyn Connection>>,
}

impl Handle {
    pub const fn new() -> Self {
        Self {
            conn: OnceLock::new(),
        }
    }

    /// Installs the connection. Fails if one was already installed.
    pub fn set<C: Connection + 'static>(&self, conn: C) -> RuntimeResult<()> {
        self.conn
            .set(Box::new(conn))
            .map_err(|_| RuntimeError::AlreadyConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.get().is_some()
    }

    pub fn connection(&self) -> RuntimeResult<&dyn Connection> {
        self.conn
            .get()
            .map(|c| &**c)
            .ok_or(RuntimeError::NotConnected)
    }

    pub fn execute(&self, sql: &str, params: &[Value]) -> RuntimeResult<ExecResult> {
        debug!("argen: execute `{sql}` {params:?}");
        self.connection()?.execute(sql, params)
    }

    pub fn query(&self, sql: &str, params: &[Value]) -> RuntimeResult<Vec<Row>> {
        debug!("argen: query `{sql}` {params:?}");
        self.connection()?.query(sql, params)
    }

    /// Runs a query and returns its first row.
    pub fn query_row(&self, sql: &str, params: &[Value]) -> RuntimeResult<Row> {
        self.query(sql, params)?
            .into_iter()
            .next()
            .ok_or(RuntimeError::NoRows)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}
