//! `DatabaseManager` — public facade over the query engine.
//!
//! Holds the selected database path and the read-only flag. Opens a
//! fresh connection for every call; each `execute` runs as exactly one
//! transaction. The two fields are single-writer by contract — the
//! caller serializes mutations (a CLI invocation or a UI thread).

use std::path::{Path, PathBuf};

use ember_core::errors::{EngineResult, QueryEngineError};
use ember_core::trace::traced;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tracing::{debug, info};

use crate::classify::{classify, QueryKind};
use crate::connection::{sql_err, with_transaction};

/// Result of one executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Rows produced by a read statement, fetched eagerly. `columns` is
    /// empty when the statement produced no result description, and
    /// `count` always equals `rows.len()`.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        count: usize,
    },
    /// Number of rows changed by a write statement.
    Affected { affected: usize },
}

/// SQLite database manager.
#[derive(Debug, Default)]
pub struct DatabaseManager {
    db_path: Option<PathBuf>,
    read_only: bool,
}

impl DatabaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with a database already selected.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            read_only: false,
        }
    }

    /// Select the database file for subsequent calls. Nothing is held
    /// open across calls, so there is nothing to close here.
    pub fn set_database(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!(db = %path.display(), "database selected");
        self.db_path = Some(path);
    }

    /// When set, write-classified queries are rejected before they
    /// touch the database.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn database(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Execute one SQL statement with positional bind parameters.
    ///
    /// Reads return all rows eagerly; writes return the affected-row
    /// count. Parameters are bound, never interpolated into the text.
    pub fn execute(&self, sql: &str, params: &[Value]) -> EngineResult<QueryOutput> {
        traced("execute", || self.execute_inner(sql, params))
    }

    fn execute_inner(&self, sql: &str, params: &[Value]) -> EngineResult<QueryOutput> {
        let path = self
            .db_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(QueryEngineError::NoDatabase)?;
        if !path.exists() {
            return Err(QueryEngineError::DatabaseNotFound {
                path: path.display().to_string(),
            });
        }

        let kind = classify(sql);
        if self.read_only && kind == QueryKind::Write {
            return Err(QueryEngineError::ReadOnly);
        }

        with_transaction(path, |tx| {
            let mut stmt = tx.prepare(sql).map_err(sql_err)?;
            match kind {
                QueryKind::Read => {
                    let columns: Vec<String> =
                        stmt.column_names().iter().map(|c| c.to_string()).collect();
                    let mut rows = Vec::new();
                    let mut raw = stmt
                        .query(params_from_iter(params.iter()))
                        .map_err(sql_err)?;
                    while let Some(row) = raw.next().map_err(sql_err)? {
                        let mut values = Vec::with_capacity(columns.len());
                        for i in 0..columns.len() {
                            values.push(row.get::<_, Value>(i).map_err(sql_err)?);
                        }
                        rows.push(values);
                    }
                    let count = rows.len();
                    debug!(rows = count, "read query returned");
                    Ok(QueryOutput::Rows {
                        columns,
                        rows,
                        count,
                    })
                }
                QueryKind::Write => {
                    let affected = stmt
                        .execute(params_from_iter(params.iter()))
                        .map_err(sql_err)?;
                    debug!(affected, "write query applied");
                    Ok(QueryOutput::Affected { affected })
                }
            }
        })
    }
}
