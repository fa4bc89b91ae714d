//! Scoped connection and transaction helpers.
//!
//! Every engine call opens a fresh connection and drops it before
//! returning; nothing is cached across calls. The small per-call open
//! cost buys the absence of stale-handle and cross-call locking bugs,
//! and means the engine needs no internal mutex.

use std::path::Path;

use ember_core::errors::{EngineResult, QueryEngineError};
use rusqlite::{Connection, Transaction};

/// Open `path` and run `body` with the connection.
///
/// The handle is released on every exit path when it drops, including
/// failures propagated out of `body`. Rows read through the connection
/// are addressable by position and by column name (rusqlite native).
pub fn with_connection<T>(
    path: &Path,
    body: impl FnOnce(&mut Connection) -> EngineResult<T>,
) -> EngineResult<T> {
    let mut conn = Connection::open(path).map_err(|e| QueryEngineError::Internal {
        message: format!("failed to open {}: {e}", path.display()),
    })?;
    body(&mut conn)
}

/// Run `body` inside a transaction on a fresh connection.
///
/// Commits when `body` returns `Ok`; a dropped transaction rolls back,
/// so any failure leaves the database exactly as it was before the
/// call. One call to this function is exactly one transaction — there
/// is no cross-call transaction state anywhere in the engine.
pub fn with_transaction<T>(
    path: &Path,
    body: impl FnOnce(&Transaction<'_>) -> EngineResult<T>,
) -> EngineResult<T> {
    with_connection(path, |conn| {
        let tx = conn.transaction().map_err(sql_err)?;
        let value = body(&tx)?;
        tx.commit().map_err(sql_err)?;
        Ok(value)
    })
}

/// Map a rusqlite failure to the engine's SQL-error kind, keeping the
/// engine's own diagnostic text.
pub(crate) fn sql_err(e: rusqlite::Error) -> QueryEngineError {
    QueryEngineError::Sql {
        message: e.to_string(),
    }
}
