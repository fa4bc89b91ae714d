//! Query-engine errors.
//! One error enum covering every failure `DatabaseManager` can surface.

use thiserror::Error;

/// Errors surfaced by the SQLite query engine.
///
/// `Sql` carries the engine's own diagnostic unmodified; `Internal` is
/// reserved for failures that did not originate inside SQLite, such as
/// being unable to open the database handle at all.
#[derive(Debug, Error)]
pub enum QueryEngineError {
    #[error("no database selected")]
    NoDatabase,

    #[error("database file not found: {path}")]
    DatabaseNotFound { path: String },

    #[error("invalid identifier: {name:?}")]
    InvalidIdentifier { name: String },

    #[error("read-only mode: write queries are disabled")]
    ReadOnly,

    #[error("SQL error: {message}")]
    Sql { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

pub type EngineResult<T> = Result<T, QueryEngineError>;
