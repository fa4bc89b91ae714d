//! Server supervisor errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("php not found on PATH")]
    PhpNotFound,

    #[error("server already running on port {port}")]
    AlreadyRunning { port: u16 },

    #[error("ports {start}..={end} are all in use")]
    PortsExhausted { start: u16, end: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
