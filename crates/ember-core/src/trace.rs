//! Entry/exit instrumentation for public operations.
//!
//! A single composable wrapper rather than per-operation log lines, so
//! every facade method reports the same way. Output goes through the
//! `tracing` dispatcher, which tests can replace with a capturing or
//! no-op subscriber.

use std::fmt::Display;
use std::time::Instant;

use tracing::{debug, error};

/// Run `op` under entry/exit logging with elapsed time.
///
/// Failures are logged and propagated unchanged; the wrapper never
/// alters the outcome.
pub fn traced<T, E: Display>(
    name: &'static str,
    op: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    debug!(op = name, "enter");
    let start = Instant::now();
    let result = op();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => debug!(op = name, elapsed_ms, "exit"),
        Err(e) => error!(op = name, elapsed_ms, error = %e, "failed"),
    }
    result
}
