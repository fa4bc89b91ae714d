//! # ember-server
//!
//! Supervision of the PHP built-in development server: process
//! lifecycle, log-line streaming, and port-collision discovery.

pub mod errors;
pub mod php;
pub mod port;

pub use errors::{ServerError, ServerResult};
pub use php::{php_version, PhpServer};
pub use port::{find_available_port, port_in_use};
