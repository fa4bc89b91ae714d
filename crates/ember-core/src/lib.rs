//! # ember-core
//!
//! Foundation crate for the ember dev-server toolkit.
//! Defines error types, user preferences, and call instrumentation.
//! Every other crate in the workspace depends on this.

pub mod errors;
pub mod prefs;
pub mod trace;

// Re-export the most commonly used items at the crate root.
pub use errors::{EngineResult, QueryEngineError};
pub use prefs::{Preferences, PrefsStore};
pub use trace::traced;
