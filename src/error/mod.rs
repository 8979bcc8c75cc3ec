//! Error handling for pysourcegraph
//!
//! Error types, the crate-wide result alias, and helpers for the
//! report-and-continue handling the mapper relies on.

pub mod context;
pub mod types;

pub use context::{handle_error, ResultExt};
pub use types::{ErrorSeverity, GraphError, Result};
