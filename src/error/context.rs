//! Error context utilities
//!
//! Helpers for attaching context to foreign errors and for the
//! report-and-continue handling used throughout directory mapping.

use std::path::Path;
use tracing::{error, warn};

use crate::error::types::ErrorSeverity;
use crate::error::{GraphError, Result};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| GraphError::config_error(format!("{}: {}", context(), err)))
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let io_kind = (&err as &(dyn std::error::Error + 'static))
                .downcast_ref::<std::io::Error>()
                .map(|io_err| io_err.kind());

            if io_kind == Some(std::io::ErrorKind::PermissionDenied) {
                return GraphError::permission_denied(path.as_ref());
            }

            GraphError::directory_traversal_error(path.as_ref(), err.to_string())
        })
    }
}

/// Handle an error based on its severity
///
/// - Warning: log the error and return None
/// - Error: log the error and return None
/// - Critical: log the error and return Some(error)
pub fn handle_error(err: GraphError) -> Option<GraphError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            error!("critical: {}", message);
            Some(err)
        }
    }
}
