//! Error types and definitions for pysourcegraph
//!
//! Most of these errors never reach the caller of the tree builder: parse
//! failures, unreadable entries and symlink cycles are recorded as non-fatal
//! diagnostics while mapping continues. Only critical errors (configuration,
//! invalid root, cancellation) are returned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current entry fails but overall mapping can continue
    Error,
    /// Critical level - mapping must stop
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for source graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Failure reading a source file
    #[error("Error reading {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Source file that does not parse as valid Python
    #[error("Syntax error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Root directory carries none of the package marker files
    #[error("No package found in {path}: expected one of {markers:?}")]
    NotAPackage {
        path: PathBuf,
        markers: Vec<String>,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Directory reached twice through symbolic links
    #[error("Symlink cycle at {path}: {canonical} was already visited")]
    SymlinkCycle {
        path: PathBuf,
        canonical: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Symbolic link left alone because link following is off
    #[error("Symbolic link not followed: {path}")]
    SymlinkSkipped {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Child removal that matched nothing
    #[error("No child equal to node '{name}'")]
    NodeNotFound {
        name: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal {
        path: PathBuf,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Tree-sitter grammar could not be loaded
    #[error("Parser initialization error: {message}")]
    ParserInit {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Interrupted operation
    #[error("Operation interrupted")]
    Interrupted {
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },
}

impl GraphError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - the entry is skipped, mapping continues
            GraphError::PermissionDenied { .. } => ErrorSeverity::Warning,
            GraphError::Parse { .. } => ErrorSeverity::Warning,
            GraphError::SymlinkCycle { .. } => ErrorSeverity::Warning,
            GraphError::SymlinkSkipped { .. } => ErrorSeverity::Warning,
            GraphError::NodeNotFound { .. } => ErrorSeverity::Warning,

            // Critical errors - nothing is mapped
            GraphError::NotAPackage { .. } => ErrorSeverity::Critical,
            GraphError::Config { .. } => ErrorSeverity::Critical,
            GraphError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            GraphError::ConfigRead { .. } => ErrorSeverity::Critical,
            GraphError::ConfigParse { .. } => ErrorSeverity::Critical,
            GraphError::InvalidPath { .. } => ErrorSeverity::Critical,
            GraphError::GlobPattern { .. } => ErrorSeverity::Critical,
            GraphError::ParserInit { .. } => ErrorSeverity::Critical,
            GraphError::Interrupted { .. } => ErrorSeverity::Critical,
            GraphError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - current entry fails but mapping can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should stop mapping
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GraphError::PermissionDenied { path, .. } => {
                format!("Cannot access '{}' due to permission denied. Skipping entry.", path.display())
            }
            GraphError::Parse { path, message, .. } => {
                format!("'{}' is not valid Python ({}). Skipping module.", path.display(), message)
            }
            GraphError::IoRead { path, source, .. } => {
                format!("Could not read '{}': {}. Skipping module.", path.display(), source)
            }
            GraphError::NotAPackage { path, markers, .. } => {
                format!(
                    "'{}' does not look like a Python package. Add one of: {}.",
                    path.display(),
                    markers.join(", ")
                )
            }
            GraphError::InvalidPath { path, .. } => {
                format!("Invalid path: '{}'. Please provide an existing directory.", path.display())
            }
            GraphError::SymlinkCycle { path, .. } => {
                format!("'{}' links back into an already mapped directory. Skipping.", path.display())
            }
            GraphError::SymlinkSkipped { path, .. } => {
                format!("'{}' is a symbolic link and link following is disabled. Skipping.", path.display())
            }
            GraphError::ConfigNotFound { path, .. } => {
                format!("Configuration file not found at '{}'.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        GraphError::Io {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a read error for a source file
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::IoRead {
            path: path.into(),
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a syntax error for a source file
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GraphError::Parse {
            path: path.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a missing package marker error
    pub fn not_a_package(path: impl Into<PathBuf>, markers: &[String]) -> Self {
        GraphError::NotAPackage {
            path: path.into(),
            markers: markers.to_vec(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        GraphError::Config {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        GraphError::PermissionDenied {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        GraphError::InvalidPath {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a symlink cycle error
    pub fn symlink_cycle(path: impl Into<PathBuf>, canonical: impl Into<PathBuf>) -> Self {
        GraphError::SymlinkCycle {
            path: path.into(),
            canonical: canonical.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a skipped symlink warning
    pub fn symlink_skipped(path: impl Into<PathBuf>) -> Self {
        GraphError::SymlinkSkipped {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a node-not-found error
    pub fn node_not_found(name: impl Into<String>) -> Self {
        GraphError::NodeNotFound {
            name: name.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GraphError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a parser initialization error
    pub fn parser_init_error(message: impl Into<String>) -> Self {
        GraphError::ParserInit {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an interruption error
    pub fn interrupted() -> Self {
        GraphError::Interrupted {
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::io_error(err)
    }
}

impl From<glob::PatternError> for GraphError {
    fn from(err: glob::PatternError) -> Self {
        GraphError::GlobPattern {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::JsonSerialize {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

/// Result type alias for source graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
