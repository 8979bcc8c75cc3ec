//! Result of one mapping run

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::{Node, NodeCounts};
use crate::error::{ErrorSeverity, GraphError};

/// A non-fatal problem met while mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl Diagnostic {
    pub fn from_error(path: PathBuf, error: &GraphError) -> Self {
        Self {
            path,
            message: error.user_message(),
            severity: error.severity(),
        }
    }
}

/// The mapped tree together with what was skipped on the way
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingReport {
    pub root: PathBuf,
    pub tree: Option<Node>,
    pub diagnostics: Vec<Diagnostic>,
    pub counts: NodeCounts,
    pub scan_duration: Duration,
    pub generated_at: DateTime<Utc>,
}

impl MappingReport {
    pub fn new(root: PathBuf, tree: Option<Node>) -> Self {
        let counts = tree.as_ref().map(Node::counts).unwrap_or_default();
        Self {
            root,
            tree,
            diagnostics: Vec::new(),
            counts,
            scan_duration: Duration::ZERO,
            generated_at: Utc::now(),
        }
    }

    /// Add an error to the report
    pub fn add_error(&mut self, path: PathBuf, error: &GraphError) {
        self.diagnostics.push(Diagnostic::from_error(path, error));
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Diagnostics at warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == ErrorSeverity::Warning)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
