//! pysourcegraph - maps Python source trees into a structural node hierarchy
//!
//! This library walks a Python package directory, parses every module with
//! tree-sitter and assembles packages, modules, classes, functions and
//! imports into a tree of [`Node`]s. The finished tree can be turned into an
//! [`ImportGraph`] or formatted as text, JSON or Graphviz DOT.

#![feature(error_generic_member_access)]

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;

// Re-export commonly used types
pub use crate::core::{tree_builder, CancellationToken, DirectoryMapper, TreeBuilder};
pub use error::{handle_error, ErrorSeverity, GraphError, Result, ResultExt};
pub use models::{
    config::{OutputFormat, Settings},
    import_graph::ImportGraph,
    node::{Node, NodeKind},
    report::MappingReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
