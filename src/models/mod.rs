//! Data models and structures for pysourcegraph

pub mod config;
pub mod import_graph;
pub mod node;
pub mod report;

pub use config::{OutputFormat, PartialSettings, Settings};
pub use import_graph::{GraphNode, ImportGraph, ModuleCluster};
pub use node::{Node, NodeCounts, NodeKind};
pub use report::{Diagnostic, MappingReport};
