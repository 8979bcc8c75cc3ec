//! Import graph derived from a finished node tree
//!
//! Every Module becomes a cluster carrying its dotted qualified name and the
//! names of its classes. Each import is an edge from the importing module to
//! its target: another module's cluster when the target names a mapped
//! module, otherwise a bare node for the unresolved target.

use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use super::node::{Node, NodeKind};

/// A mapped module as drawn by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCluster {
    /// Dotted path from the tree root, e.g. `pkg.sub.module`
    pub qualified_name: String,
    pub name: String,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphNode {
    Module(ModuleCluster),
    /// Import target with no mapped module behind it
    External(String),
}

impl GraphNode {
    /// Identifier of the node in the graph
    pub fn id(&self) -> &str {
        match self {
            GraphNode::Module(cluster) => &cluster.qualified_name,
            GraphNode::External(target) => target,
        }
    }
}

/// Directed graph of modules and what they import
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    graph: DiGraph<GraphNode, ()>,
    /// Lookup keys for modules in tree order. A package's `__init__` module
    /// is also keyed by the package path.
    keys: Vec<(String, NodeIndex)>,
    externals: HashMap<String, NodeIndex>,
}

impl ImportGraph {
    /// Build the graph for every module under `root`
    pub fn from_tree(root: &Node) -> Self {
        let mut graph = Self::default();
        let mut modules = Vec::new();
        collect_modules(root, &mut Vec::new(), &mut modules);

        let mut indices = Vec::with_capacity(modules.len());
        for (qualified_name, module) in &modules {
            let classes = module
                .children()
                .iter()
                .filter(|child| child.is_class())
                .map(|child| child.name().to_string())
                .collect();
            let cluster = ModuleCluster {
                qualified_name: qualified_name.clone(),
                name: module.name().to_string(),
                classes,
            };
            let index = graph.graph.add_node(GraphNode::Module(cluster));
            graph.keys.push((qualified_name.clone(), index));
            if let Some(package) = qualified_name.strip_suffix(".__init__") {
                graph.keys.push((package.to_string(), index));
            }
            indices.push(index);
        }

        for ((_, module), from) in modules.iter().zip(indices) {
            for import in module.children().iter().filter(|child| child.is_import()) {
                let to = graph.resolve_or_insert(import.name());
                graph.graph.update_edge(from, to, ());
            }
        }

        debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "import graph built"
        );
        graph
    }

    /// Module a dotted import target refers to.
    ///
    /// The target is tried whole and then with trailing components dropped,
    /// so `pkg.mod.Class` resolves to `pkg.mod`. Each candidate matches a
    /// module whose qualified name equals it or ends with it, which lets
    /// relative targets such as `models.product` find `app.models.product`.
    /// Exact matches win over suffix matches; among suffix matches the first
    /// module in tree order wins.
    pub fn resolve(&self, target: &str) -> Option<&ModuleCluster> {
        self.resolve_index(target)
            .and_then(|index| match &self.graph[index] {
                GraphNode::Module(cluster) => Some(cluster),
                GraphNode::External(_) => None,
            })
    }

    fn resolve_index(&self, target: &str) -> Option<NodeIndex> {
        let mut candidate = target;
        loop {
            if let Some(index) = self.lookup(candidate) {
                return Some(index);
            }
            match candidate.rsplit_once('.') {
                Some((head, _)) => candidate = head,
                None => return None,
            }
        }
    }

    fn lookup(&self, candidate: &str) -> Option<NodeIndex> {
        if let Some((_, index)) = self.keys.iter().find(|(key, _)| key == candidate) {
            return Some(*index);
        }
        self.keys
            .iter()
            .find(|(key, _)| {
                key.len() > candidate.len()
                    && key.ends_with(candidate)
                    && key.as_bytes()[key.len() - candidate.len() - 1] == b'.'
            })
            .map(|(_, index)| *index)
    }

    fn resolve_or_insert(&mut self, target: &str) -> NodeIndex {
        if let Some(index) = self.resolve_index(target) {
            return index;
        }
        if let Some(index) = self.externals.get(target) {
            return *index;
        }

        let index = self.graph.add_node(GraphNode::External(target.to_string()));
        self.externals.insert(target.to_string(), index);
        index
    }

    /// Module clusters in tree order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleCluster> {
        self.graph.node_weights().filter_map(|node| match node {
            GraphNode::Module(cluster) => Some(cluster),
            GraphNode::External(_) => None,
        })
    }

    /// Unresolved import targets
    pub fn external_targets(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().filter_map(|node| match node {
            GraphNode::External(target) => Some(target.as_str()),
            GraphNode::Module(_) => None,
        })
    }

    /// `(importer, target)` identifier pairs
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()].id(), self.graph[edge.target()].id()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Underlying petgraph graph
    pub fn graph(&self) -> &DiGraph<GraphNode, ()> {
        &self.graph
    }

    /// Export to DOT format for visualization
    pub fn to_dot(&self, title: &str) -> String {
        let mut dot = format!("digraph {} {{\n", quote(title));
        dot.push_str("  compound=true;\n");
        dot.push_str("  node [shape=box];\n\n");

        for node in self.graph.node_weights() {
            match node {
                GraphNode::Module(cluster) => {
                    let _ = writeln!(
                        dot,
                        "  subgraph {} {{\n    label={};\n    {} [label={}, shape=folder];",
                        quote(&format!("cluster_{}", cluster.qualified_name)),
                        quote(&cluster.qualified_name),
                        quote(&cluster.qualified_name),
                        quote(&cluster.name)
                    );
                    for class in &cluster.classes {
                        let _ = writeln!(
                            dot,
                            "    {} [label={}];",
                            quote(&format!("{}.{}", cluster.qualified_name, class)),
                            quote(class)
                        );
                    }
                    dot.push_str("  }\n");
                }
                GraphNode::External(target) => {
                    let _ = writeln!(dot, "  {} [shape=plaintext];", quote(target));
                }
            }
        }

        dot.push('\n');
        for (from, to) in self.edges() {
            let _ = writeln!(dot, "  {} -> {};", quote(from), quote(to));
        }

        dot.push_str("}\n");
        dot
    }
}

/// Modules under `node` paired with their qualified names, in tree order
fn collect_modules<'a>(node: &'a Node, path: &mut Vec<&'a str>, out: &mut Vec<(String, &'a Node)>) {
    match node.kind() {
        NodeKind::Package { .. } => {
            path.push(node.name());
            for child in node.children() {
                collect_modules(child, path, out);
            }
            path.pop();
        }
        NodeKind::Module { .. } => {
            let mut parts = path.clone();
            parts.push(node.name());
            out.push((parts.join("."), node));
        }
        _ => {}
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
