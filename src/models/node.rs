//! Structural node hierarchy for mapped source trees
//!
//! A [`Node`] carries a name, an optional docstring and an ordered list of
//! owned children. What kind of structural element it represents lives in
//! [`NodeKind`]. Equality is deep and structural: two nodes are equal when
//! their kinds, names, docstrings, variant data and whole child sequences
//! (recursively, in order) are equal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{handle_error, GraphError};

/// Variant-specific data of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory holding at least one module or sub-package
    Package { filepath: PathBuf },
    /// A single source file
    Module { filepath: PathBuf },
    /// A class declaration
    Class,
    /// A function declaration with its positional argument names
    Function { arguments: Vec<String> },
    /// An import; the node name is the import target
    Import { alias: String },
}

impl NodeKind {
    /// Short lowercase label of the variant
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Package { .. } => "package",
            NodeKind::Module { .. } => "module",
            NodeKind::Class => "class",
            NodeKind::Function { .. } => "function",
            NodeKind::Import { .. } => "import",
        }
    }
}

/// A node of the mapped source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    docstring: Option<String>,
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    fn new(name: impl Into<String>, docstring: Option<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            docstring,
            kind,
            children: Vec::new(),
        }
    }

    /// Create a package node for a directory
    pub fn package(name: impl Into<String>, filepath: impl Into<PathBuf>) -> Self {
        Self::new(name, None, NodeKind::Package { filepath: filepath.into() })
    }

    /// Create a module node for a source file
    pub fn module(
        name: impl Into<String>,
        docstring: Option<String>,
        filepath: impl Into<PathBuf>,
    ) -> Self {
        Self::new(name, docstring, NodeKind::Module { filepath: filepath.into() })
    }

    /// Create a class node
    pub fn class(name: impl Into<String>, docstring: Option<String>) -> Self {
        Self::new(name, docstring, NodeKind::Class)
    }

    /// Create a function node
    pub fn function(
        name: impl Into<String>,
        docstring: Option<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self::new(name, docstring, NodeKind::Function { arguments })
    }

    /// Create an import node. Without an alias the alias is the target name.
    pub fn import(name: impl Into<String>, alias: Option<String>) -> Self {
        let name = name.into();
        let alias = alias.unwrap_or_else(|| name.clone());
        Self::new(name, None, NodeKind::Import { alias })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True iff the node has no children
    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child; no uniqueness check
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Remove the first child structurally equal to `target`.
    ///
    /// A missing child is reported through the log and yields `None`.
    pub fn remove_child(&mut self, target: &Node) -> Option<Node> {
        match self.children.iter().position(|child| child == target) {
            Some(index) => Some(self.children.remove(index)),
            None => {
                handle_error(GraphError::node_not_found(target.name()));
                None
            }
        }
    }

    /// First child with the given name
    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, NodeKind::Package { .. })
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, NodeKind::Module { .. })
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, NodeKind::Class)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function { .. })
    }

    pub fn is_import(&self) -> bool {
        matches!(self.kind, NodeKind::Import { .. })
    }

    /// Filesystem path of a package or module
    pub fn filepath(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::Package { filepath } | NodeKind::Module { filepath } => Some(filepath),
            _ => None,
        }
    }

    /// Replace the path of a package or module. Returns false for other kinds.
    pub fn set_filepath(&mut self, path: impl Into<PathBuf>) -> bool {
        match &mut self.kind {
            NodeKind::Package { filepath } | NodeKind::Module { filepath } => {
                *filepath = path.into();
                true
            }
            _ => false,
        }
    }

    /// Positional argument names of a function
    pub fn arguments(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::Function { arguments } => Some(arguments),
            _ => None,
        }
    }

    /// Name the import is bound to
    pub fn alias(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Import { alias } => Some(alias),
            _ => None,
        }
    }

    /// Rebind an import. Returns false for other kinds.
    pub fn set_alias(&mut self, value: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::Import { alias } => {
                *alias = value.into();
                true
            }
            _ => false,
        }
    }

    /// Reset an import's alias to its target name. Returns false for other kinds.
    pub fn clear_alias(&mut self) -> bool {
        let name = self.name.clone();
        self.set_alias(name)
    }

    /// Pre-order iterator over this node and all its descendants
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Count nodes of each kind in this subtree, this node included
    pub fn counts(&self) -> NodeCounts {
        let mut counts = NodeCounts::default();
        for node in self.walk() {
            match node.kind {
                NodeKind::Package { .. } => counts.packages += 1,
                NodeKind::Module { .. } => counts.modules += 1,
                NodeKind::Class => counts.classes += 1,
                NodeKind::Function { .. } => counts.functions += 1,
                NodeKind::Import { .. } => counts.imports += 1,
            }
        }
        counts
    }
}

/// Depth-first, pre-order traversal of a subtree
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Number of nodes per kind in a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounts {
    pub packages: usize,
    pub modules: usize,
    pub classes: usize,
    pub functions: usize,
    pub imports: usize,
}

impl NodeCounts {
    pub fn total(&self) -> usize {
        self.packages + self.modules + self.classes + self.functions + self.imports
    }
}
