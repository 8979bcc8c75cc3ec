//! Output formatting functionality
//!
//! This module provides formatters for different output formats.

use std::fmt::Write as _;

use crate::error::Result;
use crate::models::import_graph::ImportGraph;
use crate::models::node::{Node, NodeKind};
use crate::models::report::MappingReport;

const INDENT: &str = "  ";

/// Format a node tree as an indented listing, one node per line
pub fn format_tree_text(root: &Node, show_docstrings: bool) -> String {
    let mut output = String::new();
    write_node(&mut output, root, 0, show_docstrings);
    output
}

fn write_node(output: &mut String, node: &Node, depth: usize, show_docstrings: bool) {
    let indent = INDENT.repeat(depth);

    let line = match node.kind() {
        NodeKind::Package { filepath } => {
            format!("package {} ({})", node.name(), filepath.display())
        }
        NodeKind::Module { filepath } => {
            format!("module {} ({})", node.name(), filepath.display())
        }
        NodeKind::Class => format!("class {}", node.name()),
        NodeKind::Function { arguments } => {
            format!("def {}({})", node.name(), arguments.join(", "))
        }
        NodeKind::Import { alias } if alias != node.name() => {
            format!("import {} as {}", node.name(), alias)
        }
        NodeKind::Import { .. } => format!("import {}", node.name()),
    };
    let _ = writeln!(output, "{}{}", indent, line);

    if show_docstrings {
        if let Some(summary) = node.docstring().and_then(|doc| doc.lines().next()) {
            let _ = writeln!(output, "{}{}\"{}\"", indent, INDENT, summary);
        }
    }

    for child in node.children() {
        write_node(output, child, depth + 1, show_docstrings);
    }
}

/// Format a mapping report as text: the tree, a summary, then diagnostics
pub fn format_report_text(report: &MappingReport, verbose: bool) -> String {
    let mut output = String::new();

    match &report.tree {
        Some(tree) => output.push_str(&format_tree_text(tree, verbose)),
        None => {
            let _ = writeln!(output, "Nothing to map under {}", report.root.display());
        }
    }

    let counts = &report.counts;
    let _ = writeln!(
        output,
        "\n{} packages, {} modules, {} classes, {} functions, {} imports",
        counts.packages, counts.modules, counts.classes, counts.functions, counts.imports
    );
    let _ = writeln!(output, "Scan duration: {:.2?}", report.scan_duration);

    if !report.diagnostics.is_empty() {
        let _ = writeln!(output, "\nSkipped entries: {}", report.diagnostics.len());
        if verbose {
            for diagnostic in &report.diagnostics {
                let _ = writeln!(
                    output,
                    "  [{}] {}: {}",
                    diagnostic.severity,
                    diagnostic.path.display(),
                    diagnostic.message
                );
            }
        }
    }

    output
}

/// Format a mapping report as JSON
pub fn format_report_json(report: &MappingReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Format the import graph of a mapped tree as Graphviz DOT
pub fn format_report_dot(report: &MappingReport) -> String {
    let title = report
        .tree
        .as_ref()
        .map(|tree| tree.name().to_string())
        .unwrap_or_default();

    match &report.tree {
        Some(tree) => ImportGraph::from_tree(tree).to_dot(&title),
        None => ImportGraph::default().to_dot(&title),
    }
}
