//! Declaration extraction from Python syntax trees
//!
//! Walks the whole tree in pre-order, so declarations come out in source
//! order and nested classes, functions and imports are flattened into a
//! single list.

use tree_sitter::Node as SyntaxNode;

use super::docstring::docstring_of;
use crate::models::node::Node;

/// A declaration found in one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Import {
        target: String,
        alias: Option<String>,
    },
    Class {
        name: String,
        docstring: Option<String>,
    },
    Function {
        name: String,
        docstring: Option<String>,
        arguments: Vec<String>,
    },
}

impl Declaration {
    /// Convert into the matching leaf node
    pub fn into_node(self) -> Node {
        match self {
            Declaration::Import { target, alias } => Node::import(target, alias),
            Declaration::Class { name, docstring } => Node::class(name, docstring),
            Declaration::Function {
                name,
                docstring,
                arguments,
            } => Node::function(name, docstring, arguments),
        }
    }
}

/// Extract every import, class and function declaration below `root`
pub fn extract_declarations(root: SyntaxNode<'_>, source: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut cursor = root.walk();

    loop {
        visit(cursor.node(), source, &mut declarations);

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return declarations;
            }
        }
    }
}

fn visit(node: SyntaxNode<'_>, source: &str, out: &mut Vec<Declaration>) {
    match node.kind() {
        "import_statement" => extract_import(node, source, out),
        "import_from_statement" | "future_import_statement" => {
            extract_from_import(node, source, out)
        }
        "class_definition" => {
            if let Some(name) = field_text(node, "name", source) {
                out.push(Declaration::Class {
                    name,
                    docstring: docstring_of(node, source),
                });
            }
        }
        "function_definition" => {
            if let Some(name) = field_text(node, "name", source) {
                let arguments = node
                    .child_by_field_name("parameters")
                    .map(|params| positional_arguments(params, source))
                    .unwrap_or_default();
                out.push(Declaration::Function {
                    name,
                    docstring: docstring_of(node, source),
                    arguments,
                });
            }
        }
        _ => {}
    }
}

/// `import a.b`, `import a.b as c`
fn extract_import(node: SyntaxNode<'_>, source: &str, out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        if let Some((target, alias)) = imported_name(name, source) {
            out.push(Declaration::Import { target, alias });
        }
    }
}

/// `from X import Y [as Z]`, relative and `__future__` forms included.
///
/// The target joins the declared module and the imported name with a dot.
/// For relative imports the leading dots are dropped, so `from . import y`
/// targets `y`.
fn extract_from_import(node: SyntaxNode<'_>, source: &str, out: &mut Vec<Declaration>) {
    let prefix = if node.kind() == "future_import_statement" {
        "__future__".to_string()
    } else {
        node.child_by_field_name("module_name")
            .and_then(|module| declared_module(module, source))
            .unwrap_or_default()
    };

    let mut cursor = node.walk();
    let names: Vec<SyntaxNode<'_>> = node.children_by_field_name("name", &mut cursor).collect();

    if names.is_empty() {
        let mut cursor = node.walk();
        let wildcard = node
            .children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import");
        if wildcard {
            out.push(Declaration::Import {
                target: qualify(&prefix, "*"),
                alias: None,
            });
        }
        return;
    }

    for name in names {
        if let Some((member, alias)) = imported_name(name, source) {
            out.push(Declaration::Import {
                target: qualify(&prefix, &member),
                alias,
            });
        }
    }
}

/// Module component of a `from` clause, without relative dots
fn declared_module(module: SyntaxNode<'_>, source: &str) -> Option<String> {
    match module.kind() {
        "dotted_name" => text(module, source),
        "relative_import" => {
            let mut cursor = module.walk();
            let dotted = module
                .named_children(&mut cursor)
                .find(|child| child.kind() == "dotted_name");
            dotted.and_then(|dotted| text(dotted, source))
        }
        _ => None,
    }
}

/// Name and optional alias of a `dotted_name` or `aliased_import`
fn imported_name(node: SyntaxNode<'_>, source: &str) -> Option<(String, Option<String>)> {
    match node.kind() {
        "dotted_name" | "identifier" => text(node, source).map(|name| (name, None)),
        "aliased_import" => {
            let name = field_text(node, "name", source)?;
            let alias = field_text(node, "alias", source);
            Some((name, alias))
        }
        _ => None,
    }
}

fn qualify(prefix: &str, member: &str) -> String {
    if prefix.is_empty() {
        member.to_string()
    } else {
        format!("{}.{}", prefix, member)
    }
}

/// Positional parameter names, positional-only ones included.
///
/// Collection stops at the first `*`, `*args` or `**kwargs`; everything
/// after it is keyword-only.
fn positional_arguments(parameters: SyntaxNode<'_>, source: &str) -> Vec<String> {
    let mut arguments = Vec::new();
    let mut cursor = parameters.walk();

    for param in parameters.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => arguments.extend(text(param, source)),
            "default_parameter" | "typed_default_parameter" => {
                arguments.extend(field_text(param, "name", source));
            }
            "typed_parameter" => {
                let Some(inner) = param.named_child(0) else {
                    continue;
                };
                if inner.kind() != "identifier" {
                    break;
                }
                arguments.extend(text(inner, source));
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }

    arguments
}

fn field_text(node: SyntaxNode<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| text(child, source))
}

fn text(node: SyntaxNode<'_>, source: &str) -> Option<String> {
    node.utf8_text(source.as_bytes()).ok().map(str::to_string)
}
