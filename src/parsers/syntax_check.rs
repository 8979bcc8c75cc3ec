//! Rejection of source that tree-sitter accepts but Python 3 does not
//!
//! The grammar is permissive. Besides reporting ERROR and MISSING nodes it
//! still knows Python 2 statements, backquote and long integer literals, and
//! its indentation scanner lets a dedent land on a column that no enclosing
//! block uses. CPython refuses to compile any of these, so a file containing
//! one counts as unparsable.

use std::fmt;

use tree_sitter::Node;

const TAB_SIZE: usize = 8;

const CLAUSES: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
];

const UNEXPECTED_INDENT: &str = "unexpected indent";
const UNMATCHED_DEDENT: &str = "unindent does not match any outer indentation level";

/// A construct that makes a module fail to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub message: String,
    /// Zero-based
    pub row: usize,
    /// Zero-based, in bytes
    pub column: usize,
}

impl SyntaxIssue {
    fn at(node: Node<'_>, message: impl Into<String>) -> Self {
        let position = node.start_position();
        Self {
            message: message.into(),
            row: position.row,
            column: position.column,
        }
    }
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.row + 1, self.column + 1)
    }
}

/// First problem in the tree, if any.
///
/// Parse errors take precedence over the Python 3 checks, since error
/// recovery can leave statements at odd indentation.
pub fn first_syntax_issue(root: Node<'_>, source: &str) -> Option<SyntaxIssue> {
    if root.has_error() {
        let issue = match first_error(root) {
            Some(node) if node.is_missing() => SyntaxIssue::at(node, format!("missing {}", node.kind())),
            Some(node) => SyntaxIssue::at(node, "invalid syntax"),
            None => SyntaxIssue::at(root, "invalid syntax"),
        };
        return Some(issue);
    }

    let mut cursor = root.walk();
    loop {
        if let Some(issue) = check_node(cursor.node(), source) {
            return Some(issue);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// First ERROR or MISSING node in pre-order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn check_node(node: Node<'_>, source: &str) -> Option<SyntaxIssue> {
    match node.kind() {
        // `print >>f, x` is still a valid (if useless) Python 3 expression
        "print_statement" if !has_child(node, "chevron") => {
            Some(SyntaxIssue::at(node, "Python 2 print statement"))
        }
        "exec_statement" => Some(SyntaxIssue::at(node, "Python 2 exec statement")),
        "string" if source.as_bytes().get(node.start_byte()) == Some(&b'`') => {
            Some(SyntaxIssue::at(node, "backquote expression"))
        }
        "integer" => check_integer(node, source),
        "module" | "block" => check_block(node, source),
        kind if CLAUSES.contains(&kind) => check_clause(node, source),
        _ => None,
    }
}

fn has_child(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

fn check_integer(node: Node<'_>, source: &str) -> Option<SyntaxIssue> {
    let text = node.utf8_text(source.as_bytes()).ok()?;

    if text.ends_with(|c: char| c == 'l' || c == 'L') {
        return Some(SyntaxIssue::at(node, "long integer suffix"));
    }

    // 0o777 spells octal; 0777 is only legal as an imaginary literal
    let mut chars = text.chars();
    let leading_zero =
        chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit() || c == '_');
    if leading_zero
        && !text.ends_with(|c: char| c == 'j' || c == 'J')
        && text.chars().any(|c| c != '0' && c != '_')
    {
        return Some(SyntaxIssue::at(node, "leading zeros in decimal integer literal"));
    }

    None
}

/// Statements of one suite that begin a line must share an indentation.
/// Top-level statements sit at column zero.
fn check_block(node: Node<'_>, source: &str) -> Option<SyntaxIssue> {
    let mut expected = (node.kind() == "module").then_some(0);
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        let Some(width) = line_indent(child, source) else {
            continue;
        };
        match expected {
            None => expected = Some(width),
            Some(level) if width > level => return Some(SyntaxIssue::at(child, UNEXPECTED_INDENT)),
            Some(level) if width < level => return Some(SyntaxIssue::at(child, UNMATCHED_DEDENT)),
            Some(_) => {}
        }
    }

    None
}

/// `elif`, `else`, `except` and `finally` line up with their statement
fn check_clause(node: Node<'_>, source: &str) -> Option<SyntaxIssue> {
    let parent = node.parent()?;
    let width = line_indent(node, source)?;
    let level = line_indent(parent, source)?;

    match width.cmp(&level) {
        std::cmp::Ordering::Greater => Some(SyntaxIssue::at(node, UNEXPECTED_INDENT)),
        std::cmp::Ordering::Less => Some(SyntaxIssue::at(node, UNMATCHED_DEDENT)),
        std::cmp::Ordering::Equal => None,
    }
}

/// Indentation width of the line `node` starts, or `None` when anything
/// other than whitespace precedes it on its logical line
fn line_indent(node: Node<'_>, source: &str) -> Option<usize> {
    let before = source.get(..node.start_byte())?;
    let line_start = before.rfind(|c: char| c == '\n' || c == '\r').map_or(0, |i| i + 1);

    let mut width = 0;
    for c in before[line_start..].chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
            '\x0c' => width = 0,
            _ => return None,
        }
    }

    // a backslash-joined line continues the previous logical line
    let previous = &before[..line_start];
    let previous = previous.strip_suffix('\n').unwrap_or(previous);
    let previous = previous.strip_suffix('\r').unwrap_or(previous);
    if previous.ends_with('\\') {
        return None;
    }

    Some(width)
}
