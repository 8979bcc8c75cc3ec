//! Docstring lookup and cleanup
//!
//! A docstring is the first statement of a module, class or function body
//! when that statement is a bare string literal (or an implicit
//! concatenation of string literals). Byte strings and f-strings never
//! count. The literal is decoded and its indentation normalized the same
//! way `inspect.cleandoc` does.

use std::iter::Peekable;
use std::str::Chars;

use tree_sitter::Node;

const TAB_SIZE: usize = 8;

/// Docstring of a `module` node or of a definition with a `body` field
pub fn docstring_of(node: Node<'_>, source: &str) -> Option<String> {
    let body = if node.kind() == "module" {
        node
    } else {
        node.child_by_field_name("body")?
    };

    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;

    let raw = match expr.kind() {
        "string" => decode_literal(text_of(expr, source)?)?,
        "concatenated_string" => {
            let mut joined = String::new();
            let mut parts = expr.walk();
            for part in expr.named_children(&mut parts) {
                if part.kind() == "string" {
                    joined.push_str(&decode_literal(text_of(part, source)?)?);
                }
            }
            joined
        }
        _ => return None,
    };

    Some(clean(&raw))
}

fn text_of<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    node.utf8_text(source.as_bytes()).ok()
}

/// Decode the text of one string literal, prefix and quotes included.
///
/// Returns `None` for byte strings and f-strings.
pub fn decode_literal(literal: &str) -> Option<String> {
    let prefix_len = literal
        .find(|c: char| c == '"' || c == '\'')
        .unwrap_or(literal.len());
    let (prefix, quoted) = literal.split_at(prefix_len);
    let prefix = prefix.to_ascii_lowercase();

    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let delimiter = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|d| quoted.len() >= 2 * d.len() && quoted.starts_with(d) && quoted.ends_with(d))?;
    let body = &quoted[delimiter.len()..quoted.len() - delimiter.len()];

    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Resolve Python escape sequences. Unrecognized or malformed escapes are
/// kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };

        let decoded = match escape {
            // line continuation
            '\n' => continue,
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0b}'),
            '0'..='7' => Some(octal_escape(escape, &mut chars)),
            'x' => hex_escape(&mut chars, 2),
            'u' => hex_escape(&mut chars, 4),
            'U' => hex_escape(&mut chars, 8),
            'N' => named_escape(&mut chars),
            _ => None,
        };

        match decoded {
            Some(ch) => out.push(ch),
            None => {
                out.push('\\');
                out.push(escape);
            }
        }
    }

    out
}

/// Up to three octal digits, the first already consumed
fn octal_escape(first: char, chars: &mut Peekable<Chars<'_>>) -> char {
    let mut value = first.to_digit(8).unwrap_or_default();
    for _ in 0..2 {
        match chars.peek().and_then(|d| d.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
            }
            None => break,
        }
    }
    // at most 0o777, always a scalar value
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Exactly `digits` hex digits naming a scalar value. Consumes nothing on
/// failure.
fn hex_escape(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let lookahead: String = chars.clone().take(digits).collect();
    if lookahead.len() != digits || !lookahead.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let ch = u32::from_str_radix(&lookahead, 16)
        .ok()
        .and_then(char::from_u32)?;
    chars.nth(digits - 1);
    Some(ch)
}

/// `{NAME}` looked up in the Unicode character name table. Consumes nothing
/// on failure.
fn named_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let mut lookahead = chars.clone();
    if lookahead.next() != Some('{') {
        return None;
    }
    let mut name = String::new();
    loop {
        match lookahead.next()? {
            '}' => break,
            c => name.push(c),
        }
    }
    let ch = unicode_names2::character(&name)?;
    *chars = lookahead;
    Some(ch)
}

/// Normalize docstring indentation like `inspect.cleandoc`
pub fn clean(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start().chars().count();
            (content > 0).then(|| line.chars().count() - content)
        })
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();

    lines[leading..].join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;

    for c in line.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }

    out
}
