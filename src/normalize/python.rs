//! Python docstring and comment stripping.

use std::collections::HashSet;
use tree_sitter::{Language, Node, Parser, Tree};

use super::edits::{comment_edit, delete_lines, line_end, occupies_whole_lines, Edit, EditSet};
use super::{NormalizeError, SourceNormalizer};

/// Strips docstrings, comment-like string statements and `#` comments.
pub struct PythonNormalizer;

impl SourceNormalizer for PythonNormalizer {
    fn name(&self) -> &'static str {
        "python"
    }

    fn normalize(&self, source: &str) -> Result<String, NormalizeError> {
        let tree = parse(source)?;
        let mut edits = EditSet::new();
        let mut docstrings = HashSet::new();
        collect_edits(tree.root_node(), source, &mut edits, &mut docstrings);
        if edits.is_empty() {
            return Ok(source.to_string());
        }

        let normalized = edits.apply(source);
        if parse(&normalized)?.root_node().has_error() {
            return Err(NormalizeError::Unparseable { language: self.name() });
        }
        Ok(normalized)
    }
}

fn parse(source: &str) -> Result<Tree, NormalizeError> {
    let language: Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|_| NormalizeError::Grammar { language: "python" })?;
    let tree = parser.parse(source, None).ok_or(NormalizeError::Syntax { language: "python" })?;
    if tree.root_node().has_error() || contains_python2_statement(tree.root_node()) {
        return Err(NormalizeError::Syntax { language: "python" });
    }
    Ok(tree)
}

/// The grammar still accepts Python 2 `print`/`exec` statements; Python 3 does not.
fn contains_python2_statement(node: Node) -> bool {
    if matches!(node.kind(), "print_statement" | "exec_statement") {
        return true;
    }
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(contains_python2_statement);
    found
}

fn collect_edits(node: Node, source: &str, edits: &mut EditSet, docstrings: &mut HashSet<usize>) {
    match node.kind() {
        "comment" => {
            edits.push(comment_edit(source, node.start_byte(), node.end_byte()));
            return;
        }
        "function_definition" | "class_definition" => {
            if let Some(body) = node.child_by_field_name("body") {
                remove_docstring(body, source, edits, docstrings);
            }
        }
        "expression_statement" => {
            if docstrings.contains(&node.id()) {
                return;
            }
            if let Some(literal) = string_literal(node, source) {
                if node_text(literal, source) != "\"\"" {
                    edits.push(Edit {
                        start: literal.start_byte(),
                        end: literal.end_byte(),
                        replacement: "\"\"".to_string(),
                    });
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_edits(child, source, edits, docstrings);
    }
}

/// Drop the first statement of `body` if it is a non-empty string literal.
///
/// Later string statements are left for [`collect_edits`] to blank out, so
/// the statement count of the body only ever shrinks by one.
fn remove_docstring(body: Node, source: &str, edits: &mut EditSet, docstrings: &mut HashSet<usize>) {
    let statements = statements_of(body);
    let Some(first) = statements.first().copied() else {
        return;
    };
    let Some(literal) = string_literal(first, source) else {
        return;
    };
    if is_empty_literal(node_text(literal, source)) {
        return;
    }

    let (start, end) = (first.start_byte(), first.end_byte());
    let whole_lines = occupies_whole_lines(source, start, end, "#");
    let edit = if statements.len() > 1 && whole_lines {
        delete_lines(source, start, end)
    } else if whole_lines {
        // Sole statement: keep the block valid. Any trailing comment goes too.
        Edit {
            start,
            end: line_end(source, end),
            replacement: "pass".to_string(),
        }
    } else {
        Edit { start, end, replacement: "pass".to_string() }
    };
    edits.push(edit);
    docstrings.insert(first.id());
}

fn statements_of(block: Node) -> Vec<Node> {
    let mut cursor = block.walk();
    let statements = block.named_children(&mut cursor).filter(|child| child.kind() != "comment").collect();
    statements
}

/// The literal of a bare string statement, if `node` is one.
fn string_literal<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    if node.kind() != "expression_statement" {
        return None;
    }
    let children = statements_of(node);
    let [first] = children.as_slice() else {
        return None;
    };
    let mut literal = *first;
    while literal.kind() == "parenthesized_expression" {
        let inner = statements_of(literal);
        let [only] = inner.as_slice() else {
            return None;
        };
        literal = *only;
    }
    match literal.kind() {
        "string" if is_plain_string(node_text(literal, source)) => Some(literal),
        "concatenated_string" => {
            let mut cursor = literal.walk();
            let parts: Vec<Node> = literal
                .named_children(&mut cursor)
                .filter(|part| part.kind() != "comment")
                .collect();
            parts
                .iter()
                .all(|part| part.kind() == "string" && is_plain_string(node_text(*part, source)))
                .then_some(literal)
        }
        _ => None,
    }
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.start_byte()..node.end_byte()]
}

fn string_prefix(text: &str) -> &str {
    let quote = text.find(['"', '\'']).unwrap_or(text.len());
    &text[..quote]
}

/// Text strings only: f-strings are expressions and bytes are not text.
fn is_plain_string(text: &str) -> bool {
    let prefix = string_prefix(text).to_ascii_lowercase();
    !prefix.contains('f') && !prefix.contains('b')
}

fn is_empty_literal(text: &str) -> bool {
    let body = &text[string_prefix(text).len()..];
    let inner = if body.starts_with("\"\"\"") || body.starts_with("'''") {
        body.get(3..body.len().saturating_sub(3))
    } else {
        body.get(1..body.len().saturating_sub(1))
    };
    inner.map_or(true, |text| text.trim().is_empty())
}
