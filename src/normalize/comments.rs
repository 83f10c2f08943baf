//! Comment stripping for C-style grammars.

use tree_sitter::{Language, Node, Parser};

use super::edits::{comment_edit, EditSet};
use super::{NormalizeError, SourceNormalizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Go,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
}

impl Grammar {
    fn name(&self) -> &'static str {
        match self {
            Grammar::Go => "go",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
            Grammar::Rust => "rust",
        }
    }

    fn language(&self) -> Language {
        match self {
            Grammar::Go => tree_sitter_go::LANGUAGE.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    fn is_comment(&self, kind: &str) -> bool {
        match self {
            Grammar::Rust => matches!(kind, "line_comment" | "block_comment"),
            _ => kind == "comment",
        }
    }
}

/// Removes every comment node, except Go compiler directives and cgo preambles.
pub struct CommentStripper {
    grammar: Grammar,
}

impl CommentStripper {
    pub const fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }
}

impl SourceNormalizer for CommentStripper {
    fn name(&self) -> &'static str {
        self.grammar.name()
    }

    fn normalize(&self, source: &str) -> Result<String, NormalizeError> {
        let language = self.grammar.language();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|_| NormalizeError::Grammar { language: self.name() })?;
        let tree = parser.parse(source, None).ok_or(NormalizeError::Syntax { language: self.name() })?;
        if tree.root_node().has_error() {
            return Err(NormalizeError::Syntax { language: self.name() });
        }

        let mut edits = EditSet::new();
        self.collect(tree.root_node(), source, &mut edits);
        Ok(edits.apply(source))
    }
}

impl CommentStripper {
    fn collect(&self, node: Node, source: &str, edits: &mut EditSet) {
        if self.grammar.is_comment(node.kind()) {
            if !self.keep(node, source) {
                edits.push(comment_edit(source, node.start_byte(), node.end_byte()));
            }
            return;
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect(child, source, edits);
        }
    }

    fn keep(&self, node: Node, source: &str) -> bool {
        if self.grammar != Grammar::Go {
            return false;
        }
        let text = &source[node.start_byte()..node.end_byte()];
        if text.starts_with("//go:") || text.starts_with("// +build") {
            return true;
        }
        // A comment block directly above `import "C"` is C code, not commentary.
        let mut next = node.next_named_sibling();
        while let Some(sibling) = next {
            if sibling.kind() != "comment" {
                let sibling_text = &source[sibling.start_byte()..sibling.end_byte()];
                return sibling.kind() == "import_declaration" && sibling_text.contains("\"C\"");
            }
            next = sibling.next_named_sibling();
        }
        false
    }
}
