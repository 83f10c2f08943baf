//! Source normalization
//!
//! A normalizer rewrites a selected file before it is emitted. Each grammar
//! the crate links gets one; everything else falls through to [`Passthrough`].

mod comments;
mod edits;
mod python;

use thiserror::Error;

pub use comments::{CommentStripper, Grammar};
pub use python::PythonNormalizer;

use crate::utils::extension_of;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("failed to load the {language} grammar")]
    Grammar { language: &'static str },

    #[error("source does not parse as {language}")]
    Syntax { language: &'static str },

    #[error("normalized output no longer parses as {language}")]
    Unparseable { language: &'static str },
}

pub trait SourceNormalizer: Sync {
    /// Grammar name used in log output
    fn name(&self) -> &'static str;

    fn normalize(&self, source: &str) -> Result<String, NormalizeError>;
}

/// Returns the input unchanged.
pub struct Passthrough;

impl SourceNormalizer for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn normalize(&self, source: &str) -> Result<String, NormalizeError> {
        Ok(source.to_string())
    }
}

static PYTHON: PythonNormalizer = PythonNormalizer;
static GO: CommentStripper = CommentStripper::new(Grammar::Go);
static JAVASCRIPT: CommentStripper = CommentStripper::new(Grammar::JavaScript);
static TYPESCRIPT: CommentStripper = CommentStripper::new(Grammar::TypeScript);
static TSX: CommentStripper = CommentStripper::new(Grammar::Tsx);
static RUST: CommentStripper = CommentStripper::new(Grammar::Rust);
static PASSTHROUGH: Passthrough = Passthrough;

/// Pick the normalizer for a path by its extension.
pub fn normalizer_for(path: &str) -> &'static dyn SourceNormalizer {
    match extension_of(path).as_str() {
        ".py" | ".pyw" => &PYTHON,
        ".go" => &GO,
        ".js" | ".jsx" | ".mjs" | ".cjs" => &JAVASCRIPT,
        ".ts" | ".mts" | ".cts" => &TYPESCRIPT,
        ".tsx" => &TSX,
        ".rs" => &RUST,
        _ => &PASSTHROUGH,
    }
}
