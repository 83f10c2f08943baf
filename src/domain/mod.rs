//! Core domain types and models
//!
//! Defines the language profiles, output format and the run configuration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// Branch used when neither the CLI nor the config names one.
pub const DEFAULT_REF: &str = "master";

/// Minimum number of substantive lines a file needs to be kept.
pub const DEFAULT_MIN_LINES: usize = 10;

/// Content emitted in the README slot of structured output when the archive has none.
pub const README_PLACEHOLDER: &str = "No README file found.";

/// Target language selected for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Go,
    Javascript,
    Rust,
    Markdown,
}

impl Language {
    pub const ALL: [Language; 5] =
        [Language::Python, Language::Go, Language::Javascript, Language::Rust, Language::Markdown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "go",
            Language::Javascript => "javascript",
            Language::Rust => "rust",
            Language::Markdown => "markdown",
        }
    }

    /// Built-in rule table for this language.
    pub fn profile(&self) -> &'static LanguageProfile {
        &PROFILES[self]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "go" | "golang" => Ok(Language::Go),
            "javascript" | "js" | "typescript" | "ts" => Ok(Language::Javascript),
            "rust" | "rs" => Ok(Language::Rust),
            "markdown" | "md" => Ok(Language::Markdown),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Per-language selection rules and rendering details.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageProfile {
    /// Accepted file extensions (with leading dot)
    pub extensions: &'static [&'static str],

    /// Directory names excluded in addition to [`BASE_EXCLUDED_DIRS`]
    pub excluded_dirs: &'static [&'static str],

    /// Path fragments excluded in addition to [`BASE_DENYLIST`]
    pub denylist: &'static [&'static str],

    /// Substrings whose presence marks a file as test code
    pub test_markers: &'static [&'static str],

    /// Line prefixes that don't count towards the substantive line total
    pub comment_markers: &'static [&'static str],

    /// Comment prefix used for the plain-mode file banner
    pub banner_prefix: &'static str,
}

pub const BASE_EXCLUDED_DIRS: &[&str] =
    &["examples", "tests", "test", "scripts", "utils", "benchmarks"];

pub const BASE_DENYLIST: &[&str] =
    &[".github", "LICENSE", "README", "stale.py", "gen-card-", "write_model_card"];

const CODE_COMMENT_MARKERS: &[&str] = &["#", "//"];

static PROFILES: Lazy<BTreeMap<Language, LanguageProfile>> = Lazy::new(|| {
    BTreeMap::from([
        (
            Language::Python,
            LanguageProfile {
                extensions: &[".py", ".pyw"],
                excluded_dirs: &["docs", "__pycache__", ".venv", "venv", "site-packages"],
                denylist: &["hubconf.py", "setup.py", "conftest.py"],
                test_markers: &["import unittest", "import pytest", "from unittest", "from pytest"],
                comment_markers: CODE_COMMENT_MARKERS,
                banner_prefix: "#",
            },
        ),
        (
            Language::Go,
            LanguageProfile {
                extensions: &[".go"],
                excluded_dirs: &["docs", "vendor", "testdata"],
                denylist: &["go.mod", "go.sum", ".pb.go"],
                test_markers: &["\"testing\"", "func Test"],
                comment_markers: CODE_COMMENT_MARKERS,
                banner_prefix: "//",
            },
        ),
        (
            Language::Javascript,
            LanguageProfile {
                extensions: &[".js", ".jsx", ".ts", ".tsx"],
                excluded_dirs: &["docs", "node_modules", "dist", "build", "coverage", "__mocks__"],
                denylist: &["package-lock.json", ".min.js", ".config.js", ".d.ts"],
                test_markers: &[
                    "@jest/globals",
                    "from 'vitest'",
                    "from \"vitest\"",
                    "describe('",
                    "describe(\"",
                ],
                comment_markers: CODE_COMMENT_MARKERS,
                banner_prefix: "//",
            },
        ),
        (
            Language::Rust,
            LanguageProfile {
                extensions: &[".rs"],
                excluded_dirs: &["docs", "target", "benches"],
                denylist: &["build.rs"],
                test_markers: &[],
                comment_markers: CODE_COMMENT_MARKERS,
                banner_prefix: "//",
            },
        ),
        (
            Language::Markdown,
            LanguageProfile {
                extensions: &[".md"],
                excluded_dirs: &[],
                denylist: &["CHANGELOG", "CODE_OF_CONDUCT"],
                test_markers: &[],
                comment_markers: &[],
                banner_prefix: "#",
            },
        ),
    ])
});

/// Output format for the concatenated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Banner line per file followed by its content
    #[default]
    Plain,
    /// `<documents>` wrapper with indexed `<document>` children
    Documents,
}

/// What to do with a selected file whose bytes are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    #[default]
    Skip,
    Fail,
}

/// Main configuration for repo2file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repo_url: Option<String>,

    #[serde(default = "default_ref", rename = "ref")]
    pub ref_: String,

    /// Treat `ref_` as a tag rather than a branch
    #[serde(default)]
    pub tag: bool,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub keep_comments: bool,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_min_lines")]
    pub min_lines: usize,

    #[serde(default)]
    pub decode_policy: DecodePolicy,

    #[serde(default)]
    pub extra_excluded_dirs: Vec<String>,

    #[serde(default)]
    pub extra_denylist: Vec<String>,

    #[serde(default)]
    pub exclude_globs: Vec<String>,

    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Access token for private repositories
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: None,
            ref_: default_ref(),
            tag: false,
            language: Language::default(),
            keep_comments: false,
            format: OutputFormat::default(),
            min_lines: default_min_lines(),
            decode_policy: DecodePolicy::default(),
            extra_excluded_dirs: Vec::new(),
            extra_denylist: Vec::new(),
            exclude_globs: Vec::new(),
            output: None,
            token: None,
        }
    }
}

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

fn default_min_lines() -> usize {
    DEFAULT_MIN_LINES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_aliases_parse() {
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("TypeScript".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!(" golang ".parse::<Language>().unwrap(), Language::Go);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ref name) if name == "cobol"));
    }

    #[test]
    fn every_language_has_a_profile() {
        for language in Language::ALL {
            let profile = language.profile();
            assert!(!profile.extensions.is_empty(), "{language} has no extensions");
            assert!(profile.extensions.iter().all(|ext| ext.starts_with('.')));
        }
    }

    #[test]
    fn banner_prefix_follows_comment_style() {
        assert_eq!(Language::Go.profile().banner_prefix, "//");
        assert_eq!(Language::Python.profile().banner_prefix, "#");
        assert_eq!(Language::Markdown.profile().banner_prefix, "#");
    }

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.ref_, "master");
        assert_eq!(config.min_lines, 10);
        assert_eq!(config.format, OutputFormat::Plain);
        assert_eq!(config.decode_policy, DecodePolicy::Skip);
    }
}
