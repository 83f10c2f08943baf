//! Per-entry inclusion rules
//!
//! Rules run in a fixed order and stop at the first failure. Path rules come
//! first so content is never decoded for entries that would be dropped anyway.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::domain::{Config, Language, LanguageProfile, BASE_DENYLIST, BASE_EXCLUDED_DIRS};
use crate::error::Result;
use crate::utils::{decode_text, extension_of};

/// Why an entry was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    DisallowedExtension,
    HiddenPath,
    TestPath,
    ExcludedDirectory,
    DenylistedFilename,
    ExcludedGlob,
    Undecodable,
    TestContent,
    InsufficientContent,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::DisallowedExtension => "extension",
            RejectReason::HiddenPath => "hidden path",
            RejectReason::TestPath => "test path",
            RejectReason::ExcludedDirectory => "excluded directory",
            RejectReason::DenylistedFilename => "denylisted name",
            RejectReason::ExcludedGlob => "exclude glob",
            RejectReason::Undecodable => "undecodable",
            RejectReason::TestContent => "test content",
            RejectReason::InsufficientContent => "too short",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDecision {
    Include,
    Reject(RejectReason),
}

impl SelectionDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, SelectionDecision::Include)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            SelectionDecision::Include => None,
            SelectionDecision::Reject(reason) => Some(*reason),
        }
    }
}

/// Outcome of running every rule against a raw entry
#[derive(Debug)]
pub enum Evaluation<'a> {
    Selected(Cow<'a, str>),
    Rejected(RejectReason),
}

impl Evaluation<'_> {
    pub fn decision(&self) -> SelectionDecision {
        match self {
            Evaluation::Selected(_) => SelectionDecision::Include,
            Evaluation::Rejected(reason) => SelectionDecision::Reject(*reason),
        }
    }
}

/// Decides which archive entries end up in the output
pub struct Selector {
    profile: &'static LanguageProfile,
    extra_excluded_dirs: Vec<String>,
    extra_denylist: Vec<String>,
    exclude_globs: Option<GlobSet>,
    min_lines: usize,
}

impl Selector {
    pub fn new(language: Language) -> Self {
        Self {
            profile: language.profile(),
            extra_excluded_dirs: Vec::new(),
            extra_denylist: Vec::new(),
            exclude_globs: None,
            min_lines: crate::domain::DEFAULT_MIN_LINES,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Selector::new(config.language)
            .min_lines(config.min_lines)
            .extra_excluded_dirs(config.extra_excluded_dirs.clone())
            .extra_denylist(config.extra_denylist.clone())
            .exclude_globs(&config.exclude_globs)
    }

    pub fn min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines;
        self
    }

    pub fn extra_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.extra_excluded_dirs = dirs;
        self
    }

    pub fn extra_denylist(mut self, fragments: Vec<String>) -> Self {
        self.extra_denylist = fragments;
        self
    }

    pub fn exclude_globs(mut self, patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            self.exclude_globs = None;
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        self.exclude_globs = Some(builder.build()?);
        Ok(self)
    }

    /// Boolean form of [`Selector::evaluate`] for already-decoded text.
    pub fn select(&self, path: &str, content: &str) -> bool {
        self.check_path(path).is_included() && self.check_content(content).is_included()
    }

    /// Run every rule against a raw entry, decoding it on the way.
    pub fn evaluate<'a>(&self, path: &str, bytes: &'a [u8]) -> Evaluation<'a> {
        if let SelectionDecision::Reject(reason) = self.check_path(path) {
            return Evaluation::Rejected(reason);
        }
        let Some(text) = decode_text(bytes) else {
            return Evaluation::Rejected(RejectReason::Undecodable);
        };
        match self.check_content(&text) {
            SelectionDecision::Include => Evaluation::Selected(text),
            SelectionDecision::Reject(reason) => Evaluation::Rejected(reason),
        }
    }

    /// Path-only rules: extension, hidden segments, test naming, directories, denylist.
    pub fn check_path(&self, path: &str) -> SelectionDecision {
        let extension = extension_of(path);
        if !self.profile.extensions.contains(&extension.as_str()) {
            return SelectionDecision::Reject(RejectReason::DisallowedExtension);
        }

        if path.split('/').any(|segment| segment.starts_with('.')) {
            return SelectionDecision::Reject(RejectReason::HiddenPath);
        }

        if path.to_lowercase().contains("test") {
            return SelectionDecision::Reject(RejectReason::TestPath);
        }

        let mut segments: Vec<&str> = path.split('/').collect();
        segments.pop();
        let excluded = |segment: &&str| {
            BASE_EXCLUDED_DIRS.contains(segment)
                || self.profile.excluded_dirs.contains(segment)
                || self.extra_excluded_dirs.iter().any(|dir| dir == segment)
        };
        if segments.iter().any(excluded) {
            return SelectionDecision::Reject(RejectReason::ExcludedDirectory);
        }

        let denylisted = BASE_DENYLIST
            .iter()
            .chain(self.profile.denylist.iter())
            .any(|fragment| path.contains(fragment))
            || self.extra_denylist.iter().any(|fragment| path.contains(fragment.as_str()));
        if denylisted {
            return SelectionDecision::Reject(RejectReason::DenylistedFilename);
        }

        if self.exclude_globs.as_ref().is_some_and(|globs| globs.is_match(path)) {
            return SelectionDecision::Reject(RejectReason::ExcludedGlob);
        }

        SelectionDecision::Include
    }

    /// Content rules: test-framework markers and minimum substantive line count.
    pub fn check_content(&self, content: &str) -> SelectionDecision {
        if self.profile.test_markers.iter().any(|marker| content.contains(marker)) {
            return SelectionDecision::Reject(RejectReason::TestContent);
        }
        if count_substantive_lines(content, self.profile.comment_markers) < self.min_lines {
            return SelectionDecision::Reject(RejectReason::InsufficientContent);
        }
        SelectionDecision::Include
    }
}

/// `select(path, content, language)` with the default rule set.
pub fn select(path: &str, content: &str, language: Language) -> bool {
    Selector::new(language).select(path, content)
}

/// Lines that are neither blank nor start with one of `comment_markers` once trimmed.
pub fn count_substantive_lines(content: &str, comment_markers: &[&str]) -> usize {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !comment_markers.iter().any(|marker| line.starts_with(marker)))
        .count()
}
