//! Archive → selection → normalization → output

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, warn};

use crate::archive::{find_readme, read_archive, ArchiveEntry};
use crate::domain::{Config, DecodePolicy};
use crate::error::{Error, Result};
use crate::normalize::normalizer_for;
use crate::render::Emitter;
use crate::select::{Evaluation, RejectReason, Selector};
use crate::utils::decode_text;

/// Statistics from one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Archive file entries seen (README included)
    pub entries_seen: usize,

    /// Files written after the README slot
    pub files_included: usize,

    /// Path of the README emitted first, if any
    pub readme: Option<String>,

    /// Rejections by rule
    pub rejected: BTreeMap<RejectReason, usize>,

    /// Files dropped because they did not parse under their grammar
    pub normalize_failures: usize,

    pub bytes_written: u64,
}

impl RunStats {
    pub fn files_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    fn reject(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }
}

/// Read a ZIP from memory and write the selected files to `writer`.
pub fn process_archive<W: Write>(bytes: &[u8], config: &Config, writer: W) -> Result<(RunStats, W)> {
    let entries = read_archive(bytes)?;
    process_entries(&entries, config, writer)
}

/// Run selection, normalization and rendering over already-read entries.
///
/// Undecodable files abort the run under [`DecodePolicy::Fail`]; every other
/// per-file problem is logged and counted.
pub fn process_entries<W: Write>(
    entries: &[ArchiveEntry],
    config: &Config,
    writer: W,
) -> Result<(RunStats, W)> {
    let selector = Selector::from_config(config)?;
    let profile = config.language.profile();
    let mut stats = RunStats::default();
    let mut emitter = Emitter::new(writer, config.format, profile.banner_prefix);

    let readme = find_readme(entries).and_then(|entry| match decode_text(&entry.bytes) {
        Some(text) => Some((entry.path.as_str(), text)),
        None => {
            warn!(path = %entry.path, "README is not valid UTF-8; leaving it out");
            None
        }
    });
    emitter.begin(readme.as_ref().map(|(path, text)| (*path, text.as_ref())))?;
    stats.readme = readme.as_ref().map(|(path, _)| path.to_string());

    for entry in entries {
        stats.entries_seen += 1;
        if stats.readme.as_deref() == Some(entry.path.as_str()) {
            continue;
        }

        let text = match selector.evaluate(&entry.path, &entry.bytes) {
            Evaluation::Selected(text) => text,
            Evaluation::Rejected(RejectReason::Undecodable) => {
                if config.decode_policy == DecodePolicy::Fail {
                    return Err(Error::Decode { path: entry.path.clone() });
                }
                warn!(path = %entry.path, "skipping file that is not valid UTF-8");
                stats.reject(RejectReason::Undecodable);
                continue;
            }
            Evaluation::Rejected(reason) => {
                debug!(path = %entry.path, %reason, "skipped");
                stats.reject(reason);
                continue;
            }
        };

        let content: Cow<'_, str> = if config.keep_comments {
            text
        } else {
            let normalizer = normalizer_for(&entry.path);
            match normalizer.normalize(&text) {
                Ok(normalized) => {
                    debug!(path = %entry.path, normalizer = normalizer.name(), "normalized");
                    Cow::Owned(normalized)
                }
                Err(err) => {
                    warn!(path = %entry.path, error = %err, "skipping file that failed to normalize");
                    stats.normalize_failures += 1;
                    continue;
                }
            }
        };

        emitter.emit(&entry.path, &content)?;
        stats.files_included += 1;
    }

    stats.bytes_written = emitter.bytes_written();
    debug!(documents = emitter.documents(), bytes = stats.bytes_written, "output complete");
    let writer = emitter.finish()?;
    Ok((stats, writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, OutputFormat};

    fn entry(path: &str, content: &str) -> ArchiveEntry {
        ArchiveEntry { path: path.to_string(), bytes: content.as_bytes().to_vec() }
    }

    fn module(lines: usize) -> String {
        let mut body = String::from("def helper():\n    \"\"\"Doc.\"\"\"\n    return 1\n");
        for i in 0..lines {
            body.push_str(&format!("value_{i} = helper()\n"));
        }
        body
    }

    fn run(entries: &[ArchiveEntry], config: &Config) -> (RunStats, String) {
        let (stats, out) = process_entries(entries, config, Vec::new()).expect("pipeline");
        (stats, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn docstrings_are_stripped_unless_comments_are_kept() {
        let entries = vec![entry("lib/mod.py", &module(12))];
        let (_, stripped) = run(&entries, &Config::default());
        assert!(!stripped.contains("Doc."));

        let config = Config { keep_comments: true, ..Config::default() };
        let (_, kept) = run(&entries, &config);
        assert!(kept.contains("\"\"\"Doc.\"\"\""));
    }

    #[test]
    fn parse_failures_are_skipped_and_counted() {
        let mut broken = module(12);
        broken.push_str("def oops(:\n");
        let entries = vec![entry("lib/broken.py", &broken), entry("lib/ok.py", &module(12))];
        let (stats, out) = run(&entries, &Config::default());
        assert_eq!(stats.normalize_failures, 1);
        assert_eq!(stats.files_included, 1);
        assert!(out.contains("# File: lib/ok.py"));
        assert!(!out.contains("lib/broken.py"));
    }

    #[test]
    fn python2_print_statements_count_as_parse_failures() {
        let mut legacy = module(12);
        legacy.push_str("print \"done\"\n");
        let entries = vec![entry("lib/legacy.py", &legacy), entry("lib/ok.py", &module(12))];
        let (stats, out) = run(&entries, &Config::default());
        assert_eq!(stats.normalize_failures, 1);
        assert_eq!(stats.files_included, 1);
        assert!(!out.contains("lib/legacy.py"));

        let kept = Config { keep_comments: true, ..Config::default() };
        let (stats, _) = run(&entries, &kept);
        assert_eq!(stats.files_included, 2);
    }

    #[test]
    fn undecodable_files_follow_policy() {
        let mut bad = module(12).into_bytes();
        bad.extend_from_slice(&[0xff, 0xfe]);
        let entries = vec![
            ArchiveEntry { path: "lib/bad.py".into(), bytes: bad },
            entry("lib/good.py", &module(12)),
        ];

        let (stats, _) = run(&entries, &Config::default());
        assert_eq!(stats.rejected.get(&RejectReason::Undecodable), Some(&1));
        assert_eq!(stats.files_included, 1);

        let strict = Config { decode_policy: DecodePolicy::Fail, ..Config::default() };
        let err = process_entries(&entries, &strict, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Decode { ref path } if path == "lib/bad.py"));
    }

    #[test]
    fn go_banner_uses_slashes() {
        let mut source = String::from("package lib\n\n");
        for i in 0..10 {
            source.push_str(&format!("var v{i} = {i} // count\n"));
        }
        let config = Config { language: Language::Go, ..Config::default() };
        let (stats, out) = run(&[entry("lib/vars.go", &source)], &config);
        assert_eq!(stats.files_included, 1);
        assert!(out.starts_with("// File: lib/vars.go\npackage lib\n"));
        assert!(!out.contains("// count"));
    }

    #[test]
    fn readme_is_not_counted_as_a_file() {
        let entries = vec![entry("README.md", "# Title\n"), entry("lib/a.py", &module(12))];
        let config = Config { format: OutputFormat::Documents, ..Config::default() };
        let (stats, out) = run(&entries, &config);
        assert_eq!(stats.readme.as_deref(), Some("README.md"));
        assert_eq!(stats.files_included, 1);
        assert_eq!(stats.entries_seen, 2);
        assert_eq!(stats.files_rejected(), 0);
        assert_eq!(out.matches("<document index=").count(), 2);
    }

    #[test]
    fn markdown_run_keeps_readme_once() {
        let doc = "Line\n".repeat(12);
        let entries = vec![entry("README.md", "# Title\n"), entry("guide/intro.md", &doc)];
        let config = Config { language: Language::Markdown, ..Config::default() };
        let (stats, out) = run(&entries, &config);
        assert_eq!(out.matches("File: README.md").count(), 1);
        assert_eq!(stats.files_included, 1);
    }
}
