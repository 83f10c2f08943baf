//! CLI argument merging with config

use crate::domain::{Config, DecodePolicy, Language, OutputFormat};
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub repo_url: Option<String>,
    pub ref_: Option<String>,
    pub tag: Option<bool>,
    pub language: Option<Language>,
    pub keep_comments: Option<bool>,
    pub format: Option<OutputFormat>,
    pub min_lines: Option<usize>,
    pub decode_policy: Option<DecodePolicy>,
    pub exclude_globs: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub token: Option<String>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(repo_url) = cli.repo_url {
        base_config.repo_url = Some(repo_url);
    }
    if let Some(ref_) = cli.ref_ {
        base_config.ref_ = ref_;
    }
    if let Some(tag) = cli.tag {
        base_config.tag = tag;
    }

    if let Some(language) = cli.language {
        base_config.language = language;
    }
    if let Some(keep_comments) = cli.keep_comments {
        base_config.keep_comments = keep_comments;
    }
    if let Some(format) = cli.format {
        base_config.format = format;
    }

    if let Some(min_lines) = cli.min_lines {
        base_config.min_lines = min_lines;
    }
    if let Some(decode_policy) = cli.decode_policy {
        base_config.decode_policy = decode_policy;
    }
    if let Some(exclude_globs) = cli.exclude_globs {
        base_config.exclude_globs = exclude_globs;
    }

    if let Some(output) = cli.output {
        base_config.output = Some(output);
    }
    if let Some(token) = cli.token {
        base_config.token = Some(token);
    }

    base_config
}
