//! Export command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::utils::parse_csv;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{Config, DecodePolicy, Language, OutputFormat};
use crate::fetch::{download_archive, RefKind, RepositoryReference};
use crate::pipeline::{process_archive, RunStats};
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct ExportArgs {
    /// GitHub or GitLab repository URL
    #[arg(value_name = "URL")]
    pub repo: Option<String>,

    /// Branch (or tag with --tag) to download
    #[arg(long = "ref", value_name = "REF")]
    pub ref_: Option<String>,

    /// Treat --ref as a tag instead of a branch
    #[arg(long)]
    pub tag: bool,

    /// Target language: python|go|javascript|rust|markdown
    #[arg(short = 'l', long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Keep comments and docstrings
    #[arg(long)]
    pub keep_comments: bool,

    /// Output format: plain|documents
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Shorthand for --format documents
    #[arg(long, conflicts_with = "format")]
    pub claude: bool,

    /// Minimum number of non-blank, non-comment lines a file needs
    #[arg(long, value_name = "N")]
    pub min_lines: Option<usize>,

    /// What to do with files that are not valid UTF-8: skip|fail
    #[arg(long, value_name = "POLICY")]
    pub decode_policy: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Access token for private repositories
    #[arg(long, env = "REPO2FILE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Read a local ZIP archive instead of downloading
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,

    /// Output file ('-' for stdout; default <repo>_<language>.txt)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to config file (repo2file.toml or .repo2file.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write run statistics as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();

    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;

    let language = args.lang.as_deref().map(parse_language).transpose()?;
    let format = if args.claude {
        Some(OutputFormat::Documents)
    } else {
        args.format.as_deref().map(parse_format).transpose()?
    };
    let decode_policy = args.decode_policy.as_deref().map(parse_decode_policy).transpose()?;

    let cli_overrides = CliOverrides {
        repo_url: args.repo.clone(),
        ref_: args.ref_.clone(),
        tag: if args.tag { Some(true) } else { None },
        language,
        keep_comments: if args.keep_comments { Some(true) } else { None },
        format,
        min_lines: args.min_lines,
        decode_policy,
        exclude_globs: parse_csv(&args.exclude_glob),
        output: args.output.clone(),
        token: args.token.clone(),
    };
    let merged = merge_cli_with_config(file_config, cli_overrides);

    let (source_label, base_name, bytes) = match (&args.archive, &merged.repo_url) {
        (Some(path), _) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read archive {}", path.display()))?;
            (path.display().to_string(), archive_stem(path), bytes)
        }
        (None, Some(url)) => {
            let ref_kind = if merged.tag { RefKind::Tag } else { RefKind::Branch };
            let repo = RepositoryReference::parse(url, &merged.ref_, ref_kind, merged.token.clone())?;
            let bytes = download_with_spinner(&repo)?;
            (repo.web_url(), repo.name.clone(), bytes)
        }
        (None, None) => anyhow::bail!("Either a repository URL or --archive must be specified"),
    };

    let output = merged
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_{}.txt", base_name, merged.language)));
    let to_stdout = output.as_os_str() == "-";

    let stats = if to_stdout {
        let stdout = io::stdout();
        let (stats, _) = process_archive(&bytes, &merged, BufWriter::new(stdout.lock()))?;
        stats
    } else {
        let file = fs::File::create(&output)
            .with_context(|| format!("Failed to create output file {}", output.display()))?;
        let (stats, _) = process_archive(&bytes, &merged, BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", output.display()))?;
        stats
    };

    if let Some(report) = &args.report {
        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(report, json)
            .with_context(|| format!("Failed to write report {}", report.display()))?;
    }

    let summary = Summary {
        source: &source_label,
        output: if to_stdout { None } else { Some(&output) },
        config: &merged,
        stats: &stats,
        elapsed: start_time.elapsed(),
    };
    if to_stdout {
        summary.print(&mut io::stderr())?;
    } else {
        summary.print(&mut io::stdout())?;
    }

    Ok(())
}

fn download_with_spinner(repo: &RepositoryReference) -> Result<Vec<u8>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Downloading {}", repo.archive_url()));

    let result = download_archive(repo);
    spinner.finish_and_clear();
    Ok(result?)
}

fn archive_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("archive").to_string()
}

struct Summary<'a> {
    source: &'a str,
    output: Option<&'a Path>,
    config: &'a Config,
    stats: &'a RunStats,
    elapsed: Duration,
}

impl Summary<'_> {
    fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        let stats = self.stats;
        writeln!(out)?;
        writeln!(out, "{}", style("Export complete!").green().bold())?;
        writeln!(out)?;
        writeln!(out, "Statistics:")?;
        writeln!(out, "  Repository:      {}", self.source)?;
        writeln!(out, "  Language:        {}", self.config.language)?;
        writeln!(out, "  Entries seen:    {}", stats.entries_seen)?;
        writeln!(out, "  Files included:  {}", stats.files_included)?;
        writeln!(
            out,
            "  README:          {}",
            stats.readme.as_deref().unwrap_or("not found")
        )?;

        if stats.files_rejected() > 0 {
            writeln!(out, "  Files skipped:")?;
            for (reason, count) in &stats.rejected {
                writeln!(out, "    {:<22} {}", format!("{reason}:"), count)?;
            }
        }
        if stats.normalize_failures > 0 {
            writeln!(
                out,
                "  {} {}",
                style("Parse failures:").yellow(),
                stats.normalize_failures
            )?;
        }
        writeln!(out, "  Total bytes:     {}", format_with_commas(stats.bytes_written))?;
        writeln!(out, "  Processing time: {:.2}s", self.elapsed.as_secs_f64())?;

        if let Some(path) = self.output {
            writeln!(out)?;
            writeln!(out, "Output file:")?;
            writeln!(out, "  {}", path.display())?;
        }
        Ok(())
    }
}

fn parse_language(lang: &str) -> Result<Language> {
    Ok(lang.parse::<Language>()?)
}

fn parse_format(format: &str) -> Result<OutputFormat> {
    match format.to_ascii_lowercase().as_str() {
        "plain" | "text" => Ok(OutputFormat::Plain),
        "documents" | "claude" | "xml" => Ok(OutputFormat::Documents),
        invalid => anyhow::bail!("Invalid format '{invalid}'. Use: plain|documents"),
    }
}

fn parse_decode_policy(policy: &str) -> Result<DecodePolicy> {
    match policy.to_ascii_lowercase().as_str() {
        "skip" => Ok(DecodePolicy::Skip),
        "fail" => Ok(DecodePolicy::Fail),
        invalid => anyhow::bail!("Invalid decode policy '{invalid}'. Use: skip|fail"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_aliases() {
        assert_eq!(parse_format("claude").unwrap(), OutputFormat::Documents);
        assert_eq!(parse_format("PLAIN").unwrap(), OutputFormat::Plain);
        assert!(parse_format("html").is_err());
    }

    #[test]
    fn decode_policy_values() {
        assert_eq!(parse_decode_policy("fail").unwrap(), DecodePolicy::Fail);
        let err = parse_decode_policy("ignore").unwrap_err();
        assert!(err.to_string().contains("skip|fail"));
    }

    #[test]
    fn language_error_lists_choices() {
        let err = parse_language("cobol").unwrap_err();
        assert!(err.to_string().contains("python|go|javascript|rust|markdown"));
    }

    #[test]
    fn archive_stem_drops_extension() {
        assert_eq!(archive_stem(Path::new("/tmp/repo-main.zip")), "repo-main");
    }
}
