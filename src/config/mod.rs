//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, `repo2file.toml` or
//! `.repo2file.yml` (or an explicit `--config` file), `REPO2FILE_*`
//! environment variables. CLI flags are merged on top by [`merge_cli_with_config`].

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::Path;
use tracing::debug;

use crate::domain::Config;

pub const CONFIG_FILE_NAMES: &[&str] = &["repo2file.toml", ".repo2file.toml", ".repo2file.yml", ".repo2file.yaml"];

pub const ENV_PREFIX: &str = "REPO2FILE_";

/// Load the layered configuration. `anchor` is the directory searched for a
/// config file when `explicit` is `None`.
pub fn load_config(anchor: &Path, explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            debug!(path = %path.display(), "loading config file");
            figment = merge_file(figment, path);
        }
        None => {
            if let Some(path) =
                CONFIG_FILE_NAMES.iter().map(|name| anchor.join(name)).find(|p| p.is_file())
            {
                debug!(path = %path.display(), "loading config file");
                figment = merge_file(figment, &path);
            }
        }
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Failed to load configuration")
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml") | Some("yaml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}
