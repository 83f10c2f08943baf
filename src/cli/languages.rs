//! Languages command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::json;

use crate::domain::{Language, BASE_DENYLIST, BASE_EXCLUDED_DIRS};

#[derive(Args)]
pub struct LanguagesArgs {
    /// Print the full rule tables as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LanguagesArgs) -> Result<()> {
    if args.json {
        let profiles: Vec<_> = Language::ALL
            .iter()
            .map(|language| json!({ "language": language, "profile": language.profile() }))
            .collect();
        let out = json!({
            "base_excluded_dirs": BASE_EXCLUDED_DIRS,
            "base_denylist": BASE_DENYLIST,
            "languages": profiles,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", style("Supported languages:").bold());
    for language in Language::ALL {
        let profile = language.profile();
        println!("  {} {}", style(format!("{language:<11}")).cyan(), profile.extensions.join(" "));
    }
    println!();
    println!("Always excluded directories: {}", BASE_EXCLUDED_DIRS.join(", "));
    Ok(())
}
