//! repo2file: flatten a GitHub or GitLab repository into one LLM-friendly text file

use anyhow::Result;

fn main() -> Result<()> {
    repo2file::cli::run()
}
