//! repo2file: flatten a repository snapshot into a single text file
//!
//! The library downloads a GitHub or GitLab ZIP archive, keeps the files that
//! look like useful source for one language, strips comments and docstrings,
//! and concatenates the survivors in plain or `<documents>` form.

pub mod archive;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod select;
pub mod utils;

pub use error::{Error, Result};
pub use pipeline::{process_archive, process_entries, RunStats};
pub use select::select;
