//! Error types for the fetch / read / emit pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Per-file problems under the skip policy never surface here;
/// they are logged and counted instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported repository host '{0}' (expected github.com or gitlab.com)")]
    UnsupportedHost(String),

    #[error("unsupported language '{0}'. Use: python|go|javascript|rust|markdown")]
    UnsupportedLanguage(String),

    #[error("failed to download {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("not a valid zip archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("{path} is not valid UTF-8")]
    Decode { path: String },

    #[error("invalid exclude glob")]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
