//! Fatal configuration errors. Raised before any network activity.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server URL not specified")]
    MissingBaseUrl,

    #[error("invalid server URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("file to scan not specified")]
    MissingInput,

    #[error("file to scan doesn't exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("no keywords to search for")]
    NoKeywords,

    #[error("output directory unusable: {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
