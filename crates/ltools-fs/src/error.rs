//! Error types for ltools-fs

use std::path::PathBuf;

/// Result type for ltools-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ltools-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document at {path}: {message}")]
    DocumentParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("No configuration file could be found in {dir} (looked for {candidates})")]
    ConfigNotFound { dir: PathBuf, candidates: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
