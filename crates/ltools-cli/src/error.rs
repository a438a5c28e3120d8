//! Error types for ltools-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from ltools-core
    #[error(transparent)]
    Core(#[from] ltools_core::Error),

    /// Error from ltools-fs
    #[error(transparent)]
    Fs(#[from] ltools_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output could not be rendered
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ltools_core::ResolutionError> for CliError {
    fn from(err: ltools_core::ResolutionError) -> Self {
        Self::Core(err.into())
    }
}
