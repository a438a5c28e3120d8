//! Error types for ltools-core

use std::path::PathBuf;
use std::time::Duration;

use crate::lookup::ResourceKind;

/// Result type for ltools-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A function named in a request is not part of the resolved configuration
    #[error("Function not found: {name}")]
    FunctionNotFound { name: String },

    /// A deployment request was asked for a function without a deploy block
    #[error("Function {name} has no deploy configuration")]
    NotDeployable { name: String },

    /// The lookups file could not be bound
    #[error("Invalid lookups file {path}: {message}")]
    InvalidLookups { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from ltools-fs
    #[error(transparent)]
    Fs(#[from] ltools_fs::Error),

    /// Document could not be upgraded to the current layout
    #[error(transparent)]
    Migration(#[from] ltools_schema::MigrationError),

    /// Document failed schema validation
    #[error(transparent)]
    Schema(#[from] ltools_schema::SchemaError),

    /// Selection named functions the configuration does not define
    #[error(transparent)]
    UndefinedFunctions(#[from] ltools_schema::UndefinedFunctions),

    /// A reference could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// A parsed configuration could not be resolved against its environment.
///
/// Resolution is all-or-nothing: any of these aborts the run and no
/// resolved configuration is produced.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("No {kind} named \"{name}\" was found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("More than one {kind} named \"{name}\" was found: {}", .ids.join(", "))]
    Ambiguous {
        kind: ResourceKind,
        name: String,
        ids: Vec<String>,
    },

    #[error("KMS key alias \"{alias}\" was not found")]
    KeyAliasNotFound { alias: String },

    /// A collaborator failed while answering a lookup
    #[error("Lookup of {reference} failed: {source}")]
    Lookup {
        reference: String,
        #[source]
        source: LookupError,
    },

    #[error("No region is configured for function \"{function}\"")]
    MissingRegion { function: String },

    #[error("Resolution was cancelled")]
    Cancelled,

    #[error("Resolution did not finish within {after:?}")]
    TimedOut { after: Duration },
}

impl ResolutionError {
    pub(crate) fn lookup(reference: impl Into<String>) -> impl FnOnce(LookupError) -> Self {
        let reference = reference.into();
        move |source| Self::Lookup { reference, source }
    }
}

/// Failure reported by a lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
