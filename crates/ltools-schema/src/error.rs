//! Error types for ltools-schema

/// Result type for schema parsing
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Render a field path for messages; the empty path is the document itself.
fn display_path(path: &str) -> &str {
    if path.is_empty() { "document" } else { path }
}

/// A document failed structural or type validation.
///
/// Every variant carries the dotted/indexed path of the offending field,
/// e.g. `functions[hello].build.requirements[0]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unrecognised value \"{}\".", display_path(.path))]
    UnrecognisedKey { path: String },

    #[error("Required value \"{}\" was not provided.", display_path(.path))]
    MissingValue { path: String },

    #[error("Value \"{}\" must be {expected}.", display_path(.path))]
    WrongType { path: String, expected: &'static str },

    #[error("Value \"{}\" must be one of: {choices}.", display_path(.path))]
    NotAChoice { path: String, choices: String },

    #[error("Invalid value \"{}\": {message}", display_path(.path))]
    Invalid { path: String, message: String },

    #[error("Schema {schema} could not be bound: {message}")]
    Binding { schema: &'static str, message: String },
}

impl SchemaError {
    /// Path of the field that failed, empty for the document root.
    pub fn path(&self) -> &str {
        match self {
            Self::UnrecognisedKey { path }
            | Self::MissingValue { path }
            | Self::WrongType { path, .. }
            | Self::NotAChoice { path, .. }
            | Self::Invalid { path, .. } => path,
            Self::Binding { .. } => "",
        }
    }
}

/// A document could not be migrated to the current layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("Document version must be an integer, found {found}")]
    InvalidVersion { found: String },

    #[error("Document version {version} is newer than the supported version {supported}")]
    UnsupportedVersion { version: i64, supported: i64 },

    #[error("Legacy value \"{}\" must be {expected}.", display_path(.path))]
    InvalidShape { path: String, expected: &'static str },

    #[error("Unrecognised legacy value \"{path}\".")]
    UnknownKey { path: String },
}

impl MigrationError {
    /// Path of the offending value, empty for document-level failures.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidShape { path, .. } | Self::UnknownKey { path } => path,
            Self::InvalidVersion { .. } | Self::UnsupportedVersion { .. } => "",
        }
    }
}

/// One or more requested functions are not defined in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Undefined functions: {}", .names.join(", "))]
pub struct UndefinedFunctions {
    pub names: Vec<String>,
}
