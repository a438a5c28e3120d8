//! Format-agnostic loading of raw configuration documents

use serde_json::Value;

use crate::{Error, NormalizedPath, Result, io};

/// Supported document encodings, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Reads configuration documents into an untyped value tree.
///
/// The result is the raw document handed to migration and schema parsing;
/// no structure is assumed here.
#[derive(Debug, Default)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.yaml`, `.yml` -> YAML
    /// - `.json` -> JSON
    /// - `.toml` -> TOML
    pub fn load(&self, path: &NormalizedPath) -> Result<Value> {
        let format = DocumentFormat::from_extension(path.extension().unwrap_or(""))?;
        let content = io::read_text(path)?;
        tracing::debug!(%path, format = format.label(), "Reading configuration document");
        self.parse(&content, format).map_err(|message| Error::DocumentParse {
            path: path.to_native(),
            format: format.label().into(),
            message,
        })
    }

    /// Parse document text in the given format.
    pub fn parse(&self, content: &str, format: DocumentFormat) -> std::result::Result<Value, String> {
        match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}
