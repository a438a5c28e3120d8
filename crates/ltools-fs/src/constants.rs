//! Well-known configuration file names.

use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Configuration file names looked up when no explicit source is given.
///
/// Variants are listed in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// `aws-lambda.yml`
    Yml,
    /// `aws-lambda.yaml`
    Yaml,
    /// `aws-lambda.json`
    Json,
}

impl ConfigFile {
    /// All candidates in lookup order.
    pub const ALL: [ConfigFile; 3] = [ConfigFile::Yml, ConfigFile::Yaml, ConfigFile::Json];

    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yml => "aws-lambda.yml",
            Self::Yaml => "aws-lambda.yaml",
            Self::Json => "aws-lambda.json",
        }
    }

    /// Find the first candidate present in `dir`.
    pub fn discover(dir: &NormalizedPath) -> Result<NormalizedPath> {
        for candidate in Self::ALL {
            let path = dir.join(candidate.as_str());
            if path.is_file() {
                tracing::debug!(%path, "Found configuration file");
                return Ok(path);
            }
        }
        Err(Error::ConfigNotFound {
            dir: dir.to_native(),
            candidates: Self::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

impl AsRef<Path> for ConfigFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
