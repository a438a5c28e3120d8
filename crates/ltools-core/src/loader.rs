//! Loading pipeline: raw document, migrated document, parsed configuration.
//!
//! Each stage is its own type and consumes the previous one, so a
//! configuration can only be parsed once it has been migrated, and only a
//! parsed configuration can be handed to the resolver.

use std::collections::BTreeMap;

use ltools_fs::{ConfigFile, DocumentStore, NormalizedPath, io};
use ltools_schema::schema::{Configuration, FunctionConfig};
use ltools_schema::{migration, parse_document};
use serde_json::Value;
use tracing::debug;

use crate::Result;

/// A document as read from disk, not yet migrated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    root: NormalizedPath,
    value: Value,
}

impl RawDocument {
    /// Read a configuration document.
    ///
    /// The document's directory becomes the root that relative paths in it
    /// are anchored at.
    pub fn read(path: &NormalizedPath) -> Result<Self> {
        let path = io::canonicalize(path)?;
        let value = DocumentStore::new().load(&path)?;
        let root = path.parent().unwrap_or_else(|| NormalizedPath::new("."));
        Ok(Self { root, value })
    }

    /// Discover and read the default document in `dir`.
    pub fn discover(dir: &NormalizedPath) -> Result<Self> {
        let path = ConfigFile::discover(dir)?;
        Self::read(&path)
    }

    /// Wrap an already decoded document rooted at `root`.
    pub fn from_value(value: Value, root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            value,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Upgrade the document to the current layout.
    pub fn migrate(self) -> Result<MigratedDocument> {
        let value = migration::upgrade(self.value)?;
        Ok(MigratedDocument {
            root: self.root,
            value,
        })
    }

    /// Migrate and parse in one step.
    pub fn parse(self) -> Result<ParsedConfig> {
        self.migrate()?.parse()
    }
}

/// A document in the current layout, not yet validated.
#[derive(Debug, Clone)]
pub struct MigratedDocument {
    root: NormalizedPath,
    value: Value,
}

impl MigratedDocument {
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Validate the document against the configuration schema.
    pub fn parse(self) -> Result<ParsedConfig> {
        let config: Configuration = parse_document(&self.value)?;
        debug!(
            root = %self.root,
            functions = config.functions.len(),
            "Parsed configuration"
        );
        Ok(ParsedConfig {
            root: self.root,
            config,
        })
    }
}

/// A validated configuration whose references are not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfig {
    root: NormalizedPath,
    config: Configuration,
}

impl ParsedConfig {
    pub fn new(config: Configuration, root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Directory relative paths are anchored at.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Look up functions by name; an empty request returns all of them.
    pub fn get_functions<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<&str, &FunctionConfig>> {
        Ok(self.config.get_functions(names)?)
    }

    /// Keep only the named functions, so resolution looks up nothing else.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<ParsedConfig> {
        Ok(Self {
            root: self.root.clone(),
            config: self.config.select(names)?,
        })
    }
}

/// Read, migrate and parse the document at `path`.
pub fn load(path: &NormalizedPath) -> Result<ParsedConfig> {
    RawDocument::read(path)?.parse()
}

/// Find the default document in `dir`, then load it.
pub fn load_from_dir(dir: &NormalizedPath) -> Result<ParsedConfig> {
    RawDocument::discover(dir)?.parse()
}
