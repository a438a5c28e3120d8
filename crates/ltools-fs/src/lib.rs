//! Filesystem helpers for lambda-tools
//!
//! Provides normalized path handling, configuration file discovery and
//! format-agnostic reading of raw configuration documents.

pub mod constants;
pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use constants::ConfigFile;
pub use document::DocumentStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
