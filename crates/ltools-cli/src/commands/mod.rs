//! Command implementations for ltools-cli

pub mod check;
pub mod functions;
pub mod resolve;

use std::path::Path;

use ltools_core::{ParsedConfig, load, load_from_dir};
use ltools_fs::{NormalizedPath, io};

use crate::error::Result;

pub use check::run_check;
pub use functions::run_functions;
pub use resolve::{ResolveArgs, run_resolve};

/// Load the configuration named by `--source`.
///
/// A directory, or no source at all, means discovering the default
/// document in it (or in the working directory).
pub fn load_source(source: Option<&Path>) -> Result<ParsedConfig> {
    let parsed = match source {
        Some(path) if path.is_dir() => load_from_dir(&NormalizedPath::new(path))?,
        Some(path) => load(&NormalizedPath::new(path))?,
        None => load_from_dir(&io::current_dir()?)?,
    };
    Ok(parsed)
}
