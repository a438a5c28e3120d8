//! Plain file reads with path-aware errors

use std::fs;
use std::path::PathBuf;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Resolve a path to its canonical absolute form.
///
/// Uses `dunce` so Windows paths come back without the `\\?\` prefix.
pub fn canonicalize(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native_path = path.to_native();
    dunce::canonicalize(&native_path)
        .map(NormalizedPath::from)
        .map_err(|e| Error::io(&native_path, e))
}

/// Current working directory as a normalized path.
pub fn current_dir() -> Result<NormalizedPath> {
    std::env::current_dir()
        .map(NormalizedPath::from)
        .map_err(|e| Error::io(PathBuf::from("."), e))
}
