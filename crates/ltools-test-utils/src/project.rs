//! [`TestProject`] builder for configuration loading scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory holding a configuration document and any
/// supporting files.
///
/// # Example
///
/// ```rust,no_run
/// use ltools_test_utils::{TestProject, documents};
///
/// let project = TestProject::new().with_config(documents::CURRENT);
/// project.assert_file_exists("aws-lambda.yml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Default document name looked up by the loader.
    pub const CONFIG_FILE: &'static str = "aws-lambda.yml";

    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` as `aws-lambda.yml`.
    pub fn with_config(self, content: &str) -> Self {
        self.write(Self::CONFIG_FILE, content);
        self
    }

    /// Write `content` to `path` relative to the root, creating parents.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    /// Write a file and return its absolute path.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("TestProject::write: {}: {e}", full_path.display()));
        full_path
    }

    /// Absolute path of the default configuration document.
    pub fn config_path(&self) -> PathBuf {
        self.root().join(Self::CONFIG_FILE)
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
