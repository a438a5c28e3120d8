//! Build and test blocks of a function definition.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::mapper::{ClassSchema, Field, SchemaType};

/// A requirements file to install into the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementConfig {
    /// Path of the requirements file, relative to the configuration file
    /// until resolved.
    pub file: String,
}

impl SchemaType for RequirementConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("RequirementConfig").field("file", Field::string().required())
        });
        &SCHEMA
    }
}

/// Requirements list shared by the build and test blocks.
fn requirements_field() -> Field {
    Field::list(Field::class::<RequirementConfig>().default_field("file"))
}

/// Ignore globs: every item must be a non-null string.
fn ignore_field() -> Field {
    Field::list(Field::string().required())
}

/// How a function's deployment package is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub source: String,
    pub requirements: Vec<RequirementConfig>,
    /// Install dependencies inside a container matching the runtime.
    pub use_docker: bool,
    pub compile_dependencies: bool,
    /// Folder the package is staged into before zipping.
    pub bundle: Option<String>,
    /// Path of the zip archive.
    pub package: Option<String>,
    pub ignore: Vec<String>,
}

impl SchemaType for BuildConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("BuildConfig")
                .field("source", Field::string().required())
                .field("requirements", requirements_field())
                .field("use_docker", Field::bool().coerce().default(false))
                .field("compile_dependencies", Field::bool().coerce().default(false))
                .field("bundle", Field::string())
                .field("package", Field::string())
                .field("ignore", ignore_field())
        });
        &SCHEMA
    }
}

/// Test runners a function's tests can be executed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestRunner {
    #[default]
    Unittest,
}

impl TestRunner {
    pub const ALL: [TestRunner; 1] = [TestRunner::Unittest];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestRunner::Unittest => "unittest",
        }
    }
}

/// How a function's unit tests are run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestConfig {
    pub source: String,
    pub requirements: Vec<RequirementConfig>,
    pub runner: TestRunner,
    pub ignore: Vec<String>,
}

impl SchemaType for TestConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("TestConfig")
                .field("source", Field::string().required())
                .field("requirements", requirements_field())
                .field(
                    "runner",
                    Field::choice(TestRunner::ALL.map(|r| r.as_str()))
                        .default(TestRunner::default().as_str()),
                )
                .field("ignore", ignore_field())
        });
        &SCHEMA
    }
}
