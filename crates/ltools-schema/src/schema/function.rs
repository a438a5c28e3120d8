//! Root document and per-function definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::build::{BuildConfig, TestConfig};
use super::deploy::DeployConfig;
use crate::error::UndefinedFunctions;
use crate::mapper::{ClassSchema, Field, SchemaType};
use crate::migration::CURRENT_VERSION;

/// Function runtimes accepted by the deployment API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Runtime {
    #[serde(rename = "nodejs")]
    Nodejs,
    #[serde(rename = "nodejs4.3")]
    Nodejs43,
    #[serde(rename = "nodejs6.10")]
    Nodejs610,
    #[serde(rename = "nodejs10.x")]
    Nodejs10x,
    #[serde(rename = "nodejs12.x")]
    Nodejs12x,
    #[serde(rename = "nodejs14.x")]
    Nodejs14x,
    #[serde(rename = "java8")]
    Java8,
    #[serde(rename = "java8.al2")]
    Java8Al2,
    #[serde(rename = "java11")]
    Java11,
    #[serde(rename = "python2.7")]
    Python27,
    #[default]
    #[serde(rename = "python3.6")]
    Python36,
    #[serde(rename = "python3.7")]
    Python37,
    #[serde(rename = "python3.8")]
    Python38,
    #[serde(rename = "dotnetcore1.0")]
    Dotnetcore10,
    #[serde(rename = "dotnetcore2.1")]
    Dotnetcore21,
    #[serde(rename = "dotnetcore3.1")]
    Dotnetcore31,
    #[serde(rename = "nodejs4.3-edge")]
    Nodejs43Edge,
}

impl Runtime {
    pub const ALL: [Runtime; 17] = [
        Runtime::Nodejs,
        Runtime::Nodejs43,
        Runtime::Nodejs610,
        Runtime::Nodejs10x,
        Runtime::Nodejs12x,
        Runtime::Nodejs14x,
        Runtime::Java8,
        Runtime::Java8Al2,
        Runtime::Java11,
        Runtime::Python27,
        Runtime::Python36,
        Runtime::Python37,
        Runtime::Python38,
        Runtime::Dotnetcore10,
        Runtime::Dotnetcore21,
        Runtime::Dotnetcore31,
        Runtime::Nodejs43Edge,
    ];

    /// Identifier as written in documents and sent to the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Nodejs => "nodejs",
            Runtime::Nodejs43 => "nodejs4.3",
            Runtime::Nodejs610 => "nodejs6.10",
            Runtime::Nodejs10x => "nodejs10.x",
            Runtime::Nodejs12x => "nodejs12.x",
            Runtime::Nodejs14x => "nodejs14.x",
            Runtime::Java8 => "java8",
            Runtime::Java8Al2 => "java8.al2",
            Runtime::Java11 => "java11",
            Runtime::Python27 => "python2.7",
            Runtime::Python36 => "python3.6",
            Runtime::Python37 => "python3.7",
            Runtime::Python38 => "python3.8",
            Runtime::Dotnetcore10 => "dotnetcore1.0",
            Runtime::Dotnetcore21 => "dotnetcore2.1",
            Runtime::Dotnetcore31 => "dotnetcore3.1",
            Runtime::Nodejs43Edge => "nodejs4.3-edge",
        }
    }

    pub fn is_python(&self) -> bool {
        self.as_str().starts_with("python")
    }
}

impl FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Runtime::ALL
            .into_iter()
            .find(|runtime| runtime.as_str() == s)
            .ok_or_else(|| format!("Unknown runtime: {s}"))
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub runtime: Runtime,
    pub build: BuildConfig,
    pub test: Option<TestConfig>,
    pub deploy: Option<DeployConfig>,
}

impl SchemaType for FunctionConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("FunctionConfig")
                .field(
                    "runtime",
                    Field::choice(Runtime::ALL.map(|r| r.as_str()))
                        .default(Runtime::default().as_str()),
                )
                .field("build", Field::class::<BuildConfig>().required())
                .field("test", Field::class::<TestConfig>())
                .field("deploy", Field::class::<DeployConfig>())
        });
        &SCHEMA
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub version: i64,
    pub functions: BTreeMap<String, FunctionConfig>,
}

impl SchemaType for Configuration {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("Configuration")
                .field("version", Field::int().coerce().default(CURRENT_VERSION))
                .field(
                    "functions",
                    Field::map(Field::class::<FunctionConfig>()).required(),
                )
        });
        &SCHEMA
    }
}

impl Configuration {
    /// Look up the requested functions by name.
    ///
    /// An empty request selects every function. Any unknown name fails the
    /// whole request.
    pub fn get_functions<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<&str, &FunctionConfig>, UndefinedFunctions> {
        if names.is_empty() {
            return Ok(self
                .functions
                .iter()
                .map(|(name, function)| (name.as_str(), function))
                .collect());
        }

        let mut missing: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.functions.contains_key(*name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(UndefinedFunctions { names: missing });
        }

        Ok(names
            .iter()
            .filter_map(|name| self.functions.get_key_value(name.as_ref()))
            .map(|(name, function)| (name.as_str(), function))
            .collect())
    }

    /// Narrow the configuration to the requested functions.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Configuration, UndefinedFunctions> {
        let functions = self
            .get_functions(names)?
            .into_iter()
            .map(|(name, function)| (name.to_string(), function.clone()))
            .collect();
        Ok(Configuration {
            version: self.version,
            functions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_round_trips_through_str() {
        for runtime in Runtime::ALL {
            assert_eq!(runtime.as_str().parse::<Runtime>().unwrap(), runtime);
        }
        assert!("cobol".parse::<Runtime>().is_err());
    }

    #[test]
    fn runtime_serde_names_match_as_str() {
        for runtime in Runtime::ALL {
            let value = serde_json::to_value(runtime).unwrap();
            assert_eq!(value, serde_json::Value::from(runtime.as_str()));
        }
    }

    #[test]
    fn default_runtime_is_python36() {
        assert_eq!(Runtime::default(), Runtime::Python36);
        assert!(Runtime::default().is_python());
    }
}
