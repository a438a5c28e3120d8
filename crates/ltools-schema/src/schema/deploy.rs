//! Deployment block of a function definition and its nested settings.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::mapper::{ClassSchema, Field, SchemaType};

/// Where failed asynchronous invocations are sent, by topic or queue name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterTarget {
    pub sns: Option<String>,
    pub sqs: Option<String>,
}

impl SchemaType for DeadLetterTarget {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("DeadLetterTarget")
                .field("sns", Field::string())
                .field("sqs", Field::string())
                .validator(|record| record.exactly_one_of("sns", "sqs"))
        });
        &SCHEMA
    }
}

/// Dead-letter routing, given either as a named target or a literal ARN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterConfig {
    pub target: Option<DeadLetterTarget>,
    pub target_arn: Option<String>,
}

impl SchemaType for DeadLetterConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("DeadLetterConfig")
                .field("target", Field::class::<DeadLetterTarget>())
                .field("target_arn", Field::string())
                .validator(|record| record.exactly_one_of("target", "target_arn"))
        });
        &SCHEMA
    }
}

/// Environment variables. A null value is filled from the deploying
/// process's environment at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub variables: BTreeMap<String, Option<String>>,
}

impl SchemaType for EnvironmentConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("EnvironmentConfig").field(
                "variables",
                Field::map(Field::string().nullable()).required(),
            )
        });
        &SCHEMA
    }
}

/// Encryption key for the function's environment, by alias or ARN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmsKeyConfig {
    pub name: Option<String>,
    pub arn: Option<String>,
}

impl SchemaType for KmsKeyConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("KmsKeyConfig")
                .field("name", Field::string())
                .field("arn", Field::string())
                .validator(|record| record.exactly_one_of("name", "arn"))
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TracingMode {
    PassThrough,
    Active,
}

impl TracingMode {
    pub const ALL: [TracingMode; 2] = [TracingMode::PassThrough, TracingMode::Active];

    pub fn as_str(&self) -> &'static str {
        match self {
            TracingMode::PassThrough => "PassThrough",
            TracingMode::Active => "Active",
        }
    }
}

impl std::fmt::Display for TracingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    pub mode: TracingMode,
}

impl SchemaType for TracingConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("TracingConfig").field(
                "mode",
                Field::choice(TracingMode::ALL.map(|m| m.as_str())).required(),
            )
        });
        &SCHEMA
    }
}

/// A network resource referenced by identifier or by its `Name` tag.
///
/// A bare string is shorthand for `{name: ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameOrId {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl NameOrId {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    /// The name still waiting for an identifier, if any.
    pub fn unresolved_name(&self) -> Option<&str> {
        match (&self.id, &self.name) {
            (None, Some(name)) if !name.is_empty() => Some(name),
            (Some(id), Some(name)) if id.is_empty() && !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

impl SchemaType for NameOrId {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("NameOrId")
                .field("id", Field::string())
                .field("name", Field::string())
                .validator(|record| record.exactly_one_of("id", "name"))
        });
        &SCHEMA
    }
}

fn name_or_id_list() -> Field {
    Field::list(Field::class::<NameOrId>().default_field("name")).required()
}

/// Network placement of the function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcConfig {
    /// `Name` tag of the VPC; scopes subnet and security group lookups.
    pub name: Option<String>,
    pub subnets: Vec<NameOrId>,
    pub security_groups: Vec<NameOrId>,
}

impl SchemaType for VpcConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("VpcConfig")
                .field("name", Field::string())
                .field("subnets", name_or_id_list())
                .field("security_groups", name_or_id_list())
        });
        &SCHEMA
    }
}

/// Everything the deployment API needs besides the package itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub handler: String,
    /// Role name or ARN; bare names become ARNs on resolution.
    pub role: String,
    pub description: String,
    pub memory_size: i64,
    pub region: Option<String>,
    /// Seconds.
    pub timeout: i64,
    pub dead_letter_config: Option<DeadLetterConfig>,
    pub environment: Option<EnvironmentConfig>,
    pub kms_key: Option<KmsKeyConfig>,
    pub tags: BTreeMap<String, Option<String>>,
    pub tracing_config: Option<TracingConfig>,
    pub vpc_config: Option<VpcConfig>,
}

impl SchemaType for DeployConfig {
    fn schema() -> &'static ClassSchema {
        static SCHEMA: LazyLock<ClassSchema> = LazyLock::new(|| {
            ClassSchema::new("DeployConfig")
                .field("handler", Field::string().required())
                .field("role", Field::string().required())
                .field("description", Field::string().default(""))
                .field("memory_size", Field::int().coerce().default(128))
                .field("region", Field::string())
                .field("timeout", Field::int().coerce().default(3))
                .field("dead_letter_config", Field::class::<DeadLetterConfig>())
                .field("environment", Field::class::<EnvironmentConfig>())
                .field("kms_key", Field::class::<KmsKeyConfig>())
                .field("tags", Field::map(Field::string().nullable()))
                .field("tracing_config", Field::class::<TracingConfig>())
                .field("vpc_config", Field::class::<VpcConfig>())
        });
        &SCHEMA
    }
}
