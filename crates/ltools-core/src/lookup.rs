//! Collaborators consulted during resolution.
//!
//! The resolver never talks to a cloud API itself. It asks these traits,
//! which callers implement over whatever client they use. [`StaticDirectory`]
//! answers every lookup from an in-memory table, for offline use and tests.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use ltools_fs::{DocumentStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::error::{Error, LookupError, Result};

/// Result type for collaborator calls
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Network resources that may be referenced by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    Subnet,
    SecurityGroup,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "VPC",
            ResourceKind::Subnet => "subnet",
            ResourceKind::SecurityGroup => "security group",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource as reported by the directory: its `Name` tag and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub id: String,
    /// Owning VPC, for subnets and security groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            vpc_id: None,
        }
    }

    pub fn in_vpc(mut self, vpc_id: impl Into<String>) -> Self {
        self.vpc_id = Some(vpc_id.into());
        self
    }
}

/// Finds network resources by their `Name` tag.
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// Return every resource of `kind` whose name is in `names`, restricted
    /// to `vpc_id` when given. Several records may share a name.
    async fn find_by_name(
        &self,
        kind: ResourceKind,
        names: &[String],
        vpc_id: Option<&str>,
    ) -> LookupResult<Vec<ResourceRecord>>;
}

/// Maps KMS key aliases to key ARNs.
#[async_trait]
pub trait KeyAliasLookup: Send + Sync {
    /// `alias` includes the `alias/` prefix.
    async fn key_arn(&self, alias: &str) -> LookupResult<Option<String>>;
}

/// Reports the account the caller's credentials belong to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn account_id(&self) -> LookupResult<String>;
}

/// Read access to environment variables.
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: BTreeMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Resources grouped by kind, as written in a lookups file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticResources {
    #[serde(default)]
    pub vpc: Vec<ResourceRecord>,
    #[serde(default)]
    pub subnet: Vec<ResourceRecord>,
    #[serde(default)]
    pub security_group: Vec<ResourceRecord>,
}

impl StaticResources {
    fn of(&self, kind: ResourceKind) -> &[ResourceRecord] {
        match kind {
            ResourceKind::Vpc => &self.vpc,
            ResourceKind::Subnet => &self.subnet,
            ResourceKind::SecurityGroup => &self.security_group,
        }
    }

    fn of_mut(&mut self, kind: ResourceKind) -> &mut Vec<ResourceRecord> {
        match kind {
            ResourceKind::Vpc => &mut self.vpc,
            ResourceKind::Subnet => &mut self.subnet,
            ResourceKind::SecurityGroup => &mut self.security_group,
        }
    }
}

/// Answers every lookup from in-memory tables.
///
/// Loadable from a YAML or JSON lookups file:
///
/// ```yaml
/// account_id: "123456789012"
/// resources:
///   vpc:
///     - {name: My VPC, id: vpc-12345678}
///   subnet:
///     - {name: Public subnet, id: subnet-12345678, vpc_id: vpc-12345678}
/// key_aliases:
///   alias/lambda: arn:aws:kms:eu-west-1:123456789012:key/...
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticDirectory {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub resources: StaticResources,
    #[serde(default)]
    pub key_aliases: BTreeMap<String, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a lookups file; the format follows the extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let value = DocumentStore::new().load(path)?;
        serde_json::from_value(value).map_err(|e| Error::InvalidLookups {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_resource(mut self, kind: ResourceKind, record: ResourceRecord) -> Self {
        self.resources.of_mut(kind).push(record);
        self
    }

    pub fn with_key_alias(mut self, alias: impl Into<String>, arn: impl Into<String>) -> Self {
        self.key_aliases.insert(alias.into(), arn.into());
        self
    }
}

#[async_trait]
impl ResourceDirectory for StaticDirectory {
    async fn find_by_name(
        &self,
        kind: ResourceKind,
        names: &[String],
        vpc_id: Option<&str>,
    ) -> LookupResult<Vec<ResourceRecord>> {
        Ok(self
            .resources
            .of(kind)
            .iter()
            .filter(|record| names.contains(&record.name))
            .filter(|record| vpc_id.is_none() || record.vpc_id.as_deref() == vpc_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl KeyAliasLookup for StaticDirectory {
    async fn key_arn(&self, alias: &str) -> LookupResult<Option<String>> {
        Ok(self.key_aliases.get(alias).cloned())
    }
}

#[async_trait]
impl IdentityProvider for StaticDirectory {
    async fn account_id(&self) -> LookupResult<String> {
        self.account_id
            .clone()
            .ok_or_else(|| LookupError::new("no account id is configured"))
    }
}
