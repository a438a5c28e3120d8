//! Resolution of a parsed configuration against its environment.
//!
//! Resolution happens in two steps. First every external lookup the
//! configuration needs is planned, deduplicated and run concurrently. Only
//! when all of them succeed is a copy of the parsed tree rewritten with the
//! answers, so a failed run never leaves a half-resolved configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use ltools_fs::NormalizedPath;
use ltools_schema::schema::{
    BuildConfig, Configuration, DeadLetterConfig, DeployConfig, KmsKeyConfig, NameOrId,
    RequirementConfig, TestConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{LookupError, ResolutionError};
use crate::loader::ParsedConfig;
use crate::lookup::{
    Environment, IdentityProvider, KeyAliasLookup, ResourceDirectory, ResourceKind,
    StaticDirectory,
};

type Result<T> = std::result::Result<T, ResolutionError>;

/// Environment variables consulted, in order, when no region is configured.
pub const REGION_VARIABLES: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Per-run settings for [`Resolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Skips the identity lookup when set.
    pub account_id: Option<String>,
    /// Region for functions that do not name one.
    pub default_region: Option<String>,
    pub deadline: Option<Duration>,
    pub cancel: CancellationToken,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = Some(region.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// A configuration whose references have all been resolved.
///
/// Build paths are absolute, bundle and package are always present, and
/// deploy blocks carry identifiers and ARNs instead of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    root: NormalizedPath,
    config: Configuration,
}

impl ResolvedConfig {
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn into_config(self) -> Configuration {
        self.config
    }
}

/// Names grouped by the VPC they are looked up in; `None` is unscoped.
type Scoped = BTreeMap<Option<String>, BTreeSet<String>>;

/// Identifiers keyed by `(VPC scope, name)`.
type ScopedIds = BTreeMap<(Option<String>, String), String>;

/// Every lookup a configuration needs, deduplicated.
#[derive(Debug, Default)]
struct LookupPlan {
    vpcs: BTreeSet<String>,
    subnets: Scoped,
    security_groups: Scoped,
    key_aliases: BTreeSet<String>,
    needs_account: bool,
}

impl LookupPlan {
    fn collect(config: &Configuration, options: &ResolveOptions) -> Self {
        let mut plan = Self::default();

        for deploy in config.functions.values().filter_map(|f| f.deploy.as_ref()) {
            if !is_role_arn(&deploy.role) {
                plan.needs_account = true;
            }

            if let Some(dead_letter) = &deploy.dead_letter_config {
                if non_empty(&dead_letter.target_arn).is_none() && dead_letter.target.is_some() {
                    plan.needs_account = true;
                }
            }

            if let Some(kms_key) = &deploy.kms_key {
                if let (None, Some(name)) = (non_empty(&kms_key.arn), non_empty(&kms_key.name)) {
                    plan.key_aliases.insert(key_alias(name));
                }
            }

            if let Some(vpc) = &deploy.vpc_config {
                let scope = non_empty(&vpc.name).map(str::to_string);
                if let Some(name) = &scope {
                    plan.vpcs.insert(name.clone());
                }
                for (references, scoped) in [
                    (&vpc.subnets, &mut plan.subnets),
                    (&vpc.security_groups, &mut plan.security_groups),
                ] {
                    let names: Vec<_> = references
                        .iter()
                        .filter_map(NameOrId::unresolved_name)
                        .map(str::to_string)
                        .collect();
                    if !names.is_empty() {
                        scoped.entry(scope.clone()).or_default().extend(names);
                    }
                }
            }
        }

        plan.needs_account &= options.account_id.is_none();
        plan
    }
}

/// Answers to a [`LookupPlan`].
#[derive(Debug, Default)]
struct Lookups {
    account_id: Option<String>,
    subnets: ScopedIds,
    security_groups: ScopedIds,
    key_arns: BTreeMap<String, String>,
}

impl Lookups {
    fn account_id(&self) -> Result<&str> {
        self.account_id.as_deref().ok_or_else(|| {
            ResolutionError::lookup("account id")(LookupError::new("no account id is available"))
        })
    }
}

/// Resolves parsed configurations through injected collaborators.
#[derive(Clone)]
pub struct Resolver {
    directory: Arc<dyn ResourceDirectory>,
    keys: Arc<dyn KeyAliasLookup>,
    identity: Arc<dyn IdentityProvider>,
    environment: Arc<dyn Environment>,
}

impl Resolver {
    pub fn new(
        directory: Arc<dyn ResourceDirectory>,
        keys: Arc<dyn KeyAliasLookup>,
        identity: Arc<dyn IdentityProvider>,
        environment: Arc<dyn Environment>,
    ) -> Self {
        Self {
            directory,
            keys,
            identity,
            environment,
        }
    }

    /// A resolver answering every lookup from one static directory.
    pub fn offline(directory: StaticDirectory, environment: Arc<dyn Environment>) -> Self {
        let directory = Arc::new(directory);
        Self::new(directory.clone(), directory.clone(), directory, environment)
    }

    /// Resolve `parsed` into a new configuration.
    ///
    /// `parsed` is never modified. The run is aborted when the deadline in
    /// `options` passes or its cancellation token fires.
    pub async fn resolve(
        &self,
        parsed: &ParsedConfig,
        options: &ResolveOptions,
    ) -> Result<ResolvedConfig> {
        if options.cancel.is_cancelled() {
            return Err(ResolutionError::Cancelled);
        }

        let plan = LookupPlan::collect(parsed.config(), options);
        debug!(
            vpcs = plan.vpcs.len(),
            subnet_scopes = plan.subnets.len(),
            security_group_scopes = plan.security_groups.len(),
            key_aliases = plan.key_aliases.len(),
            needs_account = plan.needs_account,
            "Planned lookups"
        );

        let lookups = guard(self.fetch(&plan, options), options).await?;
        let config = self.apply(parsed, &lookups, options)?;

        info!(functions = config.functions.len(), "Resolved configuration");
        Ok(ResolvedConfig {
            root: parsed.root().clone(),
            config,
        })
    }

    async fn fetch(&self, plan: &LookupPlan, options: &ResolveOptions) -> Result<Lookups> {
        let account = async {
            match &options.account_id {
                Some(account_id) => Ok(Some(account_id.clone())),
                None if plan.needs_account => {
                    debug!("Looking up account id");
                    self.identity
                        .account_id()
                        .await
                        .map(Some)
                        .map_err(ResolutionError::lookup("account id"))
                }
                None => Ok(None),
            }
        };
        let keys = try_join_all(plan.key_aliases.iter().map(|alias| self.key_arn(alias)));
        let vpcs = self.find_unique(ResourceKind::Vpc, &plan.vpcs, None);

        let (account_id, key_arns, vpcs) = futures::try_join!(account, keys, vpcs)?;

        let (subnets, security_groups) = futures::try_join!(
            self.find_scoped(ResourceKind::Subnet, &plan.subnets, &vpcs),
            self.find_scoped(ResourceKind::SecurityGroup, &plan.security_groups, &vpcs),
        )?;

        Ok(Lookups {
            account_id,
            subnets,
            security_groups,
            key_arns: key_arns.into_iter().collect(),
        })
    }

    async fn key_arn(&self, alias: &str) -> Result<(String, String)> {
        debug!(alias, "Looking up KMS key alias");
        let arn = self
            .keys
            .key_arn(alias)
            .await
            .map_err(ResolutionError::lookup(format!("KMS key alias \"{alias}\"")))?;
        match arn {
            Some(arn) => Ok((alias.to_string(), arn)),
            None => Err(ResolutionError::KeyAliasNotFound {
                alias: alias.to_string(),
            }),
        }
    }

    /// One directory call for all `names`; each must match exactly once.
    async fn find_unique(
        &self,
        kind: ResourceKind,
        names: &BTreeSet<String>,
        vpc_id: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        if names.is_empty() {
            return Ok(BTreeMap::new());
        }

        let names: Vec<String> = names.iter().cloned().collect();
        debug!(%kind, ?names, vpc_id, "Looking up resources by name");
        let records = self
            .directory
            .find_by_name(kind, &names, vpc_id)
            .await
            .map_err(ResolutionError::lookup(format!("{kind} names")))?;

        let mut found: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in records {
            found.entry(record.name).or_default().push(record.id);
        }

        names
            .into_iter()
            .map(|name| {
                let mut ids = found.remove(&name).unwrap_or_default();
                ids.sort();
                ids.dedup();
                match ids.len() {
                    0 => Err(ResolutionError::NotFound { kind, name }),
                    1 => Ok((name, ids.remove(0))),
                    _ => Err(ResolutionError::Ambiguous { kind, name, ids }),
                }
            })
            .collect()
    }

    /// One directory call per VPC scope, run concurrently.
    async fn find_scoped(
        &self,
        kind: ResourceKind,
        scopes: &Scoped,
        vpcs: &BTreeMap<String, String>,
    ) -> Result<ScopedIds> {
        let found = try_join_all(scopes.iter().map(|(scope, names)| async move {
            let vpc_id = scope.as_ref().and_then(|name| vpcs.get(name)).map(String::as_str);
            let ids = self.find_unique(kind, names, vpc_id).await?;
            Ok::<_, ResolutionError>((scope, ids))
        }))
        .await?;

        Ok(found
            .into_iter()
            .flat_map(|(scope, ids)| {
                ids.into_iter()
                    .map(move |(name, id)| ((scope.clone(), name), id))
            })
            .collect())
    }

    fn apply(
        &self,
        parsed: &ParsedConfig,
        lookups: &Lookups,
        options: &ResolveOptions,
    ) -> Result<Configuration> {
        let root = parsed.root();
        let mut config = parsed.config().clone();

        for (name, function) in config.functions.iter_mut() {
            resolve_build(&mut function.build, root);
            if let Some(test) = &mut function.test {
                resolve_test(test, root);
            }
            if let Some(deploy) = &mut function.deploy {
                self.resolve_deploy(name, deploy, lookups, options)?;
            }
        }

        Ok(config)
    }

    fn resolve_deploy(
        &self,
        function: &str,
        deploy: &mut DeployConfig,
        lookups: &Lookups,
        options: &ResolveOptions,
    ) -> Result<()> {
        if deploy.region.as_deref().is_none_or(str::is_empty) {
            deploy.region = options
                .default_region
                .clone()
                .filter(|r| !r.is_empty())
                .or_else(|| {
                    REGION_VARIABLES
                        .iter()
                        .find_map(|key| self.environment.var(key).filter(|v| !v.is_empty()))
                });
        }

        if !is_role_arn(&deploy.role) {
            deploy.role = format!("arn:aws:iam::{}:role/{}", lookups.account_id()?, deploy.role);
        }

        if let Some(dead_letter) = &deploy.dead_letter_config {
            if non_empty(&dead_letter.target_arn).is_none() {
                let target = dead_letter.target.as_ref().and_then(|target| {
                    match (non_empty(&target.sns), non_empty(&target.sqs)) {
                        (Some(topic), _) => Some(("sns", topic)),
                        (None, Some(queue)) => Some(("sqs", queue)),
                        (None, None) => None,
                    }
                });
                if let Some((service, name)) = target {
                    let region =
                        deploy
                            .region
                            .as_deref()
                            .ok_or_else(|| ResolutionError::MissingRegion {
                                function: function.to_string(),
                            })?;
                    let arn = format!(
                        "arn:aws:{service}:{region}:{}:{name}",
                        lookups.account_id()?
                    );
                    deploy.dead_letter_config = Some(DeadLetterConfig {
                        target: None,
                        target_arn: Some(arn),
                    });
                }
            }
        }

        if let Some(kms_key) = &deploy.kms_key {
            if let (None, Some(name)) = (non_empty(&kms_key.arn), non_empty(&kms_key.name)) {
                let alias = key_alias(name);
                let arn = lookups
                    .key_arns
                    .get(&alias)
                    .cloned()
                    .ok_or(ResolutionError::KeyAliasNotFound { alias })?;
                deploy.kms_key = Some(KmsKeyConfig {
                    name: None,
                    arn: Some(arn),
                });
            }
        }

        if let Some(vpc) = &mut deploy.vpc_config {
            let scope = non_empty(&vpc.name).map(str::to_string);
            resolve_references(&mut vpc.subnets, ResourceKind::Subnet, &scope, &lookups.subnets)?;
            resolve_references(
                &mut vpc.security_groups,
                ResourceKind::SecurityGroup,
                &scope,
                &lookups.security_groups,
            )?;
        }

        if let Some(environment) = &mut deploy.environment {
            for (key, value) in environment.variables.iter_mut() {
                if value.is_none() {
                    *value = Some(self.passthrough(key));
                }
            }
        }

        Ok(())
    }

    /// Value of a passthrough variable: the exact name, then its upper-case
    /// form, then empty.
    fn passthrough(&self, key: &str) -> String {
        self.environment
            .var(key)
            .or_else(|| self.environment.var(&key.to_uppercase()))
            .unwrap_or_default()
    }
}

/// Apply the deadline and cancellation token of `options` to `future`.
async fn guard<T>(
    future: impl Future<Output = Result<T>>,
    options: &ResolveOptions,
) -> Result<T> {
    let cancellable = async {
        tokio::select! {
            biased;
            _ = options.cancel.cancelled() => Err(ResolutionError::Cancelled),
            result = future => result,
        }
    };

    match options.deadline {
        Some(after) => tokio::time::timeout(after, cancellable)
            .await
            .map_err(|_| ResolutionError::TimedOut { after })?,
        None => cancellable.await,
    }
}

fn resolve_references(
    references: &mut [NameOrId],
    kind: ResourceKind,
    scope: &Option<String>,
    ids: &ScopedIds,
) -> Result<()> {
    for reference in references.iter_mut() {
        if let Some(name) = reference.unresolved_name() {
            let id = ids
                .get(&(scope.clone(), name.to_string()))
                .ok_or_else(|| ResolutionError::NotFound {
                    kind,
                    name: name.to_string(),
                })?;
            *reference = NameOrId::by_id(id.clone());
        }
    }
    Ok(())
}

fn resolve_build(build: &mut BuildConfig, root: &NormalizedPath) {
    let source = root.anchor(&build.source);
    let bundle = build.bundle.as_deref().map(|bundle| root.anchor(bundle));
    let package = build.package.as_deref().map(|package| root.anchor(package));
    let (bundle, package) = derive_artifacts(&source, bundle, package);

    build.source = source.into_string();
    build.bundle = Some(bundle.into_string());
    build.package = Some(package.into_string());
    anchor_requirements(&mut build.requirements, root);
}

fn resolve_test(test: &mut TestConfig, root: &NormalizedPath) {
    test.source = root.anchor(&test.source).into_string();
    anchor_requirements(&mut test.requirements, root);
}

fn anchor_requirements(requirements: &mut [RequirementConfig], root: &NormalizedPath) {
    for requirement in requirements {
        requirement.file = root.anchor(&requirement.file).into_string();
    }
}

/// Fill in whichever of the bundle folder and package archive is missing.
///
/// With neither given both derive from the source folder; otherwise the
/// missing one mirrors the one that was given.
pub fn derive_artifacts(
    source: &NormalizedPath,
    bundle: Option<NormalizedPath>,
    package: Option<NormalizedPath>,
) -> (NormalizedPath, NormalizedPath) {
    match (bundle, package) {
        (Some(bundle), Some(package)) => (bundle, package),
        (Some(bundle), None) => {
            let package = format!("{}.zip", bundle.trim_trailing_separator());
            (bundle, NormalizedPath::new(package))
        }
        (None, Some(package)) => {
            let stem = package.as_str().strip_suffix(".zip").unwrap_or(package.as_str());
            (NormalizedPath::new(format!("{stem}-bundle")), package)
        }
        (None, None) => {
            let source = source.trim_trailing_separator();
            (
                NormalizedPath::new(format!("{source}-bundle")),
                NormalizedPath::new(format!("{source}.zip")),
            )
        }
    }
}

fn is_role_arn(role: &str) -> bool {
    role.starts_with("arn:aws:iam")
}

fn key_alias(name: &str) -> String {
    format!("alias/{name}")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
