//! Resolve command implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use ltools_core::{ProcessEnvironment, ResolveOptions, Resolver, StaticDirectory};
use ltools_fs::NormalizedPath;
use ltools_schema::schema::NameOrId;

use super::load_source;
use crate::error::Result;

/// Arguments of the resolve command
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub names: Vec<String>,
    pub account_id: Option<String>,
    pub region: Option<String>,
    pub lookups: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub json: bool,
}

/// Run the resolve command
///
/// Every lookup is answered from the lookups file. Without one, only
/// configurations that already use identifiers and full ARNs resolve.
pub async fn run_resolve(source: Option<&Path>, args: ResolveArgs) -> Result<()> {
    let parsed = load_source(source)?.select(args.names.as_slice())?;

    let directory = match &args.lookups {
        Some(path) => StaticDirectory::load(&NormalizedPath::new(path))?,
        None => StaticDirectory::new(),
    };
    tracing::debug!(
        lookups = ?args.lookups,
        account_id = ?args.account_id,
        region = ?args.region,
        "Resolving configuration"
    );

    let mut options = ResolveOptions::new();
    if let Some(account_id) = args.account_id {
        options = options.with_account_id(account_id);
    }
    if let Some(region) = args.region {
        options = options.with_default_region(region);
    }
    if let Some(secs) = args.timeout_secs {
        options = options.with_deadline(Duration::from_secs(secs));
    }

    let resolver = Resolver::offline(directory, Arc::new(ProcessEnvironment));
    let resolved = resolver.resolve(&parsed, &options).await?;

    if args.json {
        let requests = resolved.function_requests();
        println!("{}", serde_json::to_string_pretty(&requests)?);
        return Ok(());
    }

    for (name, function) in &resolved.config().functions {
        println!("{} {}", "+".green(), name.cyan().bold());
        println!("    bundle:  {}", function.build.bundle.as_deref().unwrap_or_default());
        println!("    package: {}", function.build.package.as_deref().unwrap_or_default());

        let Some(deploy) = &function.deploy else {
            println!("    {}", "not deployable".dimmed());
            continue;
        };
        println!("    role:    {}", deploy.role);
        if let Some(region) = &deploy.region {
            println!("    region:  {}", region);
        }
        if let Some(vpc) = &deploy.vpc_config {
            println!("    subnets: {}", ids(&vpc.subnets));
            println!("    groups:  {}", ids(&vpc.security_groups));
        }
    }
    Ok(())
}

fn ids(refs: &[NameOrId]) -> String {
    refs.iter()
        .filter_map(|r| r.id.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}
