//! End-to-end tests for the configuration pipeline
//!
//! Exercises the complete flow: document on disk -> migration -> typed
//! configuration -> resolution -> deployment requests.

use std::sync::Arc;

use async_trait::async_trait;
use ltools_core::{
    Environment, LookupError, MapEnvironment, ParsedConfig, ResolutionError, ResolveOptions,
    Resolver, ResourceDirectory, ResourceKind, ResourceRecord, StaticDirectory, load,
    load_from_dir,
};
use ltools_fs::NormalizedPath;
use ltools_test_utils::{TestProject, documents};
use pretty_assertions::assert_eq;

/// Project with both a configuration and a lookups file.
fn setup_project(config: &str) -> TestProject {
    TestProject::new()
        .with_config(config)
        .with_file("lookups.yml", documents::LOOKUPS)
}

fn offline_resolver(project: &TestProject) -> Resolver {
    let lookups = NormalizedPath::new(project.root().join("lookups.yml"));
    let directory = StaticDirectory::load(&lookups).unwrap();
    let env: Arc<dyn Environment> = Arc::new(MapEnvironment::new().with("BAR", "glarch"));
    Resolver::offline(directory, env)
}

#[tokio::test]
async fn test_legacy_document_to_requests() {
    let project = setup_project(documents::LEGACY);

    let parsed = load(&NormalizedPath::new(project.config_path())).unwrap();
    let resolved = offline_resolver(&project)
        .resolve(&parsed, &ResolveOptions::new())
        .await
        .unwrap();

    let request = resolved.function_request("hello").unwrap();
    assert_eq!(request.role, "arn:aws:iam::123456789012:role/service-role/lambda");
    assert_eq!(request.memory_size, 256);

    let vpc = request.vpc_config.unwrap();
    assert_eq!(vpc.subnet_ids, vec!["subnet-12345678", "subnet-11111111"]);
    assert_eq!(vpc.security_group_ids, vec!["sg-12345678"]);
    assert_eq!(
        request.environment.unwrap().variables["BAR"],
        "glarch".to_string()
    );

    let goodbye = &resolved.config().functions["goodbye"].build;
    assert!(goodbye.source.ends_with("/src/goodbye/"));
    assert!(goodbye.package.as_deref().unwrap().ends_with("/src/goodbye.zip"));
}

#[tokio::test]
async fn test_legacy_and_current_resolve_identically() {
    let legacy = setup_project(documents::LEGACY);
    let current = setup_project(documents::CURRENT);

    let legacy_parsed = load_from_dir(&NormalizedPath::new(legacy.root())).unwrap();
    let current_parsed = load_from_dir(&NormalizedPath::new(current.root())).unwrap();

    let options = ResolveOptions::new().with_default_region("eu-west-1");
    let legacy_requests = offline_resolver(&legacy)
        .resolve(&legacy_parsed, &options)
        .await
        .unwrap()
        .function_requests();
    let current_requests = offline_resolver(&current)
        .resolve(&current_parsed, &options)
        .await
        .unwrap()
        .function_requests();

    assert_eq!(
        serde_json::to_value(&legacy_requests).unwrap(),
        serde_json::to_value(&current_requests).unwrap()
    );
}

// ============================================================================
// Custom collaborators
// ============================================================================

/// Directory that knows every subnet twice.
struct DuplicatingDirectory;

#[async_trait]
impl ResourceDirectory for DuplicatingDirectory {
    async fn find_by_name(
        &self,
        kind: ResourceKind,
        names: &[String],
        vpc_id: Option<&str>,
    ) -> Result<Vec<ResourceRecord>, LookupError> {
        let mut records = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let record = ResourceRecord::new(name.clone(), format!("{kind}-{i}"));
            let record = match vpc_id {
                Some(vpc) => record.in_vpc(vpc),
                None => record,
            };
            if kind == ResourceKind::Subnet {
                let mut twin = record.clone();
                twin.id.push_str("-twin");
                records.push(twin);
            }
            records.push(record);
        }
        Ok(records)
    }
}

#[tokio::test]
async fn test_ambiguous_names_abort_whole_resolution() {
    let project = setup_project(documents::CURRENT);
    let parsed: ParsedConfig = load_from_dir(&NormalizedPath::new(project.root())).unwrap();
    let before = parsed.clone();

    let keys = Arc::new(StaticDirectory::new());
    let resolver = Resolver::new(
        Arc::new(DuplicatingDirectory),
        keys.clone(),
        keys,
        Arc::new(MapEnvironment::new()),
    );
    let err = resolver
        .resolve(&parsed, &ResolveOptions::new().with_account_id("123456789012"))
        .await
        .unwrap_err();

    match err {
        ResolutionError::Ambiguous { kind, name, ids } => {
            assert_eq!(kind, ResourceKind::Subnet);
            assert_eq!(name, "Private subnet");
            assert_eq!(ids.len(), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(parsed, before);
}
