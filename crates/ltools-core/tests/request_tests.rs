//! Tests for deployment request rendering

use std::sync::Arc;

use ltools_core::{Error, MapEnvironment, ParsedConfig, RawDocument, ResolveOptions, Resolver};
use ltools_test_utils::documents::{self, document};
use pretty_assertions::assert_eq;
use serde_json::json;

async fn resolve(yaml: &str) -> ltools_core::ResolvedConfig {
    let parsed: ParsedConfig = RawDocument::from_value(document(yaml), "/projects/app")
        .parse()
        .unwrap();
    let directory = serde_json::from_value(document(documents::LOOKUPS)).unwrap();
    let env = MapEnvironment::new().with("BAR", "glarch");
    Resolver::offline(directory, Arc::new(env))
        .resolve(&parsed, &ResolveOptions::new().with_default_region("eu-west-1"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_function_request_payload() {
    let resolved = resolve(
        r#"
functions:
  hello:
    runtime: python3.8
    build:
      source: src
    deploy:
      handler: hello.handler
      role: service-role/lambda
      description: Says hello
      memory_size: 256
      timeout: 30
      dead_letter_config:
        target:
          sns: failures
      environment:
        variables:
          foo: baz
          bar:
      kms_key: {name: lambda}
      tracing_config: {mode: PassThrough}
      tags: {team: platform}
      vpc_config:
        name: My VPC
        subnets: [Public subnet, Private subnet]
        security_groups: [allow_database]
"#,
    )
    .await;

    let request = resolved.function_request("hello").unwrap();
    let payload = serde_json::to_value(&request).unwrap();

    assert_eq!(
        payload,
        json!({
            "FunctionName": "hello",
            "Runtime": "python3.8",
            "Role": "arn:aws:iam::123456789012:role/service-role/lambda",
            "Handler": "hello.handler",
            "Description": "Says hello",
            "Timeout": 30,
            "MemorySize": 256,
            "VpcConfig": {
                "SubnetIds": ["subnet-12345678", "subnet-11111111"],
                "SecurityGroupIds": ["sg-12345678"],
            },
            "DeadLetterConfig": {
                "TargetArn": "arn:aws:sns:eu-west-1:123456789012:failures",
            },
            "Environment": {"Variables": {"foo": "baz", "bar": "glarch"}},
            "KMSKeyArn": "arn:aws:kms:eu-west-1:123456789012:key/12345678-dead-beef-face-cafe12345678",
            "TracingConfig": {"Mode": "PassThrough"},
            "Tags": {"team": "platform"},
        })
    );
}

#[tokio::test]
async fn test_minimal_request_omits_optional_blocks() {
    let resolved = resolve(
        "functions:\n  a:\n    build: {source: a}\n    deploy: {handler: a.handler, role: lambda}\n",
    )
    .await;

    let payload = serde_json::to_value(resolved.function_request("a").unwrap()).unwrap();
    assert_eq!(
        payload,
        json!({
            "FunctionName": "a",
            "Runtime": "python3.6",
            "Role": "arn:aws:iam::123456789012:role/lambda",
            "Handler": "a.handler",
            "Description": "",
            "Timeout": 3,
            "MemorySize": 128,
        })
    );
}

#[tokio::test]
async fn test_request_errors() {
    let resolved = resolve(documents::CURRENT).await;

    assert!(matches!(
        resolved.function_request("nope"),
        Err(Error::FunctionNotFound { .. })
    ));
    assert!(matches!(
        resolved.function_request("goodbye"),
        Err(Error::NotDeployable { .. })
    ));

    let names: Vec<_> = resolved
        .function_requests()
        .into_iter()
        .map(|r| r.function_name)
        .collect();
    assert_eq!(names, vec!["hello"]);
}
