//! Sample configuration documents.
//!
//! The resource names match the records served by [`LOOKUPS`], so a
//! document can be resolved offline against it.

/// A current-layout document with one fully networked function.
pub const CURRENT: &str = r#"
version: 1
functions:
  hello:
    runtime: python3.8
    build:
      source: src/hello
      requirements:
        - requirements.txt
    test:
      source: tests/hello
    deploy:
      handler: hello.handler
      role: service-role/lambda
      description: Says hello
      memory_size: 256
      timeout: 30
      environment:
        variables:
          FOO: bar
          BAR:
      tags:
        team: platform
      vpc_config:
        name: My VPC
        subnets:
          - Public subnet
          - name: Private subnet
        security_groups:
          - allow_database
  goodbye:
    build:
      source: src/goodbye/
"#;

/// The same functions in the flat legacy layout.
pub const LEGACY: &str = r#"
hello:
  runtime: python3.8
  source: src/hello
  requirements: requirements.txt
  test:
    source: tests/hello
  handler: hello.handler
  role: service-role/lambda
  description: Says hello
  memory: 256
  timeout: 30
  environment:
    FOO: bar
    BAR:
  tags:
    team: platform
  vpc: My VPC
  subnets:
    - Public subnet
    - name: Private subnet
  security_groups:
    - allow_database
goodbye:
  source: src/goodbye/
"#;

/// A lookups file serving the names used by [`CURRENT`] and [`LEGACY`].
pub const LOOKUPS: &str = r#"
account_id: "123456789012"
resources:
  vpc:
    - name: My VPC
      id: vpc-12345678
  subnet:
    - name: Public subnet
      id: subnet-12345678
      vpc_id: vpc-12345678
    - name: Private subnet
      id: subnet-11111111
      vpc_id: vpc-12345678
  security_group:
    - name: allow_database
      id: sg-12345678
      vpc_id: vpc-12345678
key_aliases:
  alias/lambda: arn:aws:kms:eu-west-1:123456789012:key/12345678-dead-beef-face-cafe12345678
"#;

/// Parse a YAML snippet into an untyped document.
///
/// # Panics
/// Panics if `yaml` is not valid YAML.
pub fn document(yaml: &str) -> serde_json::Value {
    serde_yaml::from_str(yaml).unwrap_or_else(|e| panic!("document: invalid YAML: {e}"))
}
