//! Configuration model for `aws-lambda.yml` documents
//!
//! Strongly-typed records for the current document layout, each declaring
//! its schema for the mapper:
//!
//! ```yaml
//! version: 1
//! functions:
//!   hello:
//!     runtime: python3.8
//!     build:
//!       source: src/hello
//!       requirements: [requirements.txt]
//!     deploy:
//!       handler: hello.handler
//!       role: service-role/lambda
//!       vpc_config:
//!         name: My VPC
//!         subnets: [Public subnet]
//!         security_groups: [allow_database]
//! ```

pub mod build;
pub mod deploy;
pub mod function;

pub use build::{BuildConfig, RequirementConfig, TestConfig, TestRunner};
pub use deploy::{
    DeadLetterConfig, DeadLetterTarget, DeployConfig, EnvironmentConfig, KmsKeyConfig, NameOrId,
    TracingConfig, TracingMode, VpcConfig,
};
pub use function::{Configuration, FunctionConfig, Runtime};
