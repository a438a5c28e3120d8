//! Configuration schema, field mapping and version migration for lambda-tools.
//!
//! This crate turns a raw `aws-lambda.yml` document into strongly-typed
//! configuration records:
//!
//! - [`mapper`] declares fields and parses raw values against them
//! - [`schema`] holds the configuration model built on the mapper
//! - [`migration`] upgrades older document layouts before parsing

pub mod error;
pub mod mapper;
pub mod migration;
pub mod schema;

pub use error::{MigrationError, Result, SchemaError, UndefinedFunctions};
pub use mapper::{ClassSchema, Field, SchemaType, parse_document};
pub use migration::{CURRENT_VERSION, upgrade};
pub use schema::{Configuration, FunctionConfig, Runtime};
