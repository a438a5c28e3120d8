//! Loading and resolution pipeline for lambda-tools.
//!
//! A configuration moves through a fixed sequence of states:
//!
//! 1. [`RawDocument`]: read from disk
//! 2. [`MigratedDocument`]: upgraded to the current layout
//! 3. [`ParsedConfig`]: validated and strongly typed
//! 4. [`ResolvedConfig`]: paths anchored, names replaced by identifiers
//!
//! Resolution consults the collaborator traits in [`lookup`], injected into
//! a [`Resolver`].

pub mod error;
pub mod loader;
pub mod lookup;
pub mod request;
pub mod resolver;

pub use error::{Error, LookupError, ResolutionError, Result};
pub use loader::{MigratedDocument, ParsedConfig, RawDocument, load, load_from_dir};
pub use lookup::{
    Environment, IdentityProvider, KeyAliasLookup, MapEnvironment, ProcessEnvironment,
    ResourceDirectory, ResourceKind, ResourceRecord, StaticDirectory,
};
pub use request::FunctionRequest;
pub use resolver::{ResolveOptions, ResolvedConfig, Resolver};
