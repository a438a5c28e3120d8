//! Shared test utilities for the lambda-tools workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`documents`]: sample configuration documents in current and legacy layouts
//! - [`project`]: [`TestProject`] builder writing documents into a temp directory

pub mod documents;
pub mod project;

pub use project::TestProject;
