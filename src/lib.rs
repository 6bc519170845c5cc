//! shared-validation - input-validation schemas shared by the users API and
//! the web frontend
//!
//! The core is `validation`: composable field rules, named object schemas and
//! a uniform success/failure result. Around it sit the environment
//! descriptor, shared response types, structured logging and a small CLI.

pub mod cli;
pub mod environment;
pub mod observability;
pub mod types;
pub mod validation;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
