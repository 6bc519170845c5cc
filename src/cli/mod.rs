//! CLI module for shared-validation
//!
//! Provides command-line interface for:
//! - validate: check one JSON payload against a named schema
//! - schemas: list registered schemas
//! - check-env: validate the process environment

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_env, run, run_command, schemas, validate, validation_response, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_input, read_input, write_json};
