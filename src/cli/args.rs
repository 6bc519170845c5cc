//! CLI argument definitions using clap
//!
//! Commands:
//! - shared-validation validate --schema <name> [--input <path>] [--config <path>]
//! - shared-validation schemas [--config <path>]
//! - shared-validation check-env [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate request payloads against the shared schemas
#[derive(Parser, Debug)]
#[command(name = "shared-validation")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Validate one JSON object read from stdin or a file
    Validate {
        /// Schema name, e.g. create_user
        #[arg(long)]
        schema: String,

        /// Read the input from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List registered schemas and their fields
    Schemas {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate the process environment
    CheckEnv {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
