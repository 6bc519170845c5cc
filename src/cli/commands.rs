//! CLI command implementations
//!
//! Each command loads the optional config file, applies the log level,
//! builds the schema registry and writes exactly one `ApiResponse` line to
//! stdout. Rejected input still produces a response line, followed by a
//! non-zero exit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::environment::{Environment, EnvironmentError};
use crate::observability::{Logger, Severity};
use crate::types::{ApiResponse, AppError};
use crate::validation::{Input, Schema, SchemaRegistry, SchemaValidator};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    /// Directory of extra `*.json` schema definitions (optional)
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            schema_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if let Some(dir) = &self.schema_dir {
            if !dir.is_dir() {
                return Err(CliError::config_error(format!(
                    "schema_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Built-in schemas plus any found in `schema_dir`
    pub fn build_registry(&self) -> CliResult<SchemaRegistry> {
        let mut registry = SchemaRegistry::with_builtins()?;
        if let Some(dir) = &self.schema_dir {
            let loaded = registry.load_dir(dir)?;
            Logger::info(
                "SCHEMAS_LOADED",
                &[
                    ("schema_dir", &dir.display().to_string()),
                    ("count", &loaded.to_string()),
                ],
            );
        }
        Ok(registry)
    }
}

/// Parse args and run
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            schema,
            input,
            config,
        } => validate(config.as_deref(), &schema, input.as_deref()),
        Command::Schemas { config } => schemas(config.as_deref()),
        Command::CheckEnv { config } => check_env(config.as_deref()),
    }
}

fn setup(config_path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.log_level);
    Ok(config)
}

/// Validate one input object against a named schema
pub fn validate(config_path: Option<&Path>, schema: &str, input: Option<&Path>) -> CliResult<()> {
    let config = setup(config_path)?;
    let registry = config.build_registry()?;
    let input = read_input(input)?;

    let response = validation_response(&registry, schema, &input)?;
    write_json(&response)?;

    match response.error {
        Some(error) => {
            let error_count = error
                .details
                .as_ref()
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            Err(CliError::validation_failed(error_count))
        }
        None => Ok(()),
    }
}

/// Runs the named schema and wraps the outcome in a response envelope.
pub fn validation_response(
    registry: &SchemaRegistry,
    schema: &str,
    input: &Input,
) -> CliResult<ApiResponse<Map<String, Value>>> {
    let result = SchemaValidator::new(registry).validate(schema, input)?;
    Ok(result.into())
}

/// List registered schemas
pub fn schemas(config_path: Option<&Path>) -> CliResult<()> {
    let config = setup(config_path)?;
    let registry = config.build_registry()?;
    let listing: Vec<&Schema> = registry.schemas().collect();
    write_json(&ApiResponse::ok(listing))
}

/// Validate the process environment and print it with secrets masked
pub fn check_env(config_path: Option<&Path>) -> CliResult<()> {
    setup(config_path)?;

    match Environment::from_env() {
        Ok(env) => write_json(&ApiResponse::ok(env.redacted())),
        Err(EnvironmentError::Invalid(errors)) => {
            let mut error = AppError::validation(&errors);
            error.code = "ENVIRONMENT_INVALID".into();
            write_json(&ApiResponse::<Value>::failure(error))?;
            Err(EnvironmentError::Invalid(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}
