//! Validation error types
//!
//! Two families live here:
//! - `FieldError`: per-field failure data carried inside a `ValidationResult::Failure`.
//!   These are never returned as `Err`; callers inspect them as values.
//! - `SchemaError`: malformed schema construction or registry misuse. These
//!   surface at startup, not per request.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Field-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldErrorCode {
    /// Required field absent from input
    #[serde(rename = "FIELD_MISSING")]
    FieldMissing,
    /// Field present but violates its rule
    #[serde(rename = "FIELD_INVALID")]
    FieldInvalid,
}

impl FieldErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorCode::FieldMissing => "FIELD_MISSING",
            FieldErrorCode::FieldInvalid => "FIELD_INVALID",
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single field failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path (e.g., "file.name")
    pub path: String,
    /// Failure kind
    pub code: FieldErrorCode,
    /// Human-readable message naming the violated constraint
    pub message: String,
}

impl FieldError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: FieldErrorCode::FieldMissing,
            message: "is required".into(),
        }
    }

    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: FieldErrorCode::FieldInvalid,
            message: message.into(),
        }
    }

    /// Re-roots this error under `prefix` (used for nested objects).
    pub(crate) fn nested_under(mut self, prefix: &str) -> Self {
        self.path = make_path(prefix, &self.path);
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] field '{}': {}", self.code, self.path, self.message)
    }
}

/// Joins a parent path and a field name with a dot.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, field),
    }
}

/// Schema construction and registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields in one schema share a name
    #[error("Schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    /// Rule parameters are inconsistent (e.g. max < min)
    #[error("Schema '{schema}' field '{field}' has an invalid rule: {reason}")]
    InvalidRule {
        schema: String,
        field: String,
        reason: String,
    },

    /// Declared default does not satisfy the field's own rule
    #[error("Schema '{schema}' field '{field}' has an invalid default: {reason}")]
    InvalidDefault {
        schema: String,
        field: String,
        reason: String,
    },

    /// Defaults are only meaningful on optional fields
    #[error("Schema '{schema}' field '{field}' is required and cannot declare a default")]
    DefaultOnRequired { schema: String, field: String },

    /// `pick` named a field the source schema does not have
    #[error("Schema '{schema}' has no field '{field}'")]
    UnknownField { schema: String, field: String },

    /// Registry already holds a schema with this name
    #[error("Schema '{0}' is already registered and immutable")]
    DuplicateSchema(String),

    /// Registry lookup miss
    #[error("Schema '{0}' not found")]
    UnknownSchema(String),

    /// Unreadable or invalid schema definition file
    #[error("Malformed schema file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },
}

/// Result type for schema construction and registry operations
pub type SchemaResult<T> = Result<T, SchemaError>;
