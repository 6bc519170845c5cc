//! Schema validation
//!
//! Validation semantics:
//! - Fields are checked in declaration order
//! - Every failing field is reported, not just the first
//! - Within one primitive field only the first failing check is reported
//! - Absent optional fields take their default, or stay absent
//! - Supplied values are never replaced by defaults, even `0`, `""` or `null`
//! - Undeclared input keys are dropped silently
//!
//! Validation is pure and deterministic. It performs no I/O besides an
//! optional DEBUG log line.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::errors::{FieldError, SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::result::{DecodeError, Input, ValidationResult};
use super::rules::Violation;
use super::types::{FieldDef, Schema};
use crate::observability::{Logger, Severity};

/// Validates `input` against `schema`.
pub fn validate(schema: &Schema, input: &Input) -> ValidationResult {
    let result = match validate_object(schema, input) {
        Ok(data) => ValidationResult::Success(data),
        Err(errors) => ValidationResult::Failure(errors),
    };

    if Logger::enabled(Severity::Debug) {
        let error_count = result.errors().len().to_string();
        Logger::debug(
            "VALIDATION_COMPLETE",
            &[
                ("schema", schema.name()),
                ("outcome", if result.is_success() { "success" } else { "failure" }),
                ("error_count", &error_count),
            ],
        );
    }

    result
}

/// Validates and decodes into a typed request struct.
pub fn validate_as<T: DeserializeOwned>(schema: &Schema, input: &Input) -> Result<T, DecodeError> {
    validate(schema, input).decode()
}

/// Validates an object against a schema's field definitions.
///
/// Returns the normalized object, or every field error with paths relative
/// to `obj`.
pub(crate) fn validate_object(
    schema: &Schema,
    obj: &Map<String, Value>,
) -> Result<Map<String, Value>, Vec<FieldError>> {
    let mut data = Map::new();
    let mut errors = Vec::new();

    for field in schema.fields() {
        let value = match obj.get(&field.name) {
            Some(value) => value,
            None => match (&field.default, field.required) {
                (Some(default), _) => default,
                (None, true) => {
                    errors.push(FieldError::missing(&field.name));
                    continue;
                }
                (None, false) => continue,
            },
        };

        match validate_field(field, value) {
            Ok(normalized) => {
                data.insert(field.name.clone(), normalized);
            }
            Err(mut field_errors) => errors.append(&mut field_errors),
        }
    }

    if errors.is_empty() {
        Ok(data)
    } else {
        Err(errors)
    }
}

/// Runs one field's rule, rooting any errors at the field's path.
fn validate_field(field: &FieldDef, value: &Value) -> Result<Value, Vec<FieldError>> {
    field.rule.check(value).map_err(|violation| match violation {
        Violation::Invalid(message) => vec![FieldError::invalid(&field.name, message)],
        Violation::Nested(errors) => errors
            .into_iter()
            .map(|e| e.nested_under(&field.name))
            .collect(),
    })
}

/// Validator bound to a schema registry, for callers that select schemas
/// by name.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates `input` against the schema registered as `schema_name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownSchema` if no such schema is registered.
    /// A rejected input is a `ValidationResult::Failure`, not an error.
    pub fn validate(&self, schema_name: &str, input: &Input) -> SchemaResult<ValidationResult> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| SchemaError::UnknownSchema(schema_name.to_string()))?;
        Ok(validate(schema, input))
    }
}
