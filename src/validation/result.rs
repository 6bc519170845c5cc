//! Validation result protocol
//!
//! Every schema returns the same discriminated type. Failures are data:
//! nothing here panics or returns `Err` for a rejected input.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::errors::FieldError;

/// Untyped key-value input accepted at the validation boundary
pub type Input = Map<String, Value>;

/// Outcome of validating one input against one schema
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Normalized input: defaults applied, undeclared keys dropped
    Success(Map<String, Value>),
    /// Every failing field, in declaration order. Never empty.
    Failure(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            ValidationResult::Success(data) => Some(data),
            ValidationResult::Failure(_) => None,
        }
    }

    /// Errors on failure, empty slice on success
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Success(_) => &[],
            ValidationResult::Failure(errors) => errors,
        }
    }

    /// Errors reported at exactly `path`
    pub fn errors_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors().iter().filter(move |e| e.path == path)
    }

    pub fn has_error_for(&self, path: &str) -> bool {
        self.errors_for(path).next().is_some()
    }

    pub fn into_result(self) -> Result<Map<String, Value>, Vec<FieldError>> {
        match self {
            ValidationResult::Success(data) => Ok(data),
            ValidationResult::Failure(errors) => Err(errors),
        }
    }

    /// Decodes successful data into a typed request struct.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        let data = self.into_result().map_err(DecodeError::Invalid)?;
        Ok(serde_json::from_value(Value::Object(data))?)
    }

    /// Transport-neutral JSON rendering
    pub fn to_json(&self) -> Value {
        match self {
            ValidationResult::Success(data) => json!({
                "success": true,
                "data": data,
            }),
            ValidationResult::Failure(errors) => json!({
                "success": false,
                "errors": errors,
            }),
        }
    }
}

/// Failure to obtain a typed value from an input
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("validation failed with {} error(s)", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("validated data does not match the target type: {0}")]
    Type(#[from] serde_json::Error),
}

impl DecodeError {
    /// Field errors, if this was a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DecodeError::Invalid(errors) => errors,
            DecodeError::Type(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn failure() -> ValidationResult {
        ValidationResult::Failure(vec![
            FieldError::invalid("email", "must be a valid email address"),
            FieldError::missing("name"),
        ])
    }

    #[test]
    fn test_accessors() {
        let ok = ValidationResult::Success(Map::new());
        assert!(ok.is_success());
        assert!(ok.errors().is_empty());
        assert!(ok.data().is_some());

        let err = failure();
        assert!(!err.is_success());
        assert!(err.data().is_none());
        assert_eq!(err.errors().len(), 2);
        assert!(err.has_error_for("name"));
        assert!(!err.has_error_for("password"));
        assert_eq!(err.errors_for("email").count(), 1);
    }

    #[test]
    fn test_to_json_shapes() {
        let json = failure().to_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][1]["path"], "name");
        assert_eq!(json["errors"][1]["code"], "FIELD_MISSING");

        let mut data = Map::new();
        data.insert("page".into(), Value::from(1));
        let json = ValidationResult::Success(data).to_json();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["page"], 1);
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        page: i64,
    }

    #[test]
    fn test_decode() {
        let mut data = Map::new();
        data.insert("page".into(), Value::from(3));
        let page: Page = ValidationResult::Success(data).decode().unwrap();
        assert_eq!(page.page, 3);

        let err = failure().decode::<Page>().unwrap_err();
        assert_eq!(err.field_errors().len(), 2);

        let err = ValidationResult::Success(Map::new()).decode::<Page>().unwrap_err();
        assert!(matches!(err, DecodeError::Type(_)));
    }
}
