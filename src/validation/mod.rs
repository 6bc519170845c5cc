//! Input validation schemas shared by the API and the web frontend
//!
//! A caller hands an untyped key-value `Input` to a `Schema` and gets back a
//! `ValidationResult`: either the normalized input or every field error.
//!
//! # Design Principles
//!
//! - Schemas are immutable once built and safe to share across threads
//! - Validation is pure and deterministic
//! - Failures are data, never panics or `Err`
//! - Defaults fill absent optional fields only
//! - Undeclared input keys are dropped, not reported
//! - Malformed schemas fail at construction (startup), not per request
//!
//! ```ignore
//! use shared_validation::validation::{schemas, validate};
//!
//! let pagination = schemas::pagination()?;
//! let result = validate(&pagination, &serde_json::Map::new());
//! assert_eq!(result.data().unwrap()["limit"], 10);
//! ```

mod errors;
mod registry;
mod result;
mod rules;
pub mod schemas;
mod types;
mod validator;

pub use errors::{FieldError, FieldErrorCode, SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use result::{DecodeError, Input, ValidationResult};
pub use rules::{
    check_email, check_length, check_password, check_positive_int, PasswordPolicy, Rule,
    Violation,
};
pub use types::{FieldDef, Schema, SchemaDefinition};
pub use validator::{validate, validate_as, SchemaValidator};
