//! Observability for shared-validation
//!
//! Structured JSON logging only. Logging is read-only: it never changes a
//! validation outcome and never fails the caller.
//!
//! ```ignore
//! use shared_validation::observability::Logger;
//!
//! Logger::info("SCHEMAS_LOADED", &[("count", "7")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
