//! Schema type definitions
//!
//! A `Schema` is a named, ordered list of field definitions. It is checked
//! once at construction and never mutated afterwards; derived schemas are new
//! values produced by explicit transforms (`pick`, `make_all_optional`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::rules::{Rule, Violation};

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Input key
    pub name: String,
    /// Rule applied to the value
    #[serde(flatten)]
    pub rule: Rule,
    /// Whether field must be present
    #[serde(default)]
    pub required: bool,
    /// Value used when the field is absent (optional fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDef {
    /// Create a required field
    pub fn required(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
            required: true,
            default: None,
        }
    }

    /// Create an optional field without a default
    pub fn optional(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
            required: false,
            default: None,
        }
    }

    /// Create an optional field that falls back to `default` when absent
    pub fn with_default(name: impl Into<String>, rule: Rule, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            rule,
            required: false,
            default: Some(default.into()),
        }
    }
}

/// Serialized form of a schema. Deserializing a `Schema` goes through
/// `Schema::new`, so definitions read from disk get the same checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl TryFrom<SchemaDefinition> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDefinition) -> SchemaResult<Self> {
        let mut schema = Schema::new(def.name, def.fields)?;
        schema.description = def.description;
        Ok(schema)
    }
}

/// Complete schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDefinition")]
pub struct Schema {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Builds a schema, rejecting malformed definitions.
    ///
    /// # Errors
    ///
    /// - duplicate field names
    /// - inconsistent rule parameters (e.g. max < min)
    /// - a default on a required field
    /// - a default that fails its own rule
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> SchemaResult<Self> {
        let name = name.into();
        let mut seen = HashSet::new();

        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field: field.name.clone(),
                });
            }

            field
                .rule
                .check_params()
                .map_err(|reason| SchemaError::InvalidRule {
                    schema: name.clone(),
                    field: field.name.clone(),
                    reason,
                })?;

            if let Some(default) = &field.default {
                if field.required {
                    return Err(SchemaError::DefaultOnRequired {
                        schema: name,
                        field: field.name.clone(),
                    });
                }
                if let Err(violation) = field.rule.check(default) {
                    let reason = match violation {
                        Violation::Invalid(msg) => msg,
                        Violation::Nested(errors) => errors
                            .iter()
                            .map(|e| e.to_string())
                            .collect::<Vec<_>>()
                            .join("; "),
                    };
                    return Err(SchemaError::InvalidDefault {
                        schema: name,
                        field: field.name.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(Self {
            name,
            description: None,
            fields,
        })
    }

    /// Attaches a description (shown in schema listings)
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns a copy where every field is optional.
    ///
    /// Rules and defaults are kept as-is, so a present value is held to the
    /// same rule as in the source schema.
    pub fn make_all_optional(&self) -> Schema {
        Schema {
            name: self.name.clone(),
            description: self.description.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| FieldDef {
                    required: false,
                    ..f.clone()
                })
                .collect(),
        }
    }

    /// Returns a new schema named `name` containing only `fields`, in the
    /// order they are declared in `self`.
    pub fn pick(&self, name: impl Into<String>, fields: &[&str]) -> SchemaResult<Schema> {
        if let Some(missing) = fields.iter().find(|f| self.field(f).is_none()) {
            return Err(SchemaError::UnknownField {
                schema: self.name.clone(),
                field: missing.to_string(),
            });
        }

        Ok(Schema {
            name: name.into(),
            description: None,
            fields: self
                .fields
                .iter()
                .filter(|f| fields.contains(&f.name.as_str()))
                .cloned()
                .collect(),
        })
    }
}
