//! Schema registry
//!
//! Holds schemas by name. Once a name is registered it cannot be replaced;
//! the registry is built at startup and only read afterwards.
//!
//! Extra schemas may be loaded from a directory of `*.json` definition files.
//! An unreadable or malformed file is a startup failure naming the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::schemas;
use super::types::Schema;
use crate::observability::Logger;

/// Name-indexed set of immutable schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in schema.
    pub fn with_builtins() -> SchemaResult<Self> {
        let mut registry = Self::new();
        for schema in schemas::builtins()? {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Registers a schema.
    ///
    /// # Errors
    ///
    /// `SchemaError::DuplicateSchema` if the name is already taken.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateSchema(schema.name().to_string()));
        }

        let field_count = schema.fields().len().to_string();
        Logger::debug(
            "SCHEMA_REGISTERED",
            &[("schema", schema.name()), ("fields", &field_count)],
        );

        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Loads every `*.json` schema definition in `dir`, in file name order.
    ///
    /// Returns the number of schemas loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let malformed = |reason: String| SchemaError::MalformedFile {
            path: dir.display().to_string(),
            reason,
        };

        let entries = fs::read_dir(dir)
            .map_err(|e| malformed(format!("Failed to read schema directory: {}", e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| malformed(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        Ok(paths.len())
    }

    /// Loads a single schema definition file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::MalformedFile {
            path: path.display().to_string(),
            reason: format!("Failed to read file: {}", e),
        })?;

        let schema: Schema =
            serde_json::from_str(&content).map_err(|e| SchemaError::MalformedFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        self.register(schema)
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Registered schemas in name order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
