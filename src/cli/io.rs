//! JSON I/O handling for CLI
//!
//! - Input: one JSON object, from stdin or a file
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::validation::Input;

/// Read the input object from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> CliResult<Input> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_input(&content)
}

/// Parse a JSON document that must be an object.
pub fn parse_input(content: &str) -> CliResult<Input> {
    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::io_error("Input must be a JSON object")),
    }
}

/// Write one JSON line to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_json_to(&mut stdout, value)
}

pub fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_input_object() {
        let input = parse_input(r#"{"page": 2}"#).unwrap();
        assert_eq!(input["page"], 2);
    }

    #[test]
    fn test_parse_input_rejects_non_objects() {
        assert!(parse_input("[1, 2]").is_err());
        assert!(parse_input("   ").is_err());
        assert!(parse_input("{not json").is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("body.json");
        fs::write(&path, r#"{"query": "test"}"#).unwrap();
        let input = read_input(Some(&path)).unwrap();
        assert_eq!(input["query"], "test");

        assert!(read_input(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_write_json_single_line() {
        let mut buf = Vec::new();
        write_json_to(&mut buf, &json!({"a": {"b": [1, 2]}})).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "{\"a\":{\"b\":[1,2]}}\n");
    }
}
