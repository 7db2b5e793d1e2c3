//! Recursive JSON flattening
//!
//! Converts one arbitrarily nested JSON record into a single-level row of
//! `(column, value)` string pairs. Column names encode the nesting path:
//! object keys join with `.`, list elements append their positional index
//! (`tags_0`, `tags_1`). An empty list contributes no column at all.
//!
//! Scalars stringify: null becomes the empty string, booleans `true`/`false`,
//! numbers their display form, strings pass through verbatim.
//!
//! Flattening is pure: no I/O, no reordering, no deduplication. Different
//! records may produce different column sets; unioning them into one table
//! schema is the writer's job.

use crate::error::{Error, Result};
use serde_json::Value;

/// Delimiter joining nested object keys in flattened column names
pub const PATH_DELIMITER: char = '.';

/// One flattened record: column name → scalar string value, in first-seen order
pub type FlatRow = Vec<(String, String)>;

/// Flatten one raw record into a single-level row
///
/// The record must be a JSON object at the top level; anything else is a
/// fatal flattening error rather than a silently corrupt row.
pub fn flatten_record(record: &Value) -> Result<FlatRow> {
    let map = record.as_object().ok_or_else(|| {
        Error::flatten(format!(
            "expected a JSON object at the top level, got {}",
            json_type_name(record)
        ))
    })?;

    let mut row = FlatRow::new();
    for (key, value) in map {
        flatten_value(key.clone(), value, &mut row);
    }
    Ok(row)
}

fn flatten_value(path: String, value: &Value, row: &mut FlatRow) {
    match value {
        Value::Null => row.push((path, String::new())),
        Value::Bool(b) => row.push((path, b.to_string())),
        Value::Number(n) => row.push((path, n.to_string())),
        Value::String(s) => row.push((path, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(format!("{path}_{index}"), item, row);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_value(format!("{path}{PATH_DELIMITER}{key}"), nested, row);
            }
        }
    }
}

/// Human-readable JSON type name for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
