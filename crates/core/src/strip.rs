//! Removal of the metadata attribute from JSON payloads.

use serde_json::{Map, Value};

use crate::metadata::METADATA_KEY;

/// Returns a deep copy of `value` with every `_meta` attribute removed.
///
/// Objects are rebuilt without the metadata key, arrays are stripped element
/// by element, and scalars are returned unchanged. Stripping is idempotent.
pub fn strip_metadata(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(strip_metadata).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != METADATA_KEY)
                .map(|(key, value)| (key.clone(), strip_metadata(value)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar.clone(),
    }
}

/// Returns true if `value` carries a metadata attribute at any depth.
pub fn contains_metadata(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(contains_metadata),
        Value::Object(map) => map.contains_key(METADATA_KEY) || map.values().any(contains_metadata),
        _ => false,
    }
}
