//! Opaque page cursors.
//!
//! A cursor is the JSON text of the store's last evaluated key: an object
//! mapping each key attribute of the queried key schema to its string value.

use serde_json::Value;

use crate::document::Document;
use crate::error::{Error, Result};

/// Serializes a last evaluated key into a cursor.
pub fn encode_cursor(last_evaluated_key: &Document) -> Result<String> {
    Ok(serde_json::to_string(last_evaluated_key)?)
}

/// Parses a cursor back into an exclusive start key.
pub fn decode_cursor(cursor: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(cursor)
        .map_err(|e| Error::MalformedCursor(format!("not valid JSON: {e}")))?;

    let Value::Object(key) = value else {
        return Err(Error::MalformedCursor("expected a JSON object".to_string()));
    };

    if key.is_empty() {
        return Err(Error::MalformedCursor("cursor holds no key attributes".to_string()));
    }

    if let Some((name, _)) = key.iter().find(|(_, value)| !value.is_string()) {
        return Err(Error::MalformedCursor(format!(
            "key attribute '{name}' is not a string"
        )));
    }

    Ok(key)
}
