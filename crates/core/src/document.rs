//! Store-boundary documents and key extraction.
//!
//! A [`Document`] is the attribute map exchanged with executors. Typed
//! entities are converted to documents (and stripped of metadata) before
//! every write, and back after every read.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::metadata::EntityMetadata;
use crate::strip::strip_metadata;

/// Attribute name to attribute value.
pub type Document = Map<String, Value>;

/// Serializes an entity into a metadata-free document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match strip_metadata(&serde_json::to_value(value)?) {
        Value::Object(document) => Ok(document),
        other => Err(Error::Serialization(format!(
            "entity must serialize to an object, got {}",
            value_kind(&other)
        ))),
    }
}

/// Deserializes a document returned by the store.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Reads a key attribute, which must be a string.
pub fn key_value<'d>(document: &'d Document, field: &str) -> Result<&'d str> {
    match document.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(Error::InvalidKey {
            field: field.to_string(),
            reason: format!("expected a string, got {}", value_kind(other)),
        }),
        None => Err(Error::InvalidKey {
            field: field.to_string(),
            reason: "missing".to_string(),
        }),
    }
}

/// Builds the primary key of a document from its own key attributes.
pub fn primary_key(metadata: &EntityMetadata, document: &Document) -> Result<Document> {
    let mut key = Document::new();
    key.insert(
        metadata.partition_key.clone(),
        Value::String(key_value(document, &metadata.partition_key)?.to_string()),
    );
    if let Some(sort_key) = &metadata.sort_key {
        key.insert(
            sort_key.clone(),
            Value::String(key_value(document, sort_key)?.to_string()),
        );
    }
    Ok(key)
}

/// Builds a primary key from caller-supplied values.
///
/// The sort key is only included when the table declares one and a value is
/// given.
pub fn key_from_values(
    metadata: &EntityMetadata,
    partition_key: &str,
    sort_key: Option<&str>,
) -> Document {
    let mut key = Document::new();
    key.insert(
        metadata.partition_key.clone(),
        Value::String(partition_key.to_string()),
    );
    if let (Some(name), Some(value)) = (&metadata.sort_key, sort_key) {
        key.insert(name.clone(), Value::String(value.to_string()));
    }
    key
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
