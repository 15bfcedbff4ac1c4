//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between documents and DynamoDB attribute
//! maps, and between table schemas and SDK create-table types. These are
//! testable in isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType,
};
use dynamap_core::schema::{self, SecondaryIndex};
use dynamap_core::{Document, StoreError, StoreResult};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};
use serde_json::Value;

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Document conversions
// ============================================================================

/// Convert a document to a DynamoDB item.
///
/// With `convert_empty_values`, empty strings at any depth are written as NULL.
pub fn document_to_item(document: &Document, convert_empty_values: bool) -> StoreResult<Item> {
    let result = if convert_empty_values {
        let mut converted = Value::Object(document.clone());
        null_empty_strings(&mut converted);
        to_item(converted)
    } else {
        to_item(document)
    };

    result.map_err(|e| StoreError::Validation(format!("cannot convert document: {e}")))
}

/// Convert a DynamoDB item to a document.
pub fn item_to_document(item: Item) -> StoreResult<Document> {
    from_item(item).map_err(|e| StoreError::Request(format!("cannot read item: {e}")))
}

/// Convert expression attribute names to the SDK's map type.
pub fn names_to_map(names: BTreeMap<String, String>) -> HashMap<String, String> {
    names.into_iter().collect()
}

fn null_empty_strings(value: &mut Value) {
    match value {
        Value::String(s) if s.is_empty() => *value = Value::Null,
        Value::Array(items) => items.iter_mut().for_each(null_empty_strings),
        Value::Object(map) => map.values_mut().for_each(null_empty_strings),
        _ => {}
    }
}

// ============================================================================
// Schema conversions
// ============================================================================

fn to_key_type(key_type: schema::KeyType) -> KeyType {
    match key_type {
        schema::KeyType::Hash => KeyType::Hash,
        schema::KeyType::Range => KeyType::Range,
    }
}

fn to_scalar_type(attribute_type: schema::AttributeType) -> ScalarAttributeType {
    match attribute_type {
        schema::AttributeType::String => ScalarAttributeType::S,
    }
}

fn to_projection_type(projection: schema::ProjectionType) -> ProjectionType {
    match projection {
        schema::ProjectionType::All => ProjectionType::All,
    }
}

/// Convert the billing mode of a table schema.
pub fn to_billing_mode(billing_mode: schema::BillingMode) -> BillingMode {
    match billing_mode {
        schema::BillingMode::PayPerRequest => BillingMode::PayPerRequest,
    }
}

/// Convert a key schema.
pub fn to_key_schema(elements: &[schema::KeySchemaElement]) -> StoreResult<Vec<KeySchemaElement>> {
    elements
        .iter()
        .map(|element| {
            KeySchemaElement::builder()
                .attribute_name(&element.attribute_name)
                .key_type(to_key_type(element.key_type))
                .build()
                .map_err(|e| StoreError::Validation(e.to_string()))
        })
        .collect()
}

/// Convert attribute definitions.
pub fn to_attribute_definitions(
    definitions: &[schema::AttributeDefinition],
) -> StoreResult<Vec<AttributeDefinition>> {
    definitions
        .iter()
        .map(|definition| {
            AttributeDefinition::builder()
                .attribute_name(&definition.attribute_name)
                .attribute_type(to_scalar_type(definition.attribute_type))
                .build()
                .map_err(|e| StoreError::Validation(e.to_string()))
        })
        .collect()
}

/// Convert a secondary index declaration.
pub fn to_global_secondary_index(index: &SecondaryIndex) -> StoreResult<GlobalSecondaryIndex> {
    GlobalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(to_key_schema(&index.key_schema)?))
        .projection(
            Projection::builder()
                .projection_type(to_projection_type(index.projection))
                .build(),
        )
        .build()
        .map_err(|e| StoreError::Validation(e.to_string()))
}
