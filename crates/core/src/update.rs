//! Partial update and atomic increment construction.

use std::collections::HashSet;

use serde_json::Value;

use crate::document::{primary_key, Document};
use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::metadata::EntityMetadata;
use crate::request::{ReturnValues, UpdateItemRequest};

/// A single clause of an update expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `SET field = value`
    Set { field: String, value: Value },
    /// `ADD field delta`; a missing field counts as zero.
    Add { field: String, delta: i64 },
}

impl UpdateAction {
    pub fn field(&self) -> &str {
        match self {
            UpdateAction::Set { field, .. } | UpdateAction::Add { field, .. } => field,
        }
    }
}

/// Renders actions into an `UpdateExpression`.
///
/// Placeholders are positional (`#f0`/`:v0`, `#f1`/`:v1`, ...) so arbitrary
/// field names never collide with each other or with reserved words.
pub fn render_update(actions: &[UpdateAction]) -> Expression {
    let mut expression = Expression::default();
    let mut set_clauses = Vec::new();
    let mut add_clauses = Vec::new();

    for (position, action) in actions.iter().enumerate() {
        let name = format!("#f{position}");
        let placeholder = format!(":v{position}");
        expression
            .names
            .insert(name.clone(), action.field().to_string());

        match action {
            UpdateAction::Set { value, .. } => {
                expression.values.insert(placeholder.clone(), value.clone());
                set_clauses.push(format!("{name} = {placeholder}"));
            }
            UpdateAction::Add { delta, .. } => {
                expression
                    .values
                    .insert(placeholder.clone(), Value::from(*delta));
                add_clauses.push(format!("{name} {placeholder}"));
            }
        }
    }

    let mut sections = Vec::new();
    if !set_clauses.is_empty() {
        sections.push(format!("SET {}", set_clauses.join(", ")));
    }
    if !add_clauses.is_empty() {
        sections.push(format!("ADD {}", add_clauses.join(", ")));
    }
    expression.expression = sections.join(" ");
    expression
}

/// Builds a partial update of `document`.
///
/// Walks `key_filter` when given, otherwise every attribute of the document,
/// and emits one `SET` per field. Primary key fields, absent fields, empty
/// names, and repeated names are skipped. Without a filter, `null` attributes
/// count as absent, so an unset `Option` field leaves the stored value alone;
/// naming the field in the filter writes the `null`. Fails with
/// [`Error::NoFieldsToUpdate`] when nothing is left to set.
pub fn build_update(
    metadata: &EntityMetadata,
    document: &Document,
    key_filter: Option<&[&str]>,
) -> Result<UpdateItemRequest> {
    let key = primary_key(metadata, document)?;

    let fields: Vec<&str> = match key_filter {
        Some(filter) => filter.to_vec(),
        None => document
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(field, _)| field.as_str())
            .collect(),
    };

    let mut seen = HashSet::new();
    let actions: Vec<UpdateAction> = fields
        .into_iter()
        .filter(|field| !field.is_empty())
        .filter(|field| !metadata.is_key_field(field))
        .filter(|field| seen.insert(*field))
        .filter_map(|field| {
            document.get(field).map(|value| UpdateAction::Set {
                field: field.to_string(),
                value: value.clone(),
            })
        })
        .collect();

    if actions.is_empty() {
        return Err(Error::NoFieldsToUpdate {
            table: metadata.table_name.clone(),
        });
    }

    Ok(UpdateItemRequest {
        table_name: metadata.table_name.clone(),
        key,
        actions,
        return_values: ReturnValues::None,
    })
}

/// Builds an atomic `ADD` of `delta` to `field`, echoing the new value.
///
/// The field does not need to be declared in metadata nor exist on the item.
pub fn build_increment(
    metadata: &EntityMetadata,
    document: &Document,
    field: &str,
    delta: i64,
) -> Result<UpdateItemRequest> {
    if metadata.is_key_field(field) {
        return Err(Error::InvalidKey {
            field: field.to_string(),
            reason: "key attributes cannot be incremented".to_string(),
        });
    }

    Ok(UpdateItemRequest {
        table_name: metadata.table_name.clone(),
        key: primary_key(metadata, document)?,
        actions: vec![UpdateAction::Add {
            field: field.to_string(),
            delta,
        }],
        return_values: ReturnValues::UpdatedNew,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn metadata() -> EntityMetadata {
        EntityMetadata::new("user_events", "userId").with_sort_key("ts")
    }

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn event() -> Document {
        document(json!({
            "userId": "u1",
            "ts": "t1",
            "status": "open",
            "count": 3,
            "note": null
        }))
    }

    #[test]
    fn test_update_all_fields_skips_keys() {
        let request = build_update(&metadata(), &event(), None).unwrap();

        assert_eq!(
            Value::Object(request.key.clone()),
            json!({ "userId": "u1", "ts": "t1" })
        );
        let fields: Vec<&str> = request.actions.iter().map(UpdateAction::field).collect();
        assert_eq!(fields, vec!["count", "status"]);
        assert_eq!(request.return_values, ReturnValues::None);
    }

    #[test]
    fn test_update_with_filter() {
        let request =
            build_update(&metadata(), &event(), Some(&["status", "userId", "ts"])).unwrap();

        assert_eq!(
            request.actions,
            vec![UpdateAction::Set {
                field: "status".to_string(),
                value: json!("open"),
            }]
        );

        let expression = request.update_expression();
        assert_eq!(expression.expression, "SET #f0 = :v0");
        assert_eq!(expression.names["#f0"], "status");
        assert_eq!(Value::Object(expression.values), json!({ ":v0": "open" }));
    }

    #[test]
    fn test_update_filter_writes_named_null() {
        let request = build_update(&metadata(), &event(), Some(&["note"])).unwrap();

        assert_eq!(
            request.actions,
            vec![UpdateAction::Set {
                field: "note".to_string(),
                value: Value::Null,
            }]
        );
    }

    #[test]
    fn test_update_filter_skips_absent_empty_and_repeated_fields() {
        let request = build_update(
            &metadata(),
            &event(),
            Some(&["", "missing", "count", "count"]),
        )
        .unwrap();

        let fields: Vec<&str> = request.actions.iter().map(UpdateAction::field).collect();
        assert_eq!(fields, vec!["count"]);
    }

    #[test]
    fn test_update_with_only_keys_fails() {
        let result = build_update(&metadata(), &event(), Some(&["userId", "ts"]));
        assert_eq!(
            result,
            Err(Error::NoFieldsToUpdate {
                table: "user_events".to_string()
            })
        );
    }

    #[test]
    fn test_update_requires_key_fields() {
        let doc = document(json!({ "userId": "u1", "status": "open" }));
        assert!(matches!(
            build_update(&metadata(), &doc, None),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_update_placeholders_handle_awkward_names() {
        let doc = document(json!({
            "userId": "u1",
            "ts": "t1",
            "first-name": "Ada",
            "size": 1
        }));

        let expression = build_update(&metadata(), &doc, None)
            .unwrap()
            .update_expression();

        assert_eq!(expression.expression, "SET #f0 = :v0, #f1 = :v1");
        assert_eq!(expression.names["#f0"], "first-name");
        assert_eq!(expression.names["#f1"], "size");
    }

    #[test]
    fn test_increment_request() {
        let request = build_increment(&metadata(), &event(), "views", 3).unwrap();

        assert_eq!(request.return_values, ReturnValues::UpdatedNew);
        let expression = request.update_expression();
        assert_eq!(expression.expression, "ADD #f0 :v0");
        assert_eq!(expression.names["#f0"], "views");
        assert_eq!(Value::Object(expression.values), json!({ ":v0": 3 }));
    }

    #[test]
    fn test_increment_of_key_field_fails() {
        assert!(matches!(
            build_increment(&metadata(), &event(), "ts", 1),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_render_mixed_actions() {
        let expression = render_update(&[
            UpdateAction::Set {
                field: "status".to_string(),
                value: json!("done"),
            },
            UpdateAction::Add {
                field: "count".to_string(),
                delta: -1,
            },
        ]);

        assert_eq!(expression.expression, "SET #f0 = :v0 ADD #f1 :v1");
        assert_eq!(
            Value::Object(expression.values),
            json!({ ":v0": "done", ":v1": -1 })
        );
    }
}
