//! Write path: put, delete, partial update, and atomic increment.

use serde_json::{Number, Value};

use dynamap_core::document::{primary_key, to_document};
use dynamap_core::request::{DeleteItemRequest, PutItemRequest};
use dynamap_core::update::{build_increment, build_update};
use dynamap_core::{metadata_of, Document, Entity, EntityMetadata, Result};

use crate::handle::ClientHandle;

/// Writes an entity, replacing any stored item with the same key.
pub async fn put_object<T: Entity>(handle: &ClientHandle, value: &T) -> Result<()> {
    put_document(handle, metadata_of::<T>()?, &to_document(value)?).await
}

/// Deletes the stored item keyed by the entity's own key fields.
///
/// Deleting an item that does not exist succeeds.
pub async fn delete_object<T: Entity>(handle: &ClientHandle, value: &T) -> Result<()> {
    delete_document(handle, metadata_of::<T>()?, &to_document(value)?).await
}

/// Copies fields of `value` onto the stored item.
///
/// With `key_filter`, only the listed fields are written. Key fields are
/// never written; see [`build_update`] for the full rules.
pub async fn update_object<T: Entity>(
    handle: &ClientHandle,
    value: &T,
    key_filter: Option<&[&str]>,
) -> Result<()> {
    update_document(handle, metadata_of::<T>()?, &to_document(value)?, key_filter).await
}

/// Atomically adds `delta` to `field` and returns the new value.
///
/// The value comes back as stored, so a fractional counter stays fractional.
pub async fn increment_object<T: Entity>(
    handle: &ClientHandle,
    value: &T,
    field: &str,
    delta: i64,
) -> Result<Option<Number>> {
    increment_document(handle, metadata_of::<T>()?, &to_document(value)?, field, delta).await
}

pub async fn put_document(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    document: &Document,
) -> Result<()> {
    let executor = handle.executor()?;
    let item = to_document(document)?;
    primary_key(metadata, &item)?;

    tracing::debug!(table = %metadata.table_name, "Putting item");
    executor
        .put_item(&PutItemRequest {
            table_name: metadata.table_name.clone(),
            item,
        })
        .await?;
    Ok(())
}

pub async fn delete_document(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    document: &Document,
) -> Result<()> {
    let executor = handle.executor()?;
    let key = primary_key(metadata, document)?;

    tracing::debug!(table = %metadata.table_name, "Deleting item");
    executor
        .delete_item(&DeleteItemRequest {
            table_name: metadata.table_name.clone(),
            key,
        })
        .await?;
    Ok(())
}

pub async fn update_document(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    document: &Document,
    key_filter: Option<&[&str]>,
) -> Result<()> {
    let executor = handle.executor()?;
    let request = build_update(metadata, &to_document(document)?, key_filter)?;

    tracing::debug!(
        table = %request.table_name,
        fields = request.actions.len(),
        "Updating item"
    );
    executor.update_item(&request).await?;
    Ok(())
}

pub async fn increment_document(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    document: &Document,
    field: &str,
    delta: i64,
) -> Result<Option<Number>> {
    let executor = handle.executor()?;
    let request = build_increment(metadata, document, field, delta)?;

    tracing::debug!(table = %request.table_name, field, delta, "Incrementing field");
    let output = executor.update_item(&request).await?;
    Ok(output
        .attributes
        .and_then(|mut attributes| match attributes.remove(field) {
            Some(Value::Number(number)) => Some(number),
            _ => None,
        }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use dynamap_core::Error;

    use super::*;
    use crate::read::{get_document, get_item};
    use crate::test_support::{event, handle, UserEvent};

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let handle = handle().await;
        let mut value = event("u1", "t1");
        value.status = Some("open".to_string());
        value.x = 42;

        put_object(&handle, &value).await.unwrap();
        let record = get_item::<UserEvent>(&handle, "u1", Some("t1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.into_inner(), value);
    }

    #[tokio::test]
    async fn test_put_document_strips_metadata() {
        let handle = handle().await;
        let doc = document(json!({
            "userId": "u1",
            "ts": "t1",
            "_meta": { "tableName": "user_events" },
            "nested": { "_meta": {}, "keep": true }
        }));

        put_document(&handle, UserEvent::metadata(), &doc)
            .await
            .unwrap();
        let stored = get_document(&handle, UserEvent::metadata(), "u1", Some("t1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            Value::Object(stored),
            json!({ "userId": "u1", "ts": "t1", "nested": { "keep": true } })
        );
    }

    #[tokio::test]
    async fn test_put_with_numeric_key_fails() {
        let handle = handle().await;
        let doc = document(json!({ "userId": 7, "ts": "t1" }));

        let result = put_document(&handle, UserEvent::metadata(), &doc).await;

        assert!(matches!(result, Err(Error::InvalidKey { .. })));
    }

    #[tokio::test]
    async fn test_update_changes_only_filtered_field() {
        let handle = handle().await;
        let mut value = event("u1", "t1");
        put_object(&handle, &value).await.unwrap();

        value.x = 2;
        value.y = 5;
        update_object(&handle, &value, Some(&["x"])).await.unwrap();

        let stored = get_item::<UserEvent>(&handle, "u1", Some("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.x, 2);
        assert_eq!(stored.y, 1);
    }

    #[tokio::test]
    async fn test_update_with_only_key_fields_fails() {
        let handle = handle().await;
        let value = event("u1", "t1");

        let result = update_object(&handle, &value, Some(&["userId", "ts"])).await;

        assert_eq!(
            result,
            Err(Error::NoFieldsToUpdate {
                table: "user_events".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_concurrent_increments_accumulate() {
        let handle = handle().await;
        let value = event("u1", "t1");
        put_object(&handle, &value).await.unwrap();

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let handle = handle.clone();
                let value = value.clone();
                tokio::spawn(async move { increment_object(&handle, &value, "x", 3).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = get_item::<UserEvent>(&handle, "u1", Some("t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.x, 7);
    }

    #[tokio::test]
    async fn test_increment_of_undeclared_field() {
        let handle = handle().await;
        let value = event("u1", "t1");

        assert_eq!(
            increment_object(&handle, &value, "views", 5).await,
            Ok(Some(Number::from(5)))
        );
        assert_eq!(
            increment_object(&handle, &value, "views", -2).await,
            Ok(Some(Number::from(3)))
        );
    }

    #[tokio::test]
    async fn test_increment_of_fractional_counter() {
        let handle = handle().await;
        let doc = document(json!({ "userId": "u1", "ts": "t1", "score": 1.5 }));
        put_document(&handle, UserEvent::metadata(), &doc)
            .await
            .unwrap();

        let value = increment_document(&handle, UserEvent::metadata(), &doc, "score", 2)
            .await
            .unwrap();

        assert_eq!(value.and_then(|number| number.as_f64()), Some(3.5));
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() {
        let handle = handle().await;
        let value = event("u1", "t1");
        put_object(&handle, &value).await.unwrap();

        delete_object(&handle, &value).await.unwrap();
        delete_object(&handle, &value).await.unwrap();

        let stored = get_item::<UserEvent>(&handle, "u1", Some("t1"))
            .await
            .unwrap();
        assert!(stored.is_none());
    }
}
