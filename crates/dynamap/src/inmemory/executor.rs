//! In-memory executor implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Number, Value};
use tokio::sync::RwLock;

use dynamap_core::request::{
    DeleteItemRequest, DescribeTableRequest, GetItemOutput, GetItemRequest, PutItemRequest,
    QueryOutput, QueryRequest, ReturnValues, TableDescription, UpdateItemOutput,
    UpdateItemRequest,
};
use dynamap_core::schema::key_names;
use dynamap_core::update::UpdateAction;
use dynamap_core::{Document, StoreError, StoreExecutor, StoreResult, TableSchema};

/// Primary key values of a stored item: partition value and optional sort value.
type ItemKey = (String, Option<String>);

#[derive(Debug, Clone)]
struct Table {
    schema: TableSchema,
    items: BTreeMap<ItemKey, Document>,
}

impl Table {
    fn primary_key_names(&self) -> (&str, Option<&str>) {
        let (partition_key, sort_key) = key_names(&self.schema.key_schema);
        (partition_key.unwrap_or_default(), sort_key)
    }

    /// Reads the primary key of a full item.
    fn item_key(&self, item: &Document) -> StoreResult<ItemKey> {
        let (partition_key, sort_key) = self.primary_key_names();
        let partition = string_attribute(item, partition_key)?;
        let sort = sort_key
            .map(|name| string_attribute(item, name))
            .transpose()?;
        Ok((partition, sort))
    }

    /// Reads a key that must hold exactly the primary key attributes.
    fn exact_key(&self, key: &Document) -> StoreResult<ItemKey> {
        let (_, sort_key) = self.primary_key_names();
        let expected = 1 + usize::from(sort_key.is_some());
        if key.len() != expected {
            return Err(StoreError::Validation(
                "The provided key element does not match the schema".to_string(),
            ));
        }
        self.item_key(key)
    }

    fn is_key_attribute(&self, name: &str) -> bool {
        let (partition_key, sort_key) = self.primary_key_names();
        name == partition_key || sort_key == Some(name)
    }
}

fn string_attribute(document: &Document, name: &str) -> StoreResult<String> {
    match document.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(StoreError::Validation(format!(
            "Key attribute '{}' must be a string",
            name
        ))),
        None => Err(StoreError::Validation(format!(
            "Missing key attribute '{}'",
            name
        ))),
    }
}

/// In-memory store for tests and local development.
///
/// Tables live in a `HashMap` wrapped in `Arc<RwLock<_>>`; clones share the
/// same data. Writes take the lock exclusively, so increments are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutor {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryExecutor {
    /// Creates an executor with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items stored in `table_name`.
    pub async fn item_count(&self, table_name: &str) -> Option<usize> {
        let tables = self.tables.read().await;
        tables.get(table_name).map(|table| table.items.len())
    }
}

fn table_not_found(table_name: &str) -> StoreError {
    StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
}

#[async_trait]
impl StoreExecutor for InMemoryExecutor {
    async fn describe_table(
        &self,
        request: &DescribeTableRequest,
    ) -> StoreResult<TableDescription> {
        let tables = self.tables.read().await;
        let table = tables
            .get(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        Ok(TableDescription {
            table_name: Some(table.schema.table_name.clone()),
            index_names: table
                .schema
                .secondary_indexes
                .iter()
                .map(|index| index.name.clone())
                .collect(),
        })
    }

    async fn create_table(&self, schema: &TableSchema) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&schema.table_name) {
            return Err(StoreError::ResourceInUse(format!(
                "Table '{}' already exists",
                schema.table_name
            )));
        }
        tables.insert(
            schema.table_name.clone(),
            Table {
                schema: schema.clone(),
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn get_item(&self, request: &GetItemRequest) -> StoreResult<GetItemOutput> {
        let tables = self.tables.read().await;
        let table = tables
            .get(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let key = table.exact_key(&request.key)?;
        Ok(GetItemOutput {
            item: table.items.get(&key).cloned(),
        })
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput> {
        let tables = self.tables.read().await;
        let table = tables
            .get(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let key_schema = table
            .schema
            .key_schema_for(request.index_name.as_deref())
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "Table '{}' has no index named '{}'",
                    request.table_name,
                    request.index_name.as_deref().unwrap_or_default()
                ))
            })?;
        let (partition_key, sort_key) = key_names(key_schema);

        let condition = &request.key_condition;
        if Some(condition.partition_key.as_str()) != partition_key {
            return Err(StoreError::Validation(format!(
                "Query condition missed key schema element: {}",
                partition_key.unwrap_or_default()
            )));
        }
        if let Some(sort) = &condition.sort {
            if Some(sort.attribute.as_str()) != sort_key {
                return Err(StoreError::Validation(format!(
                    "'{}' is not a sort key of the queried key schema",
                    sort.attribute
                )));
            }
        }

        let (table_partition_key, table_sort_key) = table.primary_key_names();
        let position = |document: &Document| -> Vec<String> {
            [sort_key, Some(table_partition_key), table_sort_key]
                .into_iter()
                .flatten()
                .map(|name| {
                    document
                        .get(name)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        };

        // Items missing an index key attribute are not part of the index.
        let mut matches: Vec<(Vec<String>, &Document)> = table
            .items
            .values()
            .filter(|item| {
                sort_key.is_none_or(|name| item.get(name).is_some_and(Value::is_string))
            })
            .filter(|item| condition.matches(item))
            .map(|item| (position(item), item))
            .collect();

        matches.sort_by(|(a, _), (b, _)| a.cmp(b));
        if !request.scan_index_forward {
            matches.reverse();
        }

        if let Some(start) = &request.exclusive_start_key {
            let start = position(start);
            matches.retain(|(item_position, _)| {
                if request.scan_index_forward {
                    *item_position > start
                } else {
                    *item_position < start
                }
            });
        }

        let limit = request
            .limit
            .map(|limit| limit as usize)
            .unwrap_or(usize::MAX);
        let has_more = matches.len() > limit;
        let page: Vec<Document> = matches
            .into_iter()
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect();

        let last_evaluated_key = match page.last() {
            Some(last) if has_more => {
                let names = [
                    partition_key,
                    sort_key,
                    Some(table_partition_key),
                    table_sort_key,
                ];
                let key: Document = names
                    .into_iter()
                    .flatten()
                    .filter_map(|name| {
                        last.get(name)
                            .map(|value| (name.to_string(), value.clone()))
                    })
                    .collect();
                Some(key)
            }
            _ => None,
        };

        Ok(QueryOutput {
            items: page,
            last_evaluated_key,
        })
    }

    async fn put_item(&self, request: &PutItemRequest) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let key = table.item_key(&request.item)?;
        table.items.insert(key, request.item.clone());
        Ok(())
    }

    async fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let key = table.exact_key(&request.key)?;
        table.items.remove(&key);
        Ok(())
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<UpdateItemOutput> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let key = table.exact_key(&request.key)?;
        if let Some(action) = request
            .actions
            .iter()
            .find(|action| table.is_key_attribute(action.field()))
        {
            return Err(StoreError::Validation(format!(
                "Cannot update attribute '{}': it is part of the key",
                action.field()
            )));
        }

        let mut item = table
            .items
            .get(&key)
            .cloned()
            .unwrap_or_else(|| request.key.clone());
        let mut updated = Document::new();

        for action in &request.actions {
            let value = match action {
                UpdateAction::Set { value, .. } => value.clone(),
                UpdateAction::Add { field, delta } => add_number(item.get(field), field, *delta)?,
            };
            item.insert(action.field().to_string(), value.clone());
            updated.insert(action.field().to_string(), value);
        }

        table.items.insert(key, item);

        Ok(UpdateItemOutput {
            attributes: match request.return_values {
                ReturnValues::UpdatedNew => Some(updated),
                ReturnValues::None => None,
            },
        })
    }
}

/// `ADD` on a number attribute; a missing or null attribute counts as zero.
fn add_number(current: Option<&Value>, field: &str, delta: i64) -> StoreResult<Value> {
    let overflow = || StoreError::Validation(format!("Number overflow updating '{}'", field));
    match current {
        None | Some(Value::Null) => Ok(Value::from(delta)),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(current) => current
                .checked_add(delta)
                .map(Value::from)
                .ok_or_else(overflow),
            None => number
                .as_f64()
                .and_then(|current| Number::from_f64(current + delta as f64))
                .map(Value::Number)
                .ok_or_else(overflow),
        },
        Some(_) => Err(StoreError::Validation(format!(
            "An operand in the update expression has an incorrect data type: '{}'",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use dynamap_core::query::{build_query, QueryArgs, SortCondition, SortOrder};
    use dynamap_core::update::{build_increment, build_update};
    use dynamap_core::{EntityMetadata, IndexDescriptor};
    use serde_json::json;

    use super::*;

    fn metadata() -> EntityMetadata {
        EntityMetadata::new("user_events", "userId")
            .with_sort_key("ts")
            .with_index("byStatus", IndexDescriptor::new("status").with_sort_key("ts"))
    }

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn seeded() -> InMemoryExecutor {
        let executor = InMemoryExecutor::new();
        executor
            .create_table(&TableSchema::from_metadata(&metadata()))
            .await
            .unwrap();

        for (ts, status) in [("t3", "open"), ("t1", "open"), ("t2", "closed"), ("t4", "open")] {
            executor
                .put_item(&PutItemRequest {
                    table_name: "user_events".to_string(),
                    item: document(json!({ "userId": "u1", "ts": ts, "status": status })),
                })
                .await
                .unwrap();
        }
        executor
            .put_item(&PutItemRequest {
                table_name: "user_events".to_string(),
                item: document(json!({ "userId": "u1", "ts": "t5" })),
            })
            .await
            .unwrap();
        executor
    }

    fn timestamps(output: &QueryOutput) -> Vec<&str> {
        output
            .items
            .iter()
            .filter_map(|item| item.get("ts").and_then(Value::as_str))
            .collect()
    }

    #[tokio::test]
    async fn test_create_table_twice_fails() {
        let executor = InMemoryExecutor::new();
        let schema = TableSchema::from_metadata(&metadata());

        executor.create_table(&schema).await.unwrap();
        let result = executor.create_table(&schema).await;

        assert!(matches!(result, Err(StoreError::ResourceInUse(_))));
    }

    #[tokio::test]
    async fn test_describe_missing_table() {
        let executor = InMemoryExecutor::new();
        let result = executor
            .describe_table(&DescribeTableRequest {
                table_name: "nope".to_string(),
            })
            .await;

        assert!(matches!(result, Err(StoreError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_query_orders_by_sort_key() {
        let executor = seeded().await;
        let request = build_query(&metadata(), None, &QueryArgs::new("u1")).unwrap();

        let output = executor.query(&request).await.unwrap();

        assert_eq!(timestamps(&output), vec!["t1", "t2", "t3", "t4", "t5"]);
        assert!(output.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_query_descending_with_condition() {
        let executor = seeded().await;
        let args = QueryArgs::new("u1")
            .sort_condition(SortCondition::LessThan("t4".to_string()))
            .sorted(SortOrder::Desc);
        let request = build_query(&metadata(), None, &args).unwrap();

        let output = executor.query(&request).await.unwrap();

        assert_eq!(timestamps(&output), vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_query_index_skips_items_without_index_key() {
        let executor = seeded().await;
        let request = build_query(&metadata(), Some("byStatus"), &QueryArgs::new("open")).unwrap();

        let output = executor.query(&request).await.unwrap();

        assert_eq!(timestamps(&output), vec!["t1", "t3", "t4"]);
    }

    #[tokio::test]
    async fn test_query_pages_with_exclusive_start_key() {
        let executor = seeded().await;
        let mut request = build_query(&metadata(), None, &QueryArgs::new("u1").limit(3)).unwrap();

        let first = executor.query(&request).await.unwrap();
        assert_eq!(timestamps(&first), vec!["t1", "t2", "t3"]);
        assert_eq!(
            first.last_evaluated_key,
            Some(document(json!({ "userId": "u1", "ts": "t3" })))
        );

        request.exclusive_start_key = first.last_evaluated_key;
        let second = executor.query(&request).await.unwrap();
        assert_eq!(timestamps(&second), vec!["t4", "t5"]);
        assert!(second.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_get_with_wrong_key_is_validation_error() {
        let executor = seeded().await;
        let result = executor
            .get_item(&GetItemRequest {
                table_name: "user_events".to_string(),
                key: document(json!({ "userId": "u1" })),
            })
            .await;

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_creates_missing_item() {
        let executor = seeded().await;
        let doc = document(json!({ "userId": "u2", "ts": "t1", "status": "new" }));

        executor
            .update_item(&build_update(&metadata(), &doc, None).unwrap())
            .await
            .unwrap();

        let output = executor
            .get_item(&GetItemRequest {
                table_name: "user_events".to_string(),
                key: document(json!({ "userId": "u2", "ts": "t1" })),
            })
            .await
            .unwrap();
        assert_eq!(output.item, Some(doc));
    }

    #[tokio::test]
    async fn test_increment_returns_new_value() {
        let executor = seeded().await;
        let doc = document(json!({ "userId": "u1", "ts": "t1" }));
        let request = build_increment(&metadata(), &doc, "views", 2).unwrap();

        executor.update_item(&request).await.unwrap();
        let output = executor.update_item(&request).await.unwrap();

        assert_eq!(output.attributes, Some(document(json!({ "views": 4 }))));
    }

    #[tokio::test]
    async fn test_increment_of_string_fails() {
        let executor = seeded().await;
        let doc = document(json!({ "userId": "u1", "ts": "t1" }));
        let request = build_increment(&metadata(), &doc, "status", 1).unwrap();

        let result = executor.update_item(&request).await;

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_item_succeeds() {
        let executor = seeded().await;
        executor
            .delete_item(&DeleteItemRequest {
                table_name: "user_events".to_string(),
                key: document(json!({ "userId": "nobody", "ts": "t0" })),
            })
            .await
            .unwrap();

        assert_eq!(executor.item_count("user_events").await, Some(5));
    }
}
