use async_trait::async_trait;

use crate::error::StoreResult;
use crate::request::{
    DeleteItemRequest, DescribeTableRequest, GetItemOutput, GetItemRequest, PutItemRequest,
    QueryOutput, QueryRequest, TableDescription, UpdateItemOutput, UpdateItemRequest,
};
use crate::schema::TableSchema;

/// The single capability dynamap needs from a backing store.
///
/// Implementations must be safe to share across tasks; every mapper operation
/// issues exactly one call per page or item.
#[async_trait]
pub trait StoreExecutor: Send + Sync {
    /// Describes an existing table.
    async fn describe_table(&self, request: &DescribeTableRequest)
        -> StoreResult<TableDescription>;

    /// Creates a table. Fails with `ResourceInUse` if it already exists.
    async fn create_table(&self, schema: &TableSchema) -> StoreResult<()>;

    /// Fetches one item by primary key.
    async fn get_item(&self, request: &GetItemRequest) -> StoreResult<GetItemOutput>;

    /// Reads one page of a key-condition query.
    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput>;

    /// Writes an item, replacing any item with the same key.
    async fn put_item(&self, request: &PutItemRequest) -> StoreResult<()>;

    /// Deletes an item by key. Deleting a missing item succeeds.
    async fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()>;

    /// Applies an update, creating the item when it does not exist.
    async fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<UpdateItemOutput>;
}
