//! dynamap - typed entities on top of DynamoDB.
//!
//! Declare an [`EntityMetadata`] for each persisted type, pass a
//! [`ClientHandle`] around, and use the read and write functions:
//!
//! ```rust,ignore
//! let handle = ClientHandle::new();
//! handle.initialize(&Config::from_env()).await;
//!
//! ensure_table::<UserEvent>(&handle).await?;
//! put_object(&handle, &event).await?;
//! let page = get_items::<UserEvent>(&handle, None, &QueryArgs::new("u1").limit(10)).await?;
//! ```

pub mod config;
pub mod dynamodb;
pub mod handle;
pub mod inmemory;
pub mod middleware;
pub mod provision;
pub mod read;
pub mod write;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dynamodb::DynamoDbExecutor;
pub use handle::ClientHandle;
pub use inmemory::InMemoryExecutor;
pub use middleware::strip_metadata_layer;
pub use provision::{create_table, create_table_for, ensure_table, ensure_table_for, EnsureOutcome};
pub use read::{
    get_all_items, get_document, get_item, get_items, query_all_documents, query_documents,
};
pub use write::{
    delete_document, delete_object, increment_document, increment_object, put_document,
    put_object, update_document, update_object,
};

pub use dynamap_core::{
    metadata_of, strip_metadata, Document, Entity, EntityMetadata, Error, IndexDescriptor,
    MetadataRegistry, Page, QueryArgs, Record, Result, SortCondition, SortOrder,
};
