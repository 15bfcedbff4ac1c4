//! dynamap_core - the functional core of the dynamap object mapper.
//!
//! Everything in this crate is pure: entity metadata, metadata stripping,
//! table schema derivation, query and update expression construction, the
//! cursor codec, and the request/response types consumed by a
//! [`StoreExecutor`]. Nothing here performs I/O.

pub mod document;
pub mod error;
pub mod executor;
pub mod expression;
pub mod metadata;
pub mod query;
pub mod request;
pub mod schema;
pub mod strip;
pub mod update;

pub use document::Document;
pub use error::{Error, Result, StoreError, StoreResult};
pub use executor::StoreExecutor;
pub use metadata::{
    metadata_of, Entity, EntityMetadata, IndexDescriptor, MetadataRegistry, Record, METADATA_KEY,
};
pub use query::{Page, QueryArgs, QueryShape, SortCondition, SortOrder, DEFAULT_PAGE_LIMIT};
pub use schema::TableSchema;
pub use strip::strip_metadata;
