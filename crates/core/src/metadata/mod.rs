mod entity;
mod registry;
mod types;

pub use entity::{metadata_of, Entity, Record};
pub use registry::MetadataRegistry;
pub use types::{EntityMetadata, IndexDescriptor, METADATA_KEY};
