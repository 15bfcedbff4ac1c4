//! Table schema derivation (pure data, no I/O).

mod planning;
mod types;

pub use planning::format_schema;
pub use types::{
    key_names, AttributeDefinition, AttributeType, BillingMode, KeySchemaElement, KeyType,
    ProjectionType, SecondaryIndex, TableSchema,
};
