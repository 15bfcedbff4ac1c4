use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attribute name under which metadata travels on loosely typed payloads.
///
/// It is never persisted; [`strip_metadata`](crate::strip_metadata) removes it.
pub const METADATA_KEY: &str = "_meta";

/// Key layout of a global secondary index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub partition_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl IndexDescriptor {
    /// Creates an index keyed only by a partition key.
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    /// Sets the index sort key.
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }
}

/// Per-type description of the backing table and its key layout.
///
/// Shared read-only by every instance of the type. All key fields must hold
/// string values on the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub table_name: String,
    pub partition_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, IndexDescriptor>,
}

impl EntityMetadata {
    /// Creates metadata for a table keyed by a single partition key.
    pub fn new(table_name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: partition_key.into(),
            sort_key: None,
            indexes: BTreeMap::new(),
        }
    }

    /// Sets the primary sort key.
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    /// Declares a global secondary index.
    pub fn with_index(mut self, name: impl Into<String>, index: IndexDescriptor) -> Self {
        self.indexes.insert(name.into(), index);
        self
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Result<&IndexDescriptor> {
        self.index_entry(name).map(|(_, index)| index)
    }

    /// Looks up an index by name, returning the name as stored in the metadata.
    pub fn index_entry(&self, name: &str) -> Result<(&str, &IndexDescriptor)> {
        self.indexes
            .get_key_value(name)
            .map(|(name, index)| (name.as_str(), index))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "index '{}' is not declared on table '{}'",
                    name, self.table_name
                ))
            })
    }

    /// Returns true if `field` is part of the primary key.
    pub fn is_key_field(&self, field: &str) -> bool {
        field == self.partition_key || self.sort_key.as_deref() == Some(field)
    }

    /// Checks that the metadata was actually declared.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(Error::Configuration(
                "entity metadata has no table name".to_string(),
            ));
        }
        if self.partition_key.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "table '{}' has no partition key",
                self.table_name
            )));
        }
        if matches!(self.sort_key.as_deref(), Some(sk) if sk.trim().is_empty()) {
            return Err(Error::Configuration(format!(
                "table '{}' has an empty sort key",
                self.table_name
            )));
        }
        for (name, index) in &self.indexes {
            if name.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "table '{}' declares an index without a name",
                    self.table_name
                )));
            }
            if index.partition_key.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "index '{}' on table '{}' has no partition key",
                    name, self.table_name
                )));
            }
        }
        Ok(())
    }
}
