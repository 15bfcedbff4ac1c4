//! Name-keyed metadata lookup for callers that only know entities at runtime.

use std::collections::BTreeMap;

use super::{Entity, EntityMetadata};
use crate::error::{Error, Result};

/// Registry of entity metadata by entity name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRegistry {
    entries: BTreeMap<String, EntityMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a schema file of the form `{ "<entity>": { "tableName": .., "partitionKey": .. } }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, EntityMetadata> = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid schema file: {e}")))?;

        let mut registry = Self::new();
        for (name, metadata) in entries {
            registry.insert(name, metadata)?;
        }
        Ok(registry)
    }

    /// Registers the metadata declared by `T` under `name`.
    pub fn register<T: Entity>(&mut self, name: impl Into<String>) -> Result<()> {
        self.insert(name, T::metadata().clone())
    }

    /// Registers metadata under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, metadata: EntityMetadata) -> Result<()> {
        metadata.validate()?;
        self.entries.insert(name.into(), metadata);
        Ok(())
    }

    /// Looks up the metadata registered under `name`.
    pub fn get(&self, name: &str) -> Result<&EntityMetadata> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::Configuration(format!("entity '{name}' has no metadata")))
    }

    /// Iterates over registered entity names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
