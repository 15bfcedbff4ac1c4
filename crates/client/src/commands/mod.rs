//! Command execution (Imperative Shell).
//!
//! Every command resolves its entity in the [`MetadataRegistry`] and runs
//! against the executor installed in the [`ClientHandle`], so tests can drive
//! the whole CLI with an in-memory store.

mod items;
mod tables;

use std::path::Path;

use dynamap::{ClientHandle, MetadataRegistry};

use crate::cli::Commands;
use crate::error::{ClientError, Result};
use crate::output::Report;

/// Reads and validates a schema file.
pub fn load_registry(path: &Path) -> Result<MetadataRegistry> {
    let json = std::fs::read_to_string(path).map_err(|source| ClientError::SchemaFile {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = MetadataRegistry::from_json(&json)?;
    tracing::debug!(path = %path.display(), entities = registry.len(), "Loaded schema");
    Ok(registry)
}

/// Runs one command.
pub async fn execute(
    command: Commands,
    handle: &ClientHandle,
    registry: &MetadataRegistry,
) -> Result<Report> {
    match command {
        Commands::Tables(tables_cmd) => tables::execute(tables_cmd.action, handle, registry).await,
        Commands::Items(items_cmd) => items::execute(items_cmd.action, handle, registry).await,
    }
}
