//! Table provisioning from entity metadata.

use dynamap_core::request::{DescribeTableRequest, TableDescription};
use dynamap_core::{metadata_of, Entity, EntityMetadata, Error, Result, TableSchema};

use crate::handle::ClientHandle;

/// What [`ensure_table`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The table already existed.
    Existing,
    /// The table was missing and has been created.
    Created,
}

/// Creates the table declared by `T`. Errors propagate unchanged.
pub async fn create_table<T: Entity>(handle: &ClientHandle) -> Result<()> {
    create_table_for(handle, metadata_of::<T>()?).await
}

/// Creates the table declared by `metadata`.
pub async fn create_table_for(handle: &ClientHandle, metadata: &EntityMetadata) -> Result<()> {
    metadata.validate()?;
    let executor = handle.executor()?;
    let schema = TableSchema::from_metadata(metadata);

    executor.create_table(&schema).await?;
    tracing::info!(
        table = %schema.table_name,
        indexes = schema.secondary_indexes.len(),
        "Created table"
    );
    Ok(())
}

/// Creates the table declared by `T` unless it already exists.
pub async fn ensure_table<T: Entity>(handle: &ClientHandle) -> Result<EnsureOutcome> {
    ensure_table_for(handle, metadata_of::<T>()?).await
}

/// Creates the table declared by `metadata` unless it already exists.
///
/// Any describe failure is treated as "missing" and followed by one create
/// request. A describe that answers with a different table name fails with
/// [`Error::SchemaMismatch`].
pub async fn ensure_table_for(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
) -> Result<EnsureOutcome> {
    metadata.validate()?;
    let executor = handle.executor()?;
    let request = DescribeTableRequest {
        table_name: metadata.table_name.clone(),
    };

    match executor.describe_table(&request).await {
        Ok(TableDescription {
            table_name: Some(found),
            ..
        }) if found == metadata.table_name => {
            tracing::debug!(table = %found, "Table already exists");
            Ok(EnsureOutcome::Existing)
        }
        Ok(TableDescription {
            table_name: Some(found),
            ..
        }) => Err(Error::SchemaMismatch {
            expected: metadata.table_name.clone(),
            found,
        }),
        Ok(TableDescription {
            table_name: None, ..
        }) => {
            tracing::warn!(table = %metadata.table_name, "Describe returned no table, creating it");
            create_table_for(handle, metadata).await?;
            Ok(EnsureOutcome::Created)
        }
        Err(err) => {
            tracing::warn!(table = %metadata.table_name, error = %err, "Describe failed, creating table");
            create_table_for(handle, metadata).await?;
            Ok(EnsureOutcome::Created)
        }
    }
}
