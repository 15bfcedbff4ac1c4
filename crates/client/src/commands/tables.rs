use dynamap::{create_table_for, ensure_table_for, ClientHandle, EnsureOutcome, MetadataRegistry};
use dynamap_core::schema::format_schema;
use dynamap_core::{EntityMetadata, TableSchema};

use crate::cli::tables::TablesAction;
use crate::error::Result;
use crate::output::Report;

pub async fn execute(
    action: TablesAction,
    handle: &ClientHandle,
    registry: &MetadataRegistry,
) -> Result<Report> {
    match action {
        TablesAction::List => Ok(Report::Lines(
            registry
                .names()
                .map(|name| {
                    let metadata = registry.get(name)?;
                    Ok(format!("{} -> {}", name, metadata.table_name))
                })
                .collect::<Result<Vec<_>>>()?,
        )),
        TablesAction::Plan { entity } => Ok(Report::Lines(plan(&selected(
            registry,
            entity.as_deref(),
        )?))),
        TablesAction::Ensure {
            entity,
            dry_run: true,
        } => Ok(Report::Lines(plan(&selected(registry, entity.as_deref())?))),
        TablesAction::Ensure {
            entity,
            dry_run: false,
        } => {
            let mut lines = Vec::new();
            for metadata in selected(registry, entity.as_deref())? {
                let outcome = ensure_table_for(handle, metadata).await?;
                lines.push(match outcome {
                    EnsureOutcome::Existing => format!("= {} (exists)", metadata.table_name),
                    EnsureOutcome::Created => format!("+ {} (created)", metadata.table_name),
                });
            }
            Ok(Report::Lines(lines))
        }
        TablesAction::Create { entity } => {
            let metadata = registry.get(&entity)?;
            create_table_for(handle, metadata).await?;
            Ok(Report::Message(format!(
                "Created table {}",
                metadata.table_name
            )))
        }
    }
}

/// The named entity, or every entity in the registry.
fn selected<'r>(
    registry: &'r MetadataRegistry,
    entity: Option<&str>,
) -> Result<Vec<&'r EntityMetadata>> {
    match entity {
        Some(name) => Ok(vec![registry.get(name)?]),
        None => Ok(registry
            .names()
            .map(|name| registry.get(name))
            .collect::<dynamap::Result<Vec<_>>>()?),
    }
}

fn plan(entities: &[&EntityMetadata]) -> Vec<String> {
    entities
        .iter()
        .flat_map(|metadata| format_schema(&TableSchema::from_metadata(metadata)))
        .collect()
}
