use serde_json::Value;

use dynamap::{
    delete_document, get_document, increment_document, put_document, query_all_documents,
    query_documents, update_document, ClientHandle, Document, MetadataRegistry, SortCondition,
};
use dynamap_core::document::key_from_values;

use crate::cli::items::{ItemsAction, QueryArgs};
use crate::error::{ClientError, Result};
use crate::output::Report;

pub async fn execute(
    action: ItemsAction,
    handle: &ClientHandle,
    registry: &MetadataRegistry,
) -> Result<Report> {
    match action {
        ItemsAction::Get(key) => {
            let metadata = registry.get(&key.entity)?;
            let item = get_document(
                handle,
                metadata,
                &key.partition_key,
                key.sort_key.as_deref(),
            )
            .await?;
            Ok(Report::Item(item))
        }
        ItemsAction::Query(query) => {
            let metadata = registry.get(&query.entity)?;
            let args = query_args(&query)?;
            let index_name = query.index.as_deref();
            if query.all {
                let items = query_all_documents(handle, metadata, index_name, &args).await?;
                Ok(Report::Items(items))
            } else {
                let page = query_documents(handle, metadata, index_name, &args).await?;
                Ok(Report::Page(page))
            }
        }
        ItemsAction::Put { entity, item } => {
            let metadata = registry.get(&entity)?;
            let document = parse_object(&item)?;
            put_document(handle, metadata, &document).await?;
            Ok(Report::Message(format!("Saved item to {}", metadata.table_name)))
        }
        ItemsAction::Delete(key) => {
            let metadata = registry.get(&key.entity)?;
            let document = key_from_values(metadata, &key.partition_key, key.sort_key.as_deref());
            delete_document(handle, metadata, &document).await?;
            Ok(Report::Message(format!(
                "Deleted item from {}",
                metadata.table_name
            )))
        }
        ItemsAction::Update {
            entity,
            item,
            fields,
        } => {
            let metadata = registry.get(&entity)?;
            let document = parse_object(&item)?;
            let filter: Vec<&str> = fields.iter().map(String::as_str).collect();
            let key_filter = (!filter.is_empty()).then_some(filter.as_slice());
            update_document(handle, metadata, &document, key_filter).await?;
            Ok(Report::Message(format!(
                "Updated item in {}",
                metadata.table_name
            )))
        }
        ItemsAction::Increment { key, field, by } => {
            let metadata = registry.get(&key.entity)?;
            let document = key_from_values(metadata, &key.partition_key, key.sort_key.as_deref());
            let value = increment_document(handle, metadata, &document, &field, by).await?;
            Ok(Report::Counter { field, value })
        }
    }
}

fn query_args(query: &QueryArgs) -> Result<dynamap::QueryArgs> {
    let mut args = dynamap::QueryArgs::new(query.partition_key.clone())
        .sorted(query.order.into())
        .next_page(query.next_page.clone());

    if let Some(condition) = sort_condition(query)? {
        args = args.sort_condition(condition);
    } else if let Some(hint) = &query.sort_key {
        args = args.sort_key_hint(hint);
    }
    if let Some(limit) = query.limit {
        args = args.limit(limit);
    }
    Ok(args)
}

fn sort_condition(query: &QueryArgs) -> Result<Option<SortCondition>> {
    if let Some(bound) = &query.gt {
        return Ok(Some(SortCondition::GreaterThan(bound.clone())));
    }
    if let Some(bound) = &query.lt {
        return Ok(Some(SortCondition::LessThan(bound.clone())));
    }
    if let Some(prefix) = &query.begins_with {
        return Ok(Some(SortCondition::BeginsWith(prefix.clone())));
    }
    match query.between.as_deref() {
        Some([low, high]) => Ok(Some(SortCondition::Between(low.clone(), high.clone()))),
        Some(_) => Err(ClientError::InvalidInput(
            "--between takes exactly two values".to_string(),
        )),
        None => Ok(None),
    }
}

fn parse_object(json: &str) -> Result<Document> {
    match serde_json::from_str(json)? {
        Value::Object(document) => Ok(document),
        other => Err(ClientError::InvalidInput(format!(
            "item must be a JSON object, got {other}"
        ))),
    }
}
