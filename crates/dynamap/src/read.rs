//! Read path: point lookups and paginated range queries.

use dynamap_core::document::{from_document, key_from_values};
use dynamap_core::query::{build_query, page_from_output};
use dynamap_core::request::GetItemRequest;
use dynamap_core::{
    metadata_of, Document, Entity, EntityMetadata, Page, QueryArgs, Record, Result,
};

use crate::handle::ClientHandle;

/// Fetches one entity by primary key.
///
/// `sort_key` is only used when `T` declares a sort key. A missing item is
/// `Ok(None)`.
pub async fn get_item<T: Entity>(
    handle: &ClientHandle,
    partition_key: &str,
    sort_key: Option<&str>,
) -> Result<Option<Record<'static, T>>> {
    let metadata = metadata_of::<T>()?;
    get_document(handle, metadata, partition_key, sort_key)
        .await?
        .map(|document| from_document(document).map(|value| Record::new(metadata, value)))
        .transpose()
}

/// Reads one page of entities sharing a partition key on the table or an index.
pub async fn get_items<T: Entity>(
    handle: &ClientHandle,
    index_name: Option<&str>,
    args: &QueryArgs,
) -> Result<Page<Record<'static, T>>> {
    let metadata = metadata_of::<T>()?;
    query_documents(handle, metadata, index_name, args)
        .await?
        .try_map(|document| from_document(document).map(|value| Record::new(metadata, value)))
}

/// Reads every page of a range query, in `args.sorted` order.
pub async fn get_all_items<T: Entity>(
    handle: &ClientHandle,
    index_name: Option<&str>,
    args: &QueryArgs,
) -> Result<Vec<Record<'static, T>>> {
    let metadata = metadata_of::<T>()?;
    query_all_documents(handle, metadata, index_name, args)
        .await?
        .into_iter()
        .map(|document| from_document(document).map(|value| Record::new(metadata, value)))
        .collect()
}

/// Fetches one document by primary key.
pub async fn get_document(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    partition_key: &str,
    sort_key: Option<&str>,
) -> Result<Option<Document>> {
    let executor = handle.executor()?;
    let request = GetItemRequest {
        table_name: metadata.table_name.clone(),
        key: key_from_values(metadata, partition_key, sort_key),
    };

    tracing::debug!(table = %request.table_name, "Getting item");
    Ok(executor.get_item(&request).await?.item)
}

/// Reads one page of documents.
pub async fn query_documents(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    index_name: Option<&str>,
    args: &QueryArgs,
) -> Result<Page<Document>> {
    let executor = handle.executor()?;
    let request = build_query(metadata, index_name, args)?;

    tracing::debug!(
        table = %request.table_name,
        index = ?request.index_name,
        limit = ?request.limit,
        "Querying items"
    );
    let output = executor.query(&request).await?;
    page_from_output(output, args.next_page.as_deref())
}

/// Reads every page of documents, one request at a time.
///
/// Stops when a page has no cursor, or when an empty page hands back the
/// cursor it was given.
pub async fn query_all_documents(
    handle: &ClientHandle,
    metadata: &EntityMetadata,
    index_name: Option<&str>,
    args: &QueryArgs,
) -> Result<Vec<Document>> {
    let mut args = args.clone();
    let mut items = Vec::new();

    loop {
        let page = query_documents(handle, metadata, index_name, &args).await?;
        let stalled = page.items.is_empty() && page.next_page == args.next_page;
        items.extend(page.items);

        match page.next_page {
            Some(cursor) if !stalled => args.next_page = Some(cursor),
            _ => break,
        }
    }

    Ok(items)
}
