//! Range query construction and cursor pagination.

mod condition;
mod cursor;
mod shape;

pub use condition::{KeyCondition, SortCondition, SortKeyCondition, SortOrder};
pub use cursor::{decode_cursor, encode_cursor};
pub use shape::QueryShape;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::metadata::EntityMetadata;
use crate::request::{QueryOutput, QueryRequest};

/// Page size used when the caller does not set one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Arguments of a single-page range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub partition_key: String,
    pub sort_condition: Option<SortCondition>,
    pub sorted: SortOrder,
    pub next_page: Option<String>,
    pub limit: Option<u32>,
}

impl QueryArgs {
    /// Queries every item sharing `partition_key`, ascending, 50 per page.
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_condition: None,
            sorted: SortOrder::Asc,
            next_page: None,
            limit: None,
        }
    }

    pub fn sort_condition(mut self, condition: SortCondition) -> Self {
        self.sort_condition = Some(condition);
        self
    }

    /// Sets the sort condition from a directional hint, see [`SortCondition::from_hint`].
    pub fn sort_key_hint(mut self, hint: &str) -> Self {
        self.sort_condition = Some(SortCondition::from_hint(hint));
        self
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sorted = order;
        self
    }

    pub fn next_page(mut self, cursor: Option<String>) -> Self {
        self.next_page = cursor;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The effective page size.
    pub fn page_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` once the range is exhausted.
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    /// Converts every item, failing on the first error.
    pub fn try_map<U, F>(self, f: F) -> Result<Page<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>>>()?,
            next_page: self.next_page,
        })
    }
}

/// Builds the query request for `args` on the table or one of its indexes.
pub fn build_query(
    metadata: &EntityMetadata,
    index_name: Option<&str>,
    args: &QueryArgs,
) -> Result<QueryRequest> {
    let shape = QueryShape::resolve(metadata, index_name)?;
    if args.page_limit() == 0 {
        return Err(Error::Configuration(format!(
            "page limit for '{}' must be at least 1",
            metadata.table_name
        )));
    }

    let sort = match (&args.sort_condition, shape.sort_key()) {
        (None, _) => None,
        (Some(condition), Some(attribute)) => Some(SortKeyCondition {
            attribute: attribute.to_string(),
            condition: condition.clone(),
        }),
        (Some(_), None) => {
            return Err(Error::Configuration(format!(
                "sort condition given for '{}' but {} has no sort key",
                metadata.table_name,
                shape
                    .index_name()
                    .map(|name| format!("index '{name}'"))
                    .unwrap_or_else(|| "the table".to_string()),
            )))
        }
    };

    let exclusive_start_key = args.next_page.as_deref().map(decode_cursor).transpose()?;

    Ok(QueryRequest {
        table_name: metadata.table_name.clone(),
        index_name: shape.index_name().map(str::to_string),
        key_condition: KeyCondition {
            partition_key: shape.partition_key().to_string(),
            partition_value: args.partition_key.clone(),
            sort,
        },
        limit: Some(args.page_limit()),
        exclusive_start_key,
        scan_index_forward: args.sorted.is_forward(),
    })
}

/// Turns a query response into a page.
///
/// The next cursor is the serialized last evaluated key. An empty page also
/// returns the store's last evaluated key when there is one; the input cursor
/// is handed back unchanged only when the store returned none.
pub fn page_from_output(output: QueryOutput, input_cursor: Option<&str>) -> Result<Page<Document>> {
    let next_page = output
        .last_evaluated_key
        .as_ref()
        .map(encode_cursor)
        .transpose()?;

    if output.items.is_empty() {
        return Ok(Page {
            items: Vec::new(),
            next_page: next_page.or_else(|| input_cursor.map(str::to_string)),
        });
    }

    Ok(Page {
        items: output.items,
        next_page,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::metadata::IndexDescriptor;

    fn metadata() -> EntityMetadata {
        EntityMetadata::new("user_events", "userId")
            .with_sort_key("ts")
            .with_index("byStatus", IndexDescriptor::new("status"))
    }

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_build_query_defaults() {
        let request = build_query(&metadata(), None, &QueryArgs::new("u1")).unwrap();

        assert_eq!(request.table_name, "user_events");
        assert_eq!(request.index_name, None);
        assert_eq!(request.limit, Some(DEFAULT_PAGE_LIMIT));
        assert!(request.scan_index_forward);
        assert!(request.exclusive_start_key.is_none());

        let expression = request.key_condition_expression();
        assert_eq!(expression.expression, "#key = :key");
        assert_eq!(expression.names["#key"], "userId");
    }

    #[test]
    fn test_build_query_on_index_uses_index_keys() {
        let args = QueryArgs::new("active").sorted(SortOrder::Desc).limit(10);
        let request = build_query(&metadata(), Some("byStatus"), &args).unwrap();

        assert_eq!(request.index_name.as_deref(), Some("byStatus"));
        assert_eq!(request.key_condition.partition_key, "status");
        assert_eq!(request.key_condition.partition_value, "active");
        assert_eq!(request.limit, Some(10));
        assert!(!request.scan_index_forward);
    }

    #[test]
    fn test_build_query_with_sort_hint() {
        let args = QueryArgs::new("u1").sort_key_hint("2024-06-01");
        let request = build_query(&metadata(), None, &args).unwrap();

        assert_eq!(
            request.key_condition.sort,
            Some(SortKeyCondition {
                attribute: "ts".to_string(),
                condition: SortCondition::LessThan("2024-06-01".to_string()),
            })
        );
        assert_eq!(
            request.key_condition_expression().expression,
            "#key = :key AND #sort < :sort"
        );
    }

    #[test]
    fn test_build_query_sort_condition_without_sort_key_fails() {
        let args = QueryArgs::new("active").sort_condition(SortCondition::BeginsWith("a".into()));
        let result = build_query(&metadata(), Some("byStatus"), &args);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_build_query_rejects_zero_limit() {
        let args = QueryArgs::new("u1").limit(0);
        let result = build_query(&metadata(), None, &args);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_build_query_parses_cursor() {
        let args = QueryArgs::new("u1").next_page(Some(r#"{"userId":"u1","ts":"t2"}"#.into()));
        let request = build_query(&metadata(), None, &args).unwrap();

        assert_eq!(
            request.exclusive_start_key,
            Some(document(json!({ "userId": "u1", "ts": "t2" })))
        );
    }

    #[test]
    fn test_build_query_rejects_malformed_cursor() {
        let args = QueryArgs::new("u1").next_page(Some("garbage".into()));
        let result = build_query(&metadata(), None, &args);
        assert!(matches!(result, Err(Error::MalformedCursor(_))));
    }

    #[test]
    fn test_page_with_more_results() {
        let output = QueryOutput {
            items: vec![document(json!({ "userId": "u1", "ts": "t1" }))],
            last_evaluated_key: Some(document(json!({ "userId": "u1", "ts": "t1" }))),
        };

        let page = page_from_output(output, None).unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(
            decode_cursor(page.next_page.as_deref().unwrap()).unwrap(),
            document(json!({ "userId": "u1", "ts": "t1" }))
        );
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let output = QueryOutput {
            items: vec![document(json!({ "userId": "u1", "ts": "t1" }))],
            last_evaluated_key: None,
        };

        let page = page_from_output(output, Some("previous")).unwrap();

        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_empty_page_echoes_input_cursor() {
        let page = page_from_output(QueryOutput::default(), Some("previous")).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.next_page.as_deref(), Some("previous"));
    }

    #[test]
    fn test_empty_page_with_store_key_returns_store_cursor() {
        let output = QueryOutput {
            items: Vec::new(),
            last_evaluated_key: Some(document(json!({ "userId": "u1" }))),
        };

        let page = page_from_output(output, Some("previous")).unwrap();

        assert_eq!(page.next_page.as_deref(), Some(r#"{"userId":"u1"}"#));
    }

    #[test]
    fn test_page_try_map() {
        let page = Page {
            items: vec![1, 2, 3],
            next_page: Some("c".to_string()),
        };

        let mapped = page.try_map(|n| Ok(n * 2)).unwrap();

        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.next_page.as_deref(), Some("c"));
    }
}
