//! Request and response types exchanged with a [`StoreExecutor`](crate::StoreExecutor).
//!
//! Requests keep their conditions and updates structured. Executors that talk
//! to DynamoDB render them into expressions; in-memory executors evaluate them
//! directly.

use crate::document::Document;
use crate::expression::Expression;
use crate::query::KeyCondition;
use crate::update::{render_update, UpdateAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeTableRequest {
    pub table_name: String,
}

/// The parts of a table description dynamap looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDescription {
    pub table_name: Option<String>,
    pub index_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetItemRequest {
    pub table_name: String,
    pub key: Document,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetItemOutput {
    pub item: Option<Document>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition: KeyCondition,
    pub limit: Option<u32>,
    pub exclusive_start_key: Option<Document>,
    pub scan_index_forward: bool,
}

impl QueryRequest {
    /// Renders the `KeyConditionExpression` with its placeholders.
    pub fn key_condition_expression(&self) -> Expression {
        self.key_condition.render()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub items: Vec<Document>,
    pub last_evaluated_key: Option<Document>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutItemRequest {
    pub table_name: String,
    pub item: Document,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItemRequest {
    pub table_name: String,
    pub key: Document,
}

/// Which attributes an update echoes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnValues {
    #[default]
    None,
    UpdatedNew,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItemRequest {
    pub table_name: String,
    pub key: Document,
    pub actions: Vec<UpdateAction>,
    pub return_values: ReturnValues,
}

impl UpdateItemRequest {
    /// Renders the `UpdateExpression` with its placeholders.
    pub fn update_expression(&self) -> Expression {
        render_update(&self.actions)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateItemOutput {
    pub attributes: Option<Document>,
}
