//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `dynamap_core`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use dynamap_core::StoreError;

/// Map errors without a dedicated variant, using the service error code.
fn map_unmodeled<E: ProvideErrorMetadata + Debug>(operation: &str, err: E) -> StoreError {
    let message = err.message().unwrap_or_default().to_string();
    match err.code() {
        Some("ValidationException") => StoreError::Validation(message),
        Some("ThrottlingException") => StoreError::Throttled(message),
        _ => StoreError::Request(format!("{} failed: {:?}", operation, err)),
    }
}

/// Map a DescribeTable SDK error to StoreError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        DescribeTableError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("DescribeTable", err),
    }
}

/// Map a CreateTable SDK error to StoreError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            StoreError::ResourceInUse(format!("Table '{}' already exists", table_name))
        }
        CreateTableError::LimitExceededException(_) => {
            StoreError::Throttled("Table limit exceeded, please retry".to_string())
        }
        CreateTableError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("CreateTable", err),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("GetItem", err),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("Query", err),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(e.message().unwrap_or_default().to_string())
        }
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Request("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::ConditionFailed("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("PutItem", err),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(e.message().unwrap_or_default().to_string())
        }
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Request("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::ConditionFailed("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("UpdateItem", err),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(e.message().unwrap_or_default().to_string())
        }
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::ResourceNotFound(format!("Table '{}' not found", table_name))
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Request("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            StoreError::ConditionFailed("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::Request("DynamoDB internal server error".to_string())
        }
        err => map_unmodeled("DeleteItem", err),
    }
}
