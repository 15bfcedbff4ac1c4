//! DynamoDB executor.
//!
//! Implements [`StoreExecutor`](dynamap_core::StoreExecutor) on top of
//! `aws-sdk-dynamodb`, converting documents with `serde_dynamo`.

mod client;
mod conversions;
mod error;
mod executor;

pub use client::create_client;
pub use executor::DynamoDbExecutor;
