use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use dynamap_core::request::{
    DeleteItemRequest, DescribeTableRequest, GetItemOutput, GetItemRequest, PutItemRequest,
    QueryOutput, QueryRequest, ReturnValues, TableDescription, UpdateItemOutput,
    UpdateItemRequest,
};
use dynamap_core::{StoreExecutor, StoreResult, TableSchema};

use super::client::create_client;
use super::conversions::{
    document_to_item, item_to_document, names_to_map, to_attribute_definitions, to_billing_mode,
    to_global_secondary_index, to_key_schema,
};
use super::error::{
    map_create_table_error, map_delete_item_error, map_describe_table_error, map_get_item_error,
    map_put_item_error, map_query_error, map_update_item_error,
};
use crate::config::Config;

/// Executor backed by the AWS SDK DynamoDB client.
#[derive(Debug, Clone)]
pub struct DynamoDbExecutor {
    client: Client,
    convert_empty_values: bool,
}

impl DynamoDbExecutor {
    /// Wraps an existing client. Empty strings are written as NULL.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            convert_empty_values: true,
        }
    }

    /// Builds a client from `config`.
    pub async fn connect(config: &Config) -> Self {
        Self::new(create_client(config).await)
            .with_convert_empty_values(config.convert_empty_values)
    }

    pub fn with_convert_empty_values(mut self, convert_empty_values: bool) -> Self {
        self.convert_empty_values = convert_empty_values;
        self
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl StoreExecutor for DynamoDbExecutor {
    async fn describe_table(
        &self,
        request: &DescribeTableRequest,
    ) -> StoreResult<TableDescription> {
        let response = self
            .client
            .describe_table()
            .table_name(&request.table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, &request.table_name))?;

        Ok(response
            .table()
            .map(|table| TableDescription {
                table_name: table.table_name().map(str::to_string),
                index_names: table
                    .global_secondary_indexes()
                    .iter()
                    .filter_map(|index| index.index_name().map(str::to_string))
                    .collect(),
            })
            .unwrap_or_default())
    }

    async fn create_table(&self, schema: &TableSchema) -> StoreResult<()> {
        let mut request = self
            .client
            .create_table()
            .table_name(&schema.table_name)
            .set_key_schema(Some(to_key_schema(&schema.key_schema)?))
            .set_attribute_definitions(Some(to_attribute_definitions(
                &schema.attribute_definitions,
            )?))
            .billing_mode(to_billing_mode(schema.billing_mode));

        for index in &schema.secondary_indexes {
            request = request.global_secondary_indexes(to_global_secondary_index(index)?);
        }

        request
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &schema.table_name))?;

        Ok(())
    }

    async fn get_item(&self, request: &GetItemRequest) -> StoreResult<GetItemOutput> {
        let result = self
            .client
            .get_item()
            .table_name(&request.table_name)
            .set_key(Some(document_to_item(&request.key, false)?))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &request.table_name))?;

        Ok(GetItemOutput {
            item: result.item.map(item_to_document).transpose()?,
        })
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryOutput> {
        let expression = request.key_condition_expression();

        let exclusive_start_key = request
            .exclusive_start_key
            .as_ref()
            .map(|key| document_to_item(key, false))
            .transpose()?;

        let result = self
            .client
            .query()
            .table_name(&request.table_name)
            .set_index_name(request.index_name.clone())
            .key_condition_expression(expression.expression)
            .set_expression_attribute_names(Some(names_to_map(expression.names)))
            .set_expression_attribute_values(Some(document_to_item(&expression.values, false)?))
            .set_limit(
                request
                    .limit
                    .map(|limit| i32::try_from(limit).unwrap_or(i32::MAX)),
            )
            .set_exclusive_start_key(exclusive_start_key)
            .scan_index_forward(request.scan_index_forward)
            .send()
            .await
            .map_err(|e| map_query_error(e, &request.table_name))?;

        Ok(QueryOutput {
            items: result
                .items
                .unwrap_or_default()
                .into_iter()
                .map(item_to_document)
                .collect::<StoreResult<Vec<_>>>()?,
            last_evaluated_key: result
                .last_evaluated_key
                .filter(|key| !key.is_empty())
                .map(item_to_document)
                .transpose()?,
        })
    }

    async fn put_item(&self, request: &PutItemRequest) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(&request.table_name)
            .set_item(Some(document_to_item(
                &request.item,
                self.convert_empty_values,
            )?))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &request.table_name))?;

        Ok(())
    }

    async fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(&request.table_name)
            .set_key(Some(document_to_item(&request.key, false)?))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &request.table_name))?;

        Ok(())
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<UpdateItemOutput> {
        let expression = request.update_expression();

        let return_values = match request.return_values {
            ReturnValues::None => ReturnValue::None,
            ReturnValues::UpdatedNew => ReturnValue::UpdatedNew,
        };

        let result = self
            .client
            .update_item()
            .table_name(&request.table_name)
            .set_key(Some(document_to_item(&request.key, false)?))
            .update_expression(expression.expression)
            .set_expression_attribute_names(Some(names_to_map(expression.names)))
            .set_expression_attribute_values(Some(document_to_item(
                &expression.values,
                self.convert_empty_values,
            )?))
            .return_values(return_values)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, &request.table_name))?;

        Ok(UpdateItemOutput {
            attributes: result.attributes.map(item_to_document).transpose()?,
        })
    }
}
