//! DynamoDB implementation of the bulk key-value protocol.
//!
//! One [`write_chunk`](crate::batch::BulkStore::write_chunk) is one
//! `BatchWriteItem` of put-requests; one
//! [`read_chunk`](crate::batch::BulkStore::read_chunk) is one `BatchGetItem`.
//! Unprocessed keys reported by the service are handed back verbatim for the
//! client's retry loop — no retries happen here.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{KeysAndAttributes, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use serde_json::Value;

use super::attr;
use super::{BatchReadOutput, BulkStore};
use crate::error::{AccessError, Result};

/// DynamoDB-backed [`BulkStore`].
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore").finish_non_exhaustive()
    }
}

impl DynamoStore {
    /// Creates a store from the ambient SDK config.
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Creates a store from a pre-built client (custom endpoints, tests).
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BulkStore for DynamoStore {
    async fn write_chunk(&self, table: &str, items: &[Value]) -> Result<()> {
        let mut requests = Vec::with_capacity(items.len());
        for item in items {
            let put = PutRequest::builder()
                .set_item(Some(attr::item_from_json(item)?))
                .build()
                .map_err(|e| AccessError::backend(format!("put request assembly failed: {e}")))?;
            requests.push(WriteRequest::builder().put_request(put).build());
        }

        self.client
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await
            .map_err(|e| AccessError::backend(format!("DynamoDB BatchWriteItem failed: {e}")))?;
        Ok(())
    }

    async fn read_chunk(&self, table: &str, keys: &[Value]) -> Result<BatchReadOutput> {
        let mut key_maps = Vec::with_capacity(keys.len());
        for key in keys {
            key_maps.push(attr::item_from_json(key)?);
        }
        let request_keys = KeysAndAttributes::builder()
            .set_keys(Some(key_maps))
            .build()
            .map_err(|e| AccessError::backend(format!("key set assembly failed: {e}")))?;

        let output = self
            .client
            .batch_get_item()
            .request_items(table, request_keys)
            .send()
            .await
            .map_err(|e| AccessError::backend(format!("DynamoDB BatchGetItem failed: {e}")))?;

        let items = output
            .responses()
            .and_then(|responses| responses.get(table))
            .map(|records| records.iter().map(attr::item_to_json).collect())
            .unwrap_or_default();
        let unprocessed_keys = output
            .unprocessed_keys()
            .and_then(|unprocessed| unprocessed.get(table))
            .map(|pending| pending.keys().iter().map(attr::item_to_json).collect())
            .unwrap_or_default();

        Ok(BatchReadOutput {
            items,
            unprocessed_keys,
        })
    }
}
