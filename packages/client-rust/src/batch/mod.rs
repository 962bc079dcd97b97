//! Bulk key-value access with provider-side chunk limits.
//!
//! The key-value protocol accepts at most [`WRITE_CHUNK_MAX`] put-operations
//! per write call and [`READ_CHUNK_MAX`] keys per read call, and a read call
//! may return a subset of its keys as unprocessed. [`BulkStore`] is the
//! one-call-per-invocation seam; [`BatchClient`] layers chunking and the
//! unprocessed-key retry loop on top of it.

pub mod attr;
pub mod dynamodb;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};

pub use dynamodb::DynamoStore;

/// Most put-operations accepted by one bulk write call.
pub const WRITE_CHUNK_MAX: usize = 25;

/// Most keys accepted by one bulk read call.
pub const READ_CHUNK_MAX: usize = 100;

/// Result of one bulk read round: resolved records plus the keys the backend
/// declined to process this round.
#[derive(Debug, Default)]
pub struct BatchReadOutput {
    /// Records resolved in this round, in backend order.
    pub items: Vec<Value>,
    /// Keys that must be re-submitted in a later round.
    pub unprocessed_keys: Vec<Value>,
}

/// One physical call against the bulk key-value protocol.
///
/// Implementations perform exactly one backend round trip per method call and
/// never chunk or retry; that responsibility belongs to [`BatchClient`].
#[async_trait]
pub trait BulkStore: Send + Sync {
    /// Upserts up to [`WRITE_CHUNK_MAX`] full records into `table`.
    ///
    /// Every record already carries its complete key and attributes.
    async fn write_chunk(&self, table: &str, items: &[Value]) -> Result<()>;

    /// Reads up to [`READ_CHUNK_MAX`] keys from `table`.
    async fn read_chunk(&self, table: &str, keys: &[Value]) -> Result<BatchReadOutput>;
}

/// Chunked batch reads and writes against one logical table.
///
/// Physical table names compose the logical entity name with the configured
/// endpoint identifier and environment; missing configuration fails the
/// operation before any backend call. All chunks are issued sequentially —
/// a caller observes one eventual result or one eventual failure.
pub struct BatchClient {
    store: Arc<dyn BulkStore>,
    config: Arc<AccessConfig>,
}

impl BatchClient {
    /// Creates a client over the given store and configuration.
    #[must_use]
    pub fn new(store: Arc<dyn BulkStore>, config: Arc<AccessConfig>) -> Self {
        Self { store, config }
    }

    /// Upserts `items` in consecutive chunks of at most [`WRITE_CHUNK_MAX`].
    ///
    /// Chunks are written in original item order, each awaited before the
    /// next is issued. A chunk failure aborts the remaining chunks; chunks
    /// already written stay written — bulk writes are not atomic.
    pub async fn batch_write(&self, logical_table: &str, items: &[Value]) -> Result<()> {
        let table = self.config.table_name(logical_table)?;

        for chunk in items.chunks(WRITE_CHUNK_MAX) {
            debug!(table = %table, size = chunk.len(), "writing batch chunk");
            self.store.write_chunk(&table, chunk).await?;
        }
        Ok(())
    }

    /// Resolves `keys` in chunks of at most [`READ_CHUNK_MAX`], re-queuing
    /// any keys the backend reports unprocessed.
    ///
    /// Re-queued keys join the back of the pending queue and ride along with
    /// later chunks. The loop ends when the queue is empty, so every key is
    /// either resolved or retried. Rounds that report unprocessed keys count
    /// against the configured retry budget; exhausting it fails with
    /// [`AccessError::RetriesExhausted`] rather than spinning against a
    /// backend that never converges.
    pub async fn batch_get(&self, logical_table: &str, keys: &[Value]) -> Result<Vec<Value>> {
        let table = self.config.table_name(logical_table)?;

        let mut pending: VecDeque<Value> = keys.iter().cloned().collect();
        let mut items = Vec::with_capacity(keys.len());
        let mut requeue_rounds: u32 = 0;

        while !pending.is_empty() {
            let take = pending.len().min(READ_CHUNK_MAX);
            let chunk: Vec<Value> = pending.drain(..take).collect();

            let output = self.store.read_chunk(&table, &chunk).await?;
            debug!(
                table = %table,
                requested = chunk.len(),
                resolved = output.items.len(),
                unprocessed = output.unprocessed_keys.len(),
                "batch read round finished"
            );
            items.extend(output.items);

            if !output.unprocessed_keys.is_empty() {
                requeue_rounds += 1;
                if requeue_rounds > self.config.max_unprocessed_retries {
                    return Err(AccessError::RetriesExhausted {
                        remaining: output.unprocessed_keys.len() + pending.len(),
                    });
                }
                warn!(
                    table = %table,
                    requeued = output.unprocessed_keys.len(),
                    round = requeue_rounds,
                    "backend reported unprocessed keys, re-queuing"
                );
                pending.extend(output.unprocessed_keys);
            }
        }

        Ok(items)
    }
}
