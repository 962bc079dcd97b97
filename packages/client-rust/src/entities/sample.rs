//! Data access for Sample records.

use std::sync::Arc;

use serde_json::Value;
use tidepool_core::{GraphQlRequest, GraphQlResponse, ScanQuery};

use crate::batch::{BatchClient, BulkStore, DynamoStore};
use crate::config::AccessConfig;
use crate::error::Result;
use crate::graphql::{AppSyncTransport, GraphQlTransport, ScanExecutor};

/// Logical table backing Sample records.
const TABLE: &str = "Sample";

/// Root field of the list query.
const LIST_ROOT_FIELD: &str = "listSamples";

const GET_SAMPLE: &str = r"
query GetSample($id: ID!) {
  getSample(id: $id) {
    id
    groupId
    groupInfo {
      items {
        groupName
      }
      nextToken
    }
    userId
    userInfo {
      items {
        userName
      }
      nextToken
    }
    sampleInt
    sampleFloat
    sampleString
    sampleBool
    sampleDate
    sampleDateTime
    sampleJson
    ttl
    createdAt
    updatedAt
  }
}
";

const CREATE_SAMPLE: &str = r"
mutation CreateSample(
  $input: CreateSampleInput!
  $condition: ModelSampleConditionInput
) {
  createSample(input: $input, condition: $condition) {
    id
    groupId
    userId
    sampleInt
    sampleFloat
    sampleString
    sampleBool
    sampleDate
    sampleDateTime
    sampleJson
    ttl
    createdAt
    updatedAt
  }
}
";

const UPDATE_SAMPLE: &str = r"
mutation UpdateSample(
  $input: UpdateSampleInput!
  $condition: ModelSampleConditionInput
) {
  updateSample(input: $input, condition: $condition) {
    id
    groupId
    userId
    sampleInt
    sampleFloat
    sampleString
    sampleBool
    sampleDate
    sampleDateTime
    sampleJson
    ttl
    createdAt
    updatedAt
  }
}
";

const DELETE_SAMPLE: &str = r"
mutation DeleteSample(
  $input: DeleteSampleInput!
  $condition: ModelSampleConditionInput
) {
  deleteSample(input: $input, condition: $condition) {
    id
    groupId
    userId
    sampleInt
    sampleFloat
    sampleString
    sampleBool
    sampleDate
    sampleDateTime
    sampleJson
    ttl
    createdAt
    updatedAt
  }
}
";

const LIST_SAMPLES: &str = r"
query ListSamples(
  $filter: ModelSampleFilterInput
  $limit: Int
  $nextToken: String
) {
  listSamples(
    filter: $filter
    limit: $limit
    nextToken: $nextToken
  ) {
    items {
      id
      groupId
      groupInfo {
        items {
          groupName
        }
        nextToken
      }
      userId
      userInfo {
        items {
          userName
        }
        nextToken
      }
      sampleInt
      sampleFloat
      sampleString
      sampleBool
      sampleDate
      sampleDateTime
      sampleJson
      ttl
      createdAt
      updatedAt
    }
    nextToken
  }
}
";

/// Data-access facade for Sample records.
///
/// Mutation inputs are caller-shaped values conforming to the backend's
/// input types; no validation happens here. Responses come back
/// backend-shaped — an absent record under `data.getSample` is the caller's
/// concern, not an error.
pub struct SampleStore {
    graphql: Arc<dyn GraphQlTransport>,
    scan: ScanExecutor,
    batch: BatchClient,
}

impl SampleStore {
    /// Wires a store from the given transport and bulk store.
    #[must_use]
    pub fn new(
        config: Arc<AccessConfig>,
        graphql: Arc<dyn GraphQlTransport>,
        store: Arc<dyn BulkStore>,
    ) -> Self {
        Self {
            scan: ScanExecutor::new(Arc::clone(&graphql), &config),
            batch: BatchClient::new(store, config),
            graphql,
        }
    }

    /// Assembles a store over the real AppSync and DynamoDB clients.
    pub fn connect(sdk_config: &aws_config::SdkConfig, config: AccessConfig) -> Result<Self> {
        let config = Arc::new(config);
        let graphql: Arc<dyn GraphQlTransport> =
            Arc::new(AppSyncTransport::new(sdk_config, &config)?);
        let store: Arc<dyn BulkStore> = Arc::new(DynamoStore::new(sdk_config));
        Ok(Self::new(config, graphql, store))
    }

    /// Fetches a single record by identifier.
    pub async fn get(&self, id: &str) -> Result<GraphQlResponse> {
        let request =
            GraphQlRequest::new(GET_SAMPLE).with_variable("id", Value::String(id.to_string()));
        self.graphql.execute(&request).await
    }

    /// Creates a record from a caller-shaped `CreateSampleInput`.
    pub async fn create(&self, input: Value) -> Result<GraphQlResponse> {
        let request = GraphQlRequest::new(CREATE_SAMPLE).with_variable("input", input);
        self.graphql.execute(&request).await
    }

    /// Updates a record from a caller-shaped `UpdateSampleInput`.
    pub async fn update(&self, input: Value) -> Result<GraphQlResponse> {
        let request = GraphQlRequest::new(UPDATE_SAMPLE).with_variable("input", input);
        self.graphql.execute(&request).await
    }

    /// Deletes a record from a caller-shaped `DeleteSampleInput`.
    pub async fn delete(&self, input: Value) -> Result<GraphQlResponse> {
        let request = GraphQlRequest::new(DELETE_SAMPLE).with_variable("input", input);
        self.graphql.execute(&request).await
    }

    /// Lists records matching `filter`, following continuation tokens until
    /// the result set is complete.
    pub async fn list(
        &self,
        filter: Option<Value>,
        page_limit: Option<u32>,
    ) -> Result<GraphQlResponse> {
        let mut request = GraphQlRequest::new(LIST_SAMPLES);
        if let Some(filter) = filter {
            request = request.with_variable("filter", filter);
        }
        self.scan
            .scan(&ScanQuery::new(request, LIST_ROOT_FIELD), page_limit)
            .await
    }

    /// Resolves records for the given key set via chunked bulk reads.
    pub async fn batch_get(&self, keys: &[Value]) -> Result<Vec<Value>> {
        self.batch.batch_get(TABLE, keys).await
    }

    /// Upserts full records via chunked bulk writes.
    pub async fn batch_write(&self, items: &[Value]) -> Result<()> {
        self.batch.batch_write(TABLE, items).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::batch::BatchReadOutput;
    use crate::error::AccessError;

    struct ScriptedTransport {
        responses: Mutex<VecDeque<GraphQlResponse>>,
        calls: Mutex<Vec<GraphQlRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<GraphQlResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<GraphQlRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphQlTransport for ScriptedTransport {
        async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
            self.calls.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AccessError::backend("no scripted response left"))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        write_calls: Mutex<Vec<(String, Vec<Value>)>>,
        read_calls: Mutex<Vec<(String, Vec<Value>)>>,
    }

    #[async_trait]
    impl BulkStore for RecordingStore {
        async fn write_chunk(&self, table: &str, items: &[Value]) -> Result<()> {
            self.write_calls
                .lock()
                .unwrap()
                .push((table.to_string(), items.to_vec()));
            Ok(())
        }

        async fn read_chunk(&self, table: &str, keys: &[Value]) -> Result<BatchReadOutput> {
            self.read_calls
                .lock()
                .unwrap()
                .push((table.to_string(), keys.to_vec()));
            Ok(BatchReadOutput {
                items: keys.to_vec(),
                unprocessed_keys: vec![],
            })
        }
    }

    fn store_with(
        transport: Arc<ScriptedTransport>,
        bulk: Arc<RecordingStore>,
    ) -> SampleStore {
        let config = Arc::new(AccessConfig {
            graphql_endpoint: Some("api123".to_string()),
            environment: Some("dev".to_string()),
            ..AccessConfig::default()
        });
        SampleStore::new(config, transport, bulk)
    }

    #[tokio::test]
    async fn get_binds_the_identifier() {
        let transport = Arc::new(ScriptedTransport::new(vec![GraphQlResponse::from_data(
            json!({"getSample": {"id": "s-1"}}),
        )]));
        let store = store_with(Arc::clone(&transport), Arc::new(RecordingStore::default()));

        let response = store.get("s-1").await.unwrap();

        assert_eq!(response.data["getSample"]["id"], "s-1");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].document.contains("query GetSample"));
        assert_eq!(calls[0].variables["id"], "s-1");
    }

    #[tokio::test]
    async fn create_passes_the_input_through_unchanged() {
        let transport = Arc::new(ScriptedTransport::new(vec![GraphQlResponse::from_data(
            json!({"createSample": {"id": "s-2"}}),
        )]));
        let store = store_with(Arc::clone(&transport), Arc::new(RecordingStore::default()));

        let input = json!({"id": "s-2", "sampleInt": 7});
        store.create(input.clone()).await.unwrap();

        let calls = transport.calls();
        assert!(calls[0].document.contains("mutation CreateSample"));
        assert_eq!(calls[0].variables["input"], input);
    }

    #[tokio::test]
    async fn delete_uses_the_delete_mutation() {
        let transport = Arc::new(ScriptedTransport::new(vec![GraphQlResponse::from_data(
            json!({"deleteSample": {"id": "s-3"}}),
        )]));
        let store = store_with(Arc::clone(&transport), Arc::new(RecordingStore::default()));

        store.delete(json!({"id": "s-3"})).await.unwrap();

        assert!(transport.calls()[0]
            .document
            .contains("mutation DeleteSample"));
    }

    #[tokio::test]
    async fn list_follows_tokens_and_merges_pages() {
        let page = |ids: &[&str], token: Option<&str>| {
            GraphQlResponse::from_data(json!({
                "listSamples": {
                    "items": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
                    "nextToken": token,
                },
            }))
        };
        let transport = Arc::new(ScriptedTransport::new(vec![
            page(&["a", "b", "c"], Some("T1")),
            page(&["d", "e"], None),
        ]));
        let store = store_with(Arc::clone(&transport), Arc::new(RecordingStore::default()));

        let response = store
            .list(Some(json!({"groupId": {"eq": "g-1"}})), Some(3))
            .await
            .unwrap();

        assert_eq!(
            response.data["listSamples"]["items"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].variables["nextToken"], "T1");
        assert_eq!(
            calls[0].variables["filter"],
            json!({"groupId": {"eq": "g-1"}})
        );
    }

    #[tokio::test]
    async fn batch_operations_use_the_sample_table() {
        let bulk = Arc::new(RecordingStore::default());
        let store = store_with(
            Arc::new(ScriptedTransport::new(vec![])),
            Arc::clone(&bulk),
        );

        store
            .batch_write(&[json!({"id": "s-1"})])
            .await
            .unwrap();
        store.batch_get(&[json!({"id": "s-1"})]).await.unwrap();

        assert_eq!(
            bulk.write_calls.lock().unwrap()[0].0,
            "Sample-api123-dev"
        );
        assert_eq!(bulk.read_calls.lock().unwrap()[0].0, "Sample-api123-dev");
    }
}
