//! Data access for User records.
//!
//! The profile endpoint reads a single User and picks the profile slice out
//! of it; see [`UserProfile`](tidepool_core::UserProfile) for the typed view.

use std::sync::Arc;

use serde_json::Value;
use tidepool_core::{GraphQlRequest, GraphQlResponse};

use crate::batch::{BatchClient, BulkStore, DynamoStore};
use crate::config::AccessConfig;
use crate::error::Result;
use crate::graphql::{AppSyncTransport, GraphQlTransport};

/// Logical table backing User records.
const TABLE: &str = "User";

const GET_USER: &str = r"
query GetUser($id: ID!) {
  getUser(id: $id) {
    id
    nickName
    birthYm
    gender
    tel
    mail
    profilePhotoPath
    profilePhotoKey
    createdAt
    updatedAt
  }
}
";

const UPDATE_USER: &str = r"
mutation UpdateUser(
  $input: UpdateUserInput!
  $condition: ModelUserConditionInput
) {
  updateUser(input: $input, condition: $condition) {
    id
    nickName
    birthYm
    gender
    tel
    mail
    profilePhotoPath
    profilePhotoKey
    createdAt
    updatedAt
  }
}
";

/// Data-access facade for User records.
pub struct UserStore {
    graphql: Arc<dyn GraphQlTransport>,
    batch: BatchClient,
}

impl UserStore {
    /// Wires a store from the given transport and bulk store.
    #[must_use]
    pub fn new(
        config: Arc<AccessConfig>,
        graphql: Arc<dyn GraphQlTransport>,
        store: Arc<dyn BulkStore>,
    ) -> Self {
        Self {
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

    /// Fetches a single user by identifier.
    ///
    /// An absent user comes back as `data.getUser = null`; deciding that this
    /// means not-found belongs to the caller.
    pub async fn get(&self, id: &str) -> Result<GraphQlResponse> {
        let request =
            GraphQlRequest::new(GET_USER).with_variable("id", Value::String(id.to_string()));
        self.graphql.execute(&request).await
    }

    /// Updates a user from a caller-shaped `UpdateUserInput`.
    pub async fn update(&self, input: Value) -> Result<GraphQlResponse> {
        let request = GraphQlRequest::new(UPDATE_USER).with_variable("input", input);
        self.graphql.execute(&request).await
    }

    /// Resolves users for the given key set via chunked bulk reads.
    pub async fn batch_get(&self, keys: &[Value]) -> Result<Vec<Value>> {
        self.batch.batch_get(TABLE, keys).await
    }

    /// Upserts full user records via chunked bulk writes.
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
    use tidepool_core::UserProfile;

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

        async fn read_chunk(&self, _table: &str, keys: &[Value]) -> Result<BatchReadOutput> {
            Ok(BatchReadOutput {
                items: keys.to_vec(),
                unprocessed_keys: vec![],
            })
        }
    }

    fn store_with(transport: Arc<ScriptedTransport>, bulk: Arc<RecordingStore>) -> UserStore {
        let config = Arc::new(AccessConfig {
            graphql_endpoint: Some("api123".to_string()),
            environment: Some("dev".to_string()),
            ..AccessConfig::default()
        });
        UserStore::new(config, transport, bulk)
    }

    #[tokio::test]
    async fn get_returns_a_deserializable_profile() {
        let transport = Arc::new(ScriptedTransport::new(vec![GraphQlResponse::from_data(
            json!({
                "getUser": {
                    "id": "u-1",
                    "nickName": "suzu",
                    "birthYm": "1990-01",
                    "gender": "female",
                    "mail": "suzu@example.com",
                },
            }),
        )]));
        let store = store_with(Arc::clone(&transport), Arc::new(RecordingStore::default()));

        let response = store.get("u-1").await.unwrap();

        let profile: UserProfile =
            serde_json::from_value(response.data["getUser"].clone()).unwrap();
        assert_eq!(profile.nick_name, "suzu");
        assert_eq!(profile.mail.as_deref(), Some("suzu@example.com"));

        let calls = transport.calls.lock().unwrap();
        assert!(calls[0].document.contains("query GetUser"));
        assert_eq!(calls[0].variables["id"], "u-1");
    }

    #[tokio::test]
    async fn absent_user_is_not_an_error_here() {
        let transport = Arc::new(ScriptedTransport::new(vec![GraphQlResponse::from_data(
            json!({"getUser": null}),
        )]));
        let store = store_with(transport, Arc::new(RecordingStore::default()));

        let response = store.get("missing").await.unwrap();
        assert!(response.data["getUser"].is_null());
    }

    #[tokio::test]
    async fn batch_write_targets_the_user_table() {
        let bulk = Arc::new(RecordingStore::default());
        let store = store_with(Arc::new(ScriptedTransport::new(vec![])), Arc::clone(&bulk));

        store.batch_write(&[json!({"id": "u-1"})]).await.unwrap();

        assert_eq!(bulk.write_calls.lock().unwrap()[0].0, "User-api123-dev");
    }
}
