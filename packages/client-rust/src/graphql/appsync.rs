//! SigV4-signed HTTP transport for an AppSync GraphQL endpoint.
//!
//! Each operation is one POST of `{query, variables}` JSON. Requests are
//! signed with the caller's AWS credentials (service name `appsync`), resolved
//! once per call from the SDK's credential chain so rotation keeps working.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use tidepool_core::{GraphQlRequest, GraphQlResponse};
use tracing::debug;

use crate::config::{AccessConfig, ENV_REGION};
use crate::error::{AccessError, Result};
use crate::graphql::GraphQlTransport;

/// SigV4 service name for AppSync endpoints.
const SIGNING_SERVICE: &str = "appsync";

/// Request-signing GraphQL transport over HTTP.
#[derive(Debug)]
pub struct AppSyncTransport {
    http: reqwest::Client,
    endpoint: String,
    region: String,
    credentials: SharedCredentialsProvider,
}

impl AppSyncTransport {
    /// Builds a transport from the ambient SDK config plus deployment
    /// configuration.
    ///
    /// The endpoint must be configured. The region comes from the deployment
    /// configuration when set, otherwise from the SDK's resolved region.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &AccessConfig) -> Result<Self> {
        let endpoint = config.require_endpoint()?.to_string();
        let region = match config.region.as_deref() {
            Some(region) => region.to_string(),
            None => sdk_config
                .region()
                .map(ToString::to_string)
                .ok_or(AccessError::ConfigMissing(ENV_REGION))?,
        };
        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| AccessError::backend("SDK config carries no credentials provider"))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            region,
            credentials,
        })
    }

    /// Builds the signed HTTP request for one operation body.
    async fn signed_request(&self, body: &[u8]) -> Result<http::Request<Vec<u8>>> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| AccessError::backend(format!("credential resolution failed: {e}")))?;
        let identity: Identity = credentials.into();

        let signing_params: aws_sigv4::http_request::SigningParams<'_> =
            v4::SigningParams::builder()
                .identity(&identity)
                .region(&self.region)
                .name(SIGNING_SERVICE)
                .time(SystemTime::now())
                .settings(SigningSettings::default())
                .build()
                .map_err(|e| AccessError::backend(format!("signing setup failed: {e}")))?
                .into();

        let mut request = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.endpoint)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .map_err(|e| AccessError::backend(format!("request assembly failed: {e}")))?;

        let signable = SignableRequest::new(
            request.method().as_str(),
            request.uri().to_string(),
            request
                .headers()
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or_default())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| AccessError::backend(format!("request signing failed: {e}")))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| AccessError::backend(format!("request signing failed: {e}")))?
            .into_parts();
        instructions.apply_to_request_http1x(&mut request);

        Ok(request)
    }
}

#[async_trait]
impl GraphQlTransport for AppSyncTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
        let body = serde_json::to_vec(request)?;
        let signed = self.signed_request(&body).await?;

        let outbound = reqwest::Request::try_from(signed)
            .map_err(|e| AccessError::backend(format!("request conversion failed: {e}")))?;
        let response = self
            .http
            .execute(outbound)
            .await
            .map_err(|e| AccessError::backend(format!("GraphQL call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccessError::backend(format!(
                "GraphQL endpoint answered {status}"
            )));
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| AccessError::backend(format!("GraphQL response decode failed: {e}")))?;

        if parsed.has_errors() {
            let summary = parsed
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AccessError::graphql(summary));
        }

        debug!(endpoint = %self.endpoint, "GraphQL operation completed");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use aws_credential_types::Credentials;

    use super::*;

    fn sdk_config_with_credentials() -> aws_config::SdkConfig {
        let credentials = Credentials::new("AKIDEXAMPLE", "secret", None, None, "static");
        aws_config::SdkConfig::builder()
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .region(aws_config::Region::new("ap-northeast-1"))
            .build()
    }

    #[test]
    fn new_requires_an_endpoint() {
        let config = AccessConfig::default();
        let err = AppSyncTransport::new(&sdk_config_with_credentials(), &config).unwrap_err();
        assert!(matches!(err, AccessError::ConfigMissing(_)));
    }

    #[test]
    fn new_prefers_configured_region_over_sdk_region() {
        let config = AccessConfig {
            region: Some("us-west-2".to_string()),
            graphql_endpoint: Some("https://example.appsync-api.amazonaws.com/graphql".to_string()),
            ..AccessConfig::default()
        };

        let transport = AppSyncTransport::new(&sdk_config_with_credentials(), &config).unwrap();
        assert_eq!(transport.region, "us-west-2");
    }

    #[test]
    fn new_falls_back_to_sdk_region() {
        let config = AccessConfig {
            graphql_endpoint: Some("https://example.appsync-api.amazonaws.com/graphql".to_string()),
            ..AccessConfig::default()
        };

        let transport = AppSyncTransport::new(&sdk_config_with_credentials(), &config).unwrap();
        assert_eq!(transport.region, "ap-northeast-1");
    }

    #[tokio::test]
    async fn signed_request_carries_authorization_headers() {
        let config = AccessConfig {
            graphql_endpoint: Some("https://example.appsync-api.amazonaws.com/graphql".to_string()),
            ..AccessConfig::default()
        };
        let transport = AppSyncTransport::new(&sdk_config_with_credentials(), &config).unwrap();

        let signed = transport.signed_request(br#"{"query":"{ __typename }"}"#).await.unwrap();

        assert!(signed.headers().contains_key(http::header::AUTHORIZATION));
        assert!(signed.headers().contains_key("x-amz-date"));
        assert_eq!(signed.method(), http::Method::POST);
    }
}
