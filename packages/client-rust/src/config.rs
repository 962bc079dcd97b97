//! Deployment configuration for the data-access layer.
//!
//! Configuration is captured once (usually from the environment) into an
//! [`AccessConfig`] and passed explicitly to every client constructor; nothing
//! in this crate reads process-global state after construction. Values may be
//! absent at capture time — each accessor raises the fatal
//! [`ConfigMissing`](crate::error::AccessError::ConfigMissing) error at the
//! first operation that needs the value, before any network call.

use crate::error::{AccessError, Result};

/// Environment variable naming the AWS region.
pub const ENV_REGION: &str = "REGION";

/// Environment variable naming the GraphQL API endpoint identifier.
pub const ENV_GRAPHQL_API_ENDPOINT: &str = "GRAPHQL_API_ENDPOINT";

/// Environment variable naming the deployment environment (`dev`, `prod`, ...).
pub const ENV_ENVIRONMENT: &str = "ENV";

/// Page size requested per scan call when the caller gives no override.
pub const DEFAULT_SCAN_PAGE_LIMIT: u32 = 1000;

/// Default budget of batch-read rounds that may report unprocessed keys.
pub const DEFAULT_UNPROCESSED_RETRIES: u32 = 16;

/// Read-only deployment configuration shared by all clients.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// AWS region identifier. Falls back to the SDK default when unset.
    pub region: Option<String>,
    /// GraphQL API endpoint identifier; also part of physical table names.
    pub graphql_endpoint: Option<String>,
    /// Deployment environment name; part of physical table names.
    pub environment: Option<String>,
    /// Page size requested per scan call unless the caller overrides it.
    pub scan_page_limit: u32,
    /// Most pages one scan may walk. 0 disables the cap.
    pub max_scan_pages: u32,
    /// Most batch-read rounds that may report unprocessed keys before the
    /// operation fails.
    pub max_unprocessed_retries: u32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            region: None,
            graphql_endpoint: None,
            environment: None,
            scan_page_limit: DEFAULT_SCAN_PAGE_LIMIT,
            max_scan_pages: 0,
            max_unprocessed_retries: DEFAULT_UNPROCESSED_RETRIES,
        }
    }
}

impl AccessConfig {
    /// Captures configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Captures configuration through an arbitrary lookup function.
    ///
    /// Tests use this with a closure over a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            region: lookup(ENV_REGION),
            graphql_endpoint: lookup(ENV_GRAPHQL_API_ENDPOINT),
            environment: lookup(ENV_ENVIRONMENT),
            ..Self::default()
        }
    }

    /// The region identifier, or a configuration error when unset.
    pub fn require_region(&self) -> Result<&str> {
        self.region
            .as_deref()
            .ok_or(AccessError::ConfigMissing(ENV_REGION))
    }

    /// The endpoint identifier, or a configuration error when unset.
    pub fn require_endpoint(&self) -> Result<&str> {
        self.graphql_endpoint
            .as_deref()
            .ok_or(AccessError::ConfigMissing(ENV_GRAPHQL_API_ENDPOINT))
    }

    /// The environment name, or a configuration error when unset.
    pub fn require_environment(&self) -> Result<&str> {
        self.environment
            .as_deref()
            .ok_or(AccessError::ConfigMissing(ENV_ENVIRONMENT))
    }

    /// Resolves the physical table backing a logical entity name.
    ///
    /// The physical name composes the logical name with the endpoint
    /// identifier and environment name: `{logical}-{endpoint}-{environment}`.
    pub fn table_name(&self, logical: &str) -> Result<String> {
        Ok(format!(
            "{logical}-{}-{}",
            self.require_endpoint()?,
            self.require_environment()?
        ))
    }
}
