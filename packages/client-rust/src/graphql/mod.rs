//! GraphQL transport seam and the paginated scan executor built on it.
//!
//! [`GraphQlTransport`] is the single point where queries and mutations leave
//! the process. The scan executor and the entity facades sit on it as a trait
//! object, so tests substitute scripted transports without touching the
//! network.

pub mod appsync;
pub mod scan;

use async_trait::async_trait;
use tidepool_core::{GraphQlRequest, GraphQlResponse};

use crate::error::Result;

pub use appsync::AppSyncTransport;
pub use scan::ScanExecutor;

/// Executes GraphQL operations against the backend.
///
/// One `execute` call is one backend round trip. Implementations must surface
/// a response carrying a non-empty `errors` array as
/// [`AccessError::Graphql`](crate::error::AccessError::Graphql) and a failed
/// call as [`AccessError::Backend`](crate::error::AccessError::Backend); a
/// returned `Ok` response is error-free.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Executes a single query or mutation with its bound variables.
    async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse>;
}
