//! `Tidepool` Client — paginated GraphQL scans, chunked `DynamoDB` batches, and entity facades.

pub mod batch;
pub mod config;
pub mod entities;
pub mod error;
pub mod graphql;

pub use batch::{BatchClient, BatchReadOutput, BulkStore, DynamoStore};
pub use config::AccessConfig;
pub use entities::{SampleStore, UserStore};
pub use error::{AccessError, Result};
pub use graphql::{AppSyncTransport, GraphQlTransport, ScanExecutor};
