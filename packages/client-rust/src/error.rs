//! Error taxonomy for the data-access layer.
//!
//! Every public operation resolves to a value or to exactly one
//! [`AccessError`]. The kinds are tagged so the HTTP caller can map them to
//! transport semantics; no HTTP translation happens here.

use thiserror::Error;

/// Errors surfaced by the data-access layer.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Required environment value unset. Raised before any network call.
    #[error("environment value [{0}] is not set")]
    ConfigMissing(&'static str),

    /// The backend answered with a non-empty GraphQL `errors` array.
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// A network or service call failed outright.
    #[error("backend call failed: {0}")]
    Backend(String),

    /// A response did not carry the expected structure.
    #[error("malformed response: {0}")]
    Shape(String),

    /// A scan walked `pages` pages without reaching a terminal token.
    #[error("scan exceeded {pages} pages without a terminal continuation token")]
    PageCapExceeded { pages: u32 },

    /// The unprocessed-key retry budget ran out with keys still unresolved.
    #[error("batch read retry budget exhausted with {remaining} keys unresolved")]
    RetriesExhausted { remaining: usize },

    /// Request or response JSON could not be encoded/decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AccessError {
    pub fn graphql(msg: impl Into<String>) -> Self {
        Self::Graphql(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}

/// Result type for data-access operations.
pub type Result<T> = std::result::Result<T, AccessError>;
