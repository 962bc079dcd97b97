//! GraphQL request and response shapes shared between the data-access layer
//! and its callers.
//!
//! These types mirror the wire format of an AppSync-style endpoint: a request
//! is a `{query, variables}` pair, a response is a `{data, errors}` pair where
//! `data` maps each root field name to its payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GraphQL query or mutation document with bound variables.
///
/// Pagination variables (`limit`, `nextToken`) are NOT part of the bound
/// variables; the scan executor injects them per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest {
    /// The query or mutation document text.
    #[serde(rename = "query")]
    pub document: String,
    /// Variable bindings for the document.
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    /// Creates a request with no variable bindings.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            variables: Map::new(),
        }
    }

    /// Binds a variable, replacing any previous binding of the same name.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }
}

/// A single error entry from a GraphQL response's `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable error description.
    pub message: String,
    /// Error classification reported by the backend, if any.
    #[serde(
        default,
        rename = "errorType",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_type: Option<String>,
    /// Response path the error applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// A GraphQL response: root-field payloads plus any reported errors.
///
/// `data` is kept as raw JSON. Callers that want typed records deserialize
/// the payload under the root field they asked for (e.g. into
/// [`Sample`](crate::entity::Sample)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse {
    /// Mapping from root field name to payload. `Null` when the backend
    /// returned no data.
    #[serde(default)]
    pub data: Value,
    /// Errors reported by the backend. Empty on success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Wraps a data payload with no errors.
    #[must_use]
    pub fn from_data(data: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Whether the response carries at least one error entry.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A list query whose result the backend may split across pages.
///
/// The root field name is explicit: the scan executor reads the
/// `{items, nextToken}` page structure under `data[root_field]` rather than
/// guessing which response key carries it.
#[derive(Debug, Clone)]
pub struct ScanQuery {
    /// The list query document and its non-pagination variables.
    pub request: GraphQlRequest,
    /// Name of the single root field carrying the page structure.
    pub root_field: String,
}

impl ScanQuery {
    /// Creates a scan query for the given document and root field.
    #[must_use]
    pub fn new(request: GraphQlRequest, root_field: impl Into<String>) -> Self {
        Self {
            request,
            root_field: root_field.into(),
        }
    }
}
