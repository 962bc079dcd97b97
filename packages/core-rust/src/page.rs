//! Page structures for cursor-paginated list responses.
//!
//! A paginated root field carries `{items, nextToken}`: a slice of records
//! plus an opaque continuation token. A missing or null token marks the
//! terminal page. [`Page`] provides pure helpers to read that structure out
//! of a response payload and to write an accumulated item set back into it;
//! the async scan loop lives in the client crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response key carrying the records of one page.
pub const ITEMS_FIELD: &str = "items";

/// Response key carrying the continuation token.
pub const NEXT_TOKEN_FIELD: &str = "nextToken";

/// One page of a cursor-paginated list result.
///
/// The token is an opaque single-use pointer into a specific query+variables
/// shape; it must not be reused across different queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Records returned in this page, in backend order.
    #[serde(default)]
    pub items: Vec<Value>,
    /// Continuation token. `None` means no further pages exist.
    #[serde(
        default,
        rename = "nextToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_token: Option<String>,
}

impl Page {
    /// Reads the page structure under `root_field` of a response payload.
    ///
    /// Returns `None` when the root field is absent or null. A present root
    /// field with no `items` array yields an empty page; a null `nextToken`
    /// reads as terminal.
    #[must_use]
    pub fn read(data: &Value, root_field: &str) -> Option<Self> {
        let field = data.get(root_field)?;
        if field.is_null() {
            return None;
        }

        let items = field
            .get(ITEMS_FIELD)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_token = field
            .get(NEXT_TOKEN_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self { items, next_token })
    }

    /// Replaces the `items` array under `root_field` of a response payload.
    ///
    /// Leaves the rest of the root field (including `nextToken`) untouched,
    /// so the payload keeps its original shape. Returns `false` when the
    /// root field is absent or not an object.
    pub fn write_items(data: &mut Value, root_field: &str, items: Vec<Value>) -> bool {
        match data.get_mut(root_field).and_then(Value::as_object_mut) {
            Some(field) => {
                field.insert(ITEMS_FIELD.to_string(), Value::Array(items));
                true
            }
            None => false,
        }
    }
}
