//! Token-following executor for paginated list queries.
//!
//! The backend may split one logical list result across pages, each carrying
//! an opaque continuation token. [`ScanExecutor::scan`] follows tokens until
//! the backend returns a terminal page and hands back a single response that
//! is shape-identical to a one-page response but carries every item.

use std::sync::Arc;

use serde_json::Value;
use tidepool_core::{GraphQlResponse, Page, ScanQuery};
use tracing::debug;

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::graphql::GraphQlTransport;

/// Pagination variable naming the per-page size.
const LIMIT_VARIABLE: &str = "limit";

/// Pagination variable carrying the continuation token.
const NEXT_TOKEN_VARIABLE: &str = "nextToken";

/// Executes one logical list query across however many pages the backend
/// answers with.
///
/// Calls are strictly sequential: each page is awaited before the next token
/// is followed. No caching, no re-sorting — items accumulate in backend page
/// order.
pub struct ScanExecutor {
    transport: Arc<dyn GraphQlTransport>,
    default_page_limit: u32,
    max_pages: u32,
}

impl ScanExecutor {
    /// Creates an executor over the given transport with the configured
    /// page-size default and page cap.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQlTransport>, config: &AccessConfig) -> Self {
        Self {
            transport,
            default_page_limit: config.scan_page_limit,
            max_pages: config.max_scan_pages,
        }
    }

    /// Runs the scan and returns the last page's response with its root
    /// field's `items` replaced by the full accumulated set.
    ///
    /// `page_limit` overrides the configured per-page size. One backend call
    /// is issued per page; the previous page's token is passed verbatim into
    /// the next call, starting from an explicit null. With a page cap
    /// configured, a token stream that outlives the cap fails with
    /// [`AccessError::PageCapExceeded`] instead of looping forever.
    pub async fn scan(
        &self,
        query: &ScanQuery,
        page_limit: Option<u32>,
    ) -> Result<GraphQlResponse> {
        let limit = page_limit.unwrap_or(self.default_page_limit);
        let mut all_items: Vec<Value> = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            if self.max_pages > 0 && pages >= self.max_pages {
                return Err(AccessError::PageCapExceeded { pages });
            }

            let request = query
                .request
                .clone()
                .with_variable(LIMIT_VARIABLE, Value::from(limit))
                .with_variable(
                    NEXT_TOKEN_VARIABLE,
                    next_token.take().map_or(Value::Null, Value::String),
                );

            let mut response = self.transport.execute(&request).await?;
            pages += 1;

            let page = Page::read(&response.data, &query.root_field).ok_or_else(|| {
                AccessError::shape(format!(
                    "scan response is missing root field `{}`",
                    query.root_field
                ))
            })?;
            debug!(
                root_field = %query.root_field,
                page = pages,
                items = page.items.len(),
                more = page.next_token.is_some(),
                "scan page fetched"
            );

            all_items.extend(page.items);
            next_token = page.next_token;

            if next_token.is_none() {
                if !Page::write_items(&mut response.data, &query.root_field, all_items) {
                    return Err(AccessError::shape(format!(
                        "scan root field `{}` is not an object",
                        query.root_field
                    )));
                }
                return Ok(response);
            }
        }
    }
}
