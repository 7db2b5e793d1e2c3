//! Lever API client and page stream

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Production Lever API base URL
pub const BASE_URL: &str = "https://api.lever.co/v1";

/// Fixed page size for paginated endpoints
pub const PAGE_LIMIT: u32 = 50;

/// One page of a Lever list response
#[derive(Debug, Deserialize)]
struct PageBody {
    /// Raw records; the client never inspects their contents
    data: Option<Vec<Value>>,
    /// Opaque continuation cursor, absent on the last page
    next: Option<String>,
}

/// Client for the Lever REST API
///
/// Authenticates with basic auth: the API token as username, empty password.
/// Retry and backoff for transient failures live in the underlying
/// [`HttpClient`]; this client follows cursors and nothing else.
#[derive(Debug, Clone)]
pub struct LeverClient {
    http: HttpClient,
}

impl LeverClient {
    /// Create a client against the production API
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, BASE_URL)
    }

    /// Create a client against a custom base URL (used in tests)
    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Result<Self> {
        let config = HttpClientConfig::builder()
            .base_url(base_url)
            .basic_auth(token, "")
            .build();
        Ok(Self {
            http: HttpClient::with_config(config)?,
        })
    }

    /// Start a lazy page sequence for a paginated endpoint
    pub fn pages(&self, endpoint: impl Into<String>, params: HashMap<String, String>) -> PageStream {
        PageStream {
            client: self.clone(),
            endpoint: endpoint.into(),
            params,
            offset: None,
            done: false,
            pages_fetched: 0,
        }
    }

    /// Fetch a non-paginated endpoint, returning the `data` array directly
    pub async fn fetch_all(&self, endpoint: &str) -> Result<Vec<Value>> {
        let body: PageBody = self
            .http
            .get_json_with_config(endpoint, RequestConfig::new())
            .await?;
        body.data
            .ok_or_else(|| Error::response_shape(endpoint, "response has no 'data' array"))
    }
}

/// Lazy, finite sequence of pages from one paginated endpoint
///
/// Purely a cursor-following loop: each call to [`PageStream::next_page`]
/// issues one request and yields its `data` array, until a response arrives
/// without a `next` cursor.
#[derive(Debug)]
pub struct PageStream {
    client: LeverClient,
    endpoint: String,
    params: HashMap<String, String>,
    offset: Option<String>,
    done: bool,
    pages_fetched: usize,
}

impl PageStream {
    /// Fetch the next page, or `None` once the sequence has terminated
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>> {
        if self.done {
            return Ok(None);
        }

        let mut request = RequestConfig::new().query("limit", PAGE_LIMIT.to_string());
        for (key, value) in &self.params {
            request = request.query(key, value);
        }
        if let Some(offset) = &self.offset {
            request = request.query("offset", offset);
        }

        let body: PageBody = self
            .client
            .http
            .get_json_with_config(&self.endpoint, request)
            .await?;

        let records = body
            .data
            .ok_or_else(|| Error::response_shape(&self.endpoint, "response has no 'data' array"))?;

        self.pages_fetched += 1;
        debug!(
            "Page {}: fetched {} records from {}",
            self.pages_fetched,
            records.len(),
            self.endpoint
        );

        match body.next {
            Some(cursor) => self.offset = Some(cursor),
            None => self.done = true,
        }

        Ok(Some(records))
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
