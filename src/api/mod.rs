//! Lever API client
//!
//! Cursor-based pagination against the Lever REST API
//! (`https://api.lever.co/v1/`).
//!
//! # Pagination protocol
//!
//! Every paginated request sets `limit=50`. The first request omits the
//! `offset` parameter; each response body is `{"data": [...], "next": ...}`
//! and when `next` is present its value is copied verbatim into the `offset`
//! parameter of the next request. When `next` is absent the sequence ends
//! after the current page.
//!
//! Child resources (`/{parent}/resumes`, `/{parent}/applications`) are not
//! paginated: [`LeverClient::fetch_all`] issues exactly one request and
//! returns the `data` array directly.

mod client;

pub use client::{LeverClient, PageStream, BASE_URL, PAGE_LIMIT};
