//! HTTP transport with retry and backoff
//!
//! Provides the transport collaborator used by the Lever API client:
//! - Automatic retries with configurable backoff
//! - Retryable status classification (429, 500, 502, 503, 504)
//! - Basic authentication
//! - Response body parsing

mod client;

pub use client::{
    BackoffType, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig,
};
