//! HTTP client module
//!
//! Fetches single pages from the listing and search endpoints.
//!
//! # Features
//!
//! - **Endpoint Selection**: search endpoint when a query is present
//! - **Timeout**: fixed per-request timeout, reported as `Error::Timeout`
//! - **Cancellation**: `CancellationToken` aware, reported as `Error::Cancelled`
//! - **Rate Limiting**: optional token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
