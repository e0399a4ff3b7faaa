//! Fetch client for the listing and search endpoints
//!
//! Provides an HTTP client that handles:
//! - Endpoint selection (listing vs. search) by presence of a query
//! - A fixed request timeout, independent of cancellation
//! - Cancellation through a `CancellationToken`
//! - Optional rate limiting
//! - Error classification so callers can tell cancellation from failure

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::{ListingResponse, PageRequest, PageResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Path of the plain listing endpoint
    pub listing_path: String,
    /// Path of the search endpoint
    pub search_path: String,
    /// Query parameter name for the search term
    pub query_param: String,
    /// Query parameter name for the page size
    pub limit_param: String,
    /// Query parameter name for the offset
    pub offset_param: String,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            listing_path: "/products".to_string(),
            search_path: "/products/search".to_string(),
            query_param: "q".to_string(),
            limit_param: "limit".to_string(),
            offset_param: "skip".to_string(),
            timeout: Duration::from_secs(10),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("listing-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the listing endpoint path
    pub fn listing_path(mut self, path: impl Into<String>) -> Self {
        self.config.listing_path = path.into();
        self
    }

    /// Set the search endpoint path
    pub fn search_path(mut self, path: impl Into<String>) -> Self {
        self.config.search_path = path.into();
        self
    }

    /// Set the query, limit and offset parameter names
    pub fn params(
        mut self,
        query: impl Into<String>,
        limit: impl Into<String>,
        offset: impl Into<String>,
    ) -> Self {
        self.config.query_param = query.into();
        self.config.limit_param = limit.into();
        self.config.offset_param = offset.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client that fetches pages of a listing
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Fetch one page
    ///
    /// When `cancel` fires before the response is fully read the call resolves
    /// promptly with [`Error::Cancelled`], whatever the network is doing.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: &PageRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<PageResult<T>> {
        let Some(token) = cancel else {
            return self.send_page(request).await;
        };

        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("Request cancelled: offset={} query={:?}", request.offset, request.query);
                Err(Error::Cancelled)
            }
            result = self.send_page(request) => result,
        }
    }

    async fn send_page<T: DeserializeOwned>(&self, request: &PageRequest) -> Result<PageResult<T>> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.page_url(request)?;
        let mut req = self.client.get(url.clone()).timeout(self.config.timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let response = check_status(response).await?;
        let body = response.text().await.map_err(|e| self.classify(e))?;

        let parsed: ListingResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::decode(format!("{url}: {e}")))?;
        debug!(
            "Request succeeded: GET {} ({} items, total {})",
            url,
            parsed.items.len(),
            parsed.total
        );

        let mut items = parsed.items;
        let limit = request.limit as usize;
        if items.len() > limit {
            warn!(
                "Server returned {} items for limit {}, truncating",
                items.len(),
                limit
            );
            items.truncate(limit);
        }

        Ok(PageResult::new(
            items,
            parsed.total,
            request.offset,
            request.limit,
        ))
    }

    /// Build the URL for a page request
    pub fn page_url(&self, request: &PageRequest) -> Result<Url> {
        let path = match request.query {
            Some(_) => &self.config.search_path,
            None => &self.config.listing_path,
        };
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref q) = request.query {
                pairs.append_pair(&self.config.query_param, q);
            }
            pairs.append_pair(&self.config.limit_param, &request.limit.to_string());
            pairs.append_pair(&self.config.offset_param, &request.offset.to_string());
        }

        Ok(url)
    }

    /// Map a transport error onto the crate taxonomy
    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Network(e)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Turn non-2xx responses into [`Error::HttpStatus`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::http_status(status.as_u16(), body))
}
