//! Configuration for the pager
//!
//! `PagerConfig` is the serialized form (YAML or JSON). It is turned into the
//! runtime `HttpClientConfig` and `RetryPolicy` used by the fetch client and
//! the controller.

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::ControllerConfig;
use crate::retry::RetryPolicy;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the plain listing endpoint
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Path of the search endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Query parameter carrying the search term
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// Query parameter carrying the page size
    #[serde(default = "default_limit_param")]
    pub limit_param: String,

    /// Query parameter carrying the offset
    #[serde(default = "default_offset_param")]
    pub offset_param: String,

    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Quiet period before a search term is applied
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Optional client-side rate limiting
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            search_path: default_search_path(),
            query_param: default_query_param(),
            limit_param: default_limit_param(),
            offset_param: default_offset_param(),
            page_size: default_page_size(),
            timeout_ms: default_timeout_ms(),
            debounce_ms: default_debounce_ms(),
            retry: RetryConfig::default(),
            rate_limit: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_listing_path() -> String {
    "/products".to_string()
}

fn default_search_path() -> String {
    "/products/search".to_string()
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_offset_param() -> String {
    "skip".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

impl PagerConfig {
    /// Load config from a YAML or JSON file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let invalid = || format!("Invalid config file {}", path.display());
        let config: Self = if is_json {
            serde_json::from_str(&contents).with_context(invalid)?
        } else {
            serde_yaml::from_str(&contents).with_context(invalid)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make paging impossible
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value(
                "page_size",
                "must be greater than zero",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::invalid_value(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if self.retry.max_delay_ms < self.retry.delay_ms {
            return Err(Error::invalid_value(
                "retry.max_delay_ms",
                format!("must be at least retry.delay_ms ({})", self.retry.delay_ms),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::invalid_value("timeout_ms", "must be greater than zero"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        Ok(())
    }

    /// Debounce delay as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Build the HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .listing_path(&self.listing_path)
            .search_path(&self.search_path)
            .params(&self.query_param, &self.limit_param, &self.offset_param)
            .timeout(Duration::from_millis(self.timeout_ms));

        builder = match &self.rate_limit {
            Some(rl) => builder.rate_limit(RateLimiterConfig::new(
                rl.requests_per_second,
                rl.burst_size,
            )),
            None => builder.no_rate_limit(),
        };

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Build the retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.retry.max_attempts)
            .backoff(
                self.retry.backoff,
                Duration::from_millis(self.retry.delay_ms),
                Duration::from_millis(self.retry.max_delay_ms),
            )
            .build()
    }

    /// Build the controller configuration, starting from `query`
    pub fn controller_config(&self, query: Option<&str>) -> ControllerConfig {
        let mut config =
            ControllerConfig::with_page_size(self.page_size).retry(self.retry_policy());
        if let Some(q) = query {
            config = config.query(q);
        }
        config
    }
}

// ============================================================================
// Retry / Rate Limit
// ============================================================================

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound on the delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff: BackoffType::default(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second
    pub requests_per_second: u32,

    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}
