//! Error types for listing-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for listing-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Check if this error came from a cancelled request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Check if this error is retryable
    ///
    /// Everything except cancellation and misconfiguration is retried; server
    /// errors count as transient for the purposes of the retry budget.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Error::Cancelled
                | Error::Config { .. }
                | Error::InvalidConfigValue { .. }
                | Error::InvalidUrl(_)
        )
    }

    /// Human-readable message suitable for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Timeout { .. } => "Request timed out. Please try again.".to_string(),
            Error::Network(e) if e.is_timeout() => {
                "Request timed out. Please try again.".to_string()
            }
            Error::Network(_) => {
                "Network error. Please check your internet connection.".to_string()
            }
            Error::HttpStatus { status, .. } => status_message(*status),
            Error::JsonParse(_) | Error::Decode { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            Error::Cancelled => "Request was cancelled.".to_string(),
            Error::Config { .. } | Error::InvalidConfigValue { .. } | Error::InvalidUrl(_) => {
                format!("Configuration problem: {self}")
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

fn status_message(status: u16) -> String {
    match status {
        400 => "Bad request.".to_string(),
        401 | 403 => "You are not authorized to view this content.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        429 => "Too many requests. Please slow down.".to_string(),
        500..=599 => format!("Server error ({status}). Please try again later."),
        _ => format!("Request failed with status {status}."),
    }
}

/// Result type alias for listing-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_value("page_size", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be greater than zero"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        assert_eq!(Error::Cancelled.to_string(), "Request cancelled");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());
        assert!(Error::http_status(404, "").is_retryable());
        assert!(Error::decode("bad body").is_retryable());

        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::invalid_value("base_url", "nope").is_retryable());
    }

    #[test]
    fn test_is_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Timeout { timeout_ms: 10 }.is_cancelled());
        assert!(!Error::http_status(500, "").is_cancelled());
    }

    #[test_case(Error::Timeout { timeout_ms: 10_000 }, "Request timed out. Please try again." ; "timeout")]
    #[test_case(Error::http_status(503, "down"), "Server error (503). Please try again later." ; "server error")]
    #[test_case(Error::http_status(404, ""), "The requested resource was not found." ; "not found")]
    #[test_case(Error::http_status(429, ""), "Too many requests. Please slow down." ; "too many requests")]
    #[test_case(Error::http_status(418, ""), "Request failed with status 418." ; "other status")]
    #[test_case(Error::decode("missing total"), "Received an unexpected response from the server." ; "decode")]
    #[test_case(Error::Other("boom".into()), "Something went wrong. Please try again." ; "other")]
    fn test_user_message(err: Error, expected: &str) {
        assert_eq!(err.user_message(), expected);
    }

    #[test]
    fn test_user_message_never_exposes_body() {
        let err = Error::http_status(500, "stack trace at line 42");
        assert!(!err.user_message().contains("stack trace"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
