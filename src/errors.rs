use std::error::Error as StdError;
use thiserror::Error;

/// Result type alias for Datadog operations
pub type Result<T> = std::result::Result<T, DatadogError>;

/// Errors that can occur when talking to the Datadog API
#[derive(Debug, Error)]
pub enum DatadogError {
    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// Failed to serialize the request body
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to decode the response body
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Datadog API returned an error response
    #[error("Datadog API error: HTTP {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body returned by Datadog
        message: String,
    },

    /// The API root cannot carry a path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Path segment that URLs cannot carry (`.` or `..`)
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// Missing or malformed configuration value
    #[error("Invalid configuration for {var}: {message}")]
    Config {
        /// Environment variable name
        var: &'static str,
        /// What was wrong with it
        message: String,
    },
}

impl DatadogError {
    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    ///
    /// The client never retries on its own; this is for callers layering
    /// their own policy on top.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let Some(reqwest_err) = StdError::source(source) {
                    if let Some(err) = reqwest_err.downcast_ref::<reqwest::Error>() {
                        return err.is_connect() || err.is_timeout();
                    }
                }
                if let reqwest_middleware::Error::Reqwest(err) = source {
                    return err.is_connect() || err.is_timeout();
                }
                false
            }
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of an API error response, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
