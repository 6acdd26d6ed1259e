//! Client configuration: API credentials, API root and request timeout.
//!
//! Values can be given explicitly or read from the environment:
//!
//! - `DATADOG_API_KEY` (required)
//! - `DATADOG_APP_KEY` (required)
//! - `DATADOG_HOST` (optional API root, e.g. `https://api.datadoghq.eu/api/`)
//! - `DATADOG_TIMEOUT_SECS` (optional, defaults to 30)
//!
//! Empty or whitespace-only variables are treated as unset.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::errors::{DatadogError, Result};

/// Default API root for the US1 site.
pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com/api/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VAR: &str = "DATADOG_API_KEY";
const APP_KEY_VAR: &str = "DATADOG_APP_KEY";
const HOST_VAR: &str = "DATADOG_HOST";
const TIMEOUT_VAR: &str = "DATADOG_TIMEOUT_SECS";

/// API and application key pair sent with every request.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
    app_key: SecretString,
}

impl Credentials {
    /// Create credentials from an API key and an application key
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            app_key: SecretString::from(app_key.into()),
        }
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(crate) fn app_key(&self) -> &str {
        self.app_key.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}

/// Everything needed to build a [`DatadogClient`](crate::DatadogClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub api_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for the default API root and timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: default_api_url(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DatadogError::Config`] if a key is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let api_key = var(API_KEY_VAR).ok_or_else(|| missing(API_KEY_VAR))?;
        let app_key = var(APP_KEY_VAR).ok_or_else(|| missing(APP_KEY_VAR))?;

        let mut config = Self::new(Credentials::new(api_key, app_key));

        if let Some(host) = var(HOST_VAR) {
            config.api_url = parse_api_url(host.trim()).map_err(|e| DatadogError::Config {
                var: HOST_VAR,
                message: e.to_string(),
            })?;
        }
        if let Some(timeout) = var(TIMEOUT_VAR) {
            let secs: u64 = timeout.trim().parse().map_err(|_| DatadogError::Config {
                var: TIMEOUT_VAR,
                message: "must be a number of seconds".to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Use a different API root (another Datadog site or a proxy)
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn missing(var: &'static str) -> DatadogError {
    DatadogError::Config {
        var,
        message: "not set".to_string(),
    }
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("Valid default API URL")
}

/// Accepts a bare site (`https://api.datadoghq.eu`) or a full API root.
fn parse_api_url(raw: &str) -> std::result::Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if url.path() == "/" {
        url.set_path("/api/");
    }
    Ok(url)
}
