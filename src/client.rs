use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, Credentials};
use crate::errors::{DatadogError, Result};
use crate::types::ValidateResponse;

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Client for the Datadog REST API
///
/// Holds the HTTP client, credentials and API root. Cloning is cheap and
/// clones share the underlying connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use datadog_hosts_api::{Credentials, DatadogClient, MuteHostRequest};
/// use url::Url;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DatadogClient::new(
///         Credentials::new("api-key", "app-key"),
///         Url::parse("https://api.datadoghq.com/api/")?,
///         Duration::from_secs(10),
///     )?;
///
///     let request = MuteHostRequest::new().with_message("maintenance");
///     client.mute_host("web-01", &request).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DatadogClient {
    client: ClientWithMiddleware,
    credentials: Credentials,
    api_url: Url,
}

impl DatadogClient {
    /// Create a new Datadog client
    ///
    /// # Arguments
    ///
    /// * `credentials` - API and application key
    /// * `api_url` - API root (e.g., `https://api.datadoghq.com/api/`)
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Credentials, api_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DatadogError::BuildHttpClient)?;

        let client = ClientBuilder::new(client).build();

        Ok(Self {
            client,
            credentials,
            api_url,
        })
    }

    /// Create a client from a [`ClientConfig`]
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(config.credentials, config.api_url, config.timeout)
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (retry, logging, etc.)
    pub fn with_client(client: ClientWithMiddleware, credentials: Credentials, api_url: Url) -> Self {
        Self {
            client,
            credentials,
            api_url,
        }
    }

    /// Get the API root
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Check that the configured API key is accepted
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. An invalid key is reported by
    /// Datadog as HTTP 403 and surfaces as [`DatadogError::Api`].
    #[instrument(name = "DatadogClient::validate", skip_all)]
    pub async fn validate(&self) -> Result<bool> {
        let response: ValidateResponse = self
            .do_json_request(Method::GET, &["v1", "validate"], None::<&()>, None)
            .await?;
        Ok(response.valid)
    }

    /// Build the URL for `segments` under the API root
    ///
    /// Each segment is percent-encoded on its own, so a value such as a
    /// host name always stays a single path segment. URLs cannot carry a
    /// `.` or `..` segment in any encoding, so those are refused instead of
    /// being dropped from the path.
    pub(crate) fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(DatadogError::InvalidPathSegment(segment.to_string()));
        }

        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| DatadogError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    /// Send a single request and decode the JSON response
    ///
    /// The body is only attached when one is given. Non-success statuses
    /// become [`DatadogError::Api`] carrying the response text.
    pub(crate) async fn do_json_request<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        query: Option<&str>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, query)?;

        debug!(method = %method, url = %url, "Sending Datadog request");

        let mut request = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .header(APP_KEY_HEADER, self.credentials.app_key())
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            let body = serde_json::to_vec(body).map_err(DatadogError::Serialize)?;
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(DatadogError::Request)?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DatadogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DatadogError::Request(e.into()))?;

        let decoded = serde_json::from_slice(&bytes).map_err(DatadogError::Decode)?;

        debug!(status = status.as_u16(), "Datadog request succeeded");
        Ok(decoded)
    }
}

impl std::fmt::Debug for DatadogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogClient")
            .field("credentials", &self.credentials)
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_client(mock_server: &MockServer) -> DatadogClient {
        DatadogClient::new(
            Credentials::new("test-api-key", "test-app-key"),
            Url::parse(&format!("{}/api/", mock_server.uri())).unwrap(),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_validate_sends_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/validate"))
            .and(header("DD-API-KEY", "test-api-key"))
            .and(header("DD-APPLICATION-KEY", "test-app-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"valid":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert!(client.validate().await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_forbidden() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/validate"))
            .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"errors":["Forbidden"]}"#))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.validate().await;

        if let Err(DatadogError::Api { status, message }) = result {
            assert_eq!(status, 403);
            assert_eq!(message, r#"{"errors":["Forbidden"]}"#);
        } else {
            panic!("Expected Api error");
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let result = client.validate().await;
        assert!(matches!(result, Err(DatadogError::Decode(_))));
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = DatadogClient::new(
            Credentials::new("a", "b"),
            Url::parse("https://api.datadoghq.com/api/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();

        let url = client.endpoint(&["v1", "host", "web-01", "mute"], None).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/host/web-01/mute");

        let url = client.endpoint(&["v1", "host", "a/b c", "mute"], None).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/host/a%2Fb%20c/mute");

        let url = client.endpoint(&["v1", "host", "", "mute"], None).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/host//mute");

        let url = client.endpoint(&["v1", "host", "...", "mute"], None).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/host/.../mute");

        let url = client.endpoint(&["v1", "hosts"], Some("")).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/hosts");

        let url = client.endpoint(&["v1", "hosts"], Some("count=5")).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.com/api/v1/hosts?count=5");
    }

    #[test]
    fn test_endpoint_refuses_dot_segments() {
        let client = DatadogClient::new(
            Credentials::new("a", "b"),
            Url::parse("https://api.datadoghq.com/api/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();

        for host in [".", ".."] {
            let result = client.endpoint(&["v1", "host", host, "mute"], None);
            match result {
                Err(DatadogError::InvalidPathSegment(segment)) => assert_eq!(segment, host),
                other => panic!("Expected InvalidPathSegment for {host:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable_request_error() {
        // Nothing listens on port 1.
        let client = DatadogClient::new(
            Credentials::new("a", "b"),
            Url::parse("http://127.0.0.1:1/api/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();

        let error = client.validate().await.unwrap_err();
        assert!(matches!(error, DatadogError::Request(_)), "got {error:?}");
        assert!(error.is_retryable());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client = DatadogClient::new(
            Credentials::new("a", "b"),
            Url::parse("https://api.datadoghq.eu/api").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();

        let url = client.endpoint(&["v1", "hosts", "totals"], None).unwrap();
        assert_eq!(url.as_str(), "https://api.datadoghq.eu/api/v1/hosts/totals");
    }

    #[test]
    fn test_api_url_getter() {
        let url = Url::parse("https://api.datadoghq.com/api/").unwrap();
        let client =
            DatadogClient::new(Credentials::new("a", "b"), url.clone(), Duration::from_secs(10))
                .unwrap();
        assert_eq!(client.api_url(), &url);
    }

    #[test]
    fn test_debug_hides_keys() {
        let client = DatadogClient::new(
            Credentials::new("secret-api", "secret-app"),
            Url::parse("https://api.datadoghq.com/api/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-api"));
        assert!(debug.contains("api.datadoghq.com"));
    }
}
