//! Host endpoints: mute, unmute, totals and search.
//!
//! - `POST /v1/host/{host}/mute`
//! - `POST /v1/host/{host}/unmute`
//! - `GET /v1/hosts/totals`
//! - `GET /v1/hosts`

use reqwest::Method;
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::client::DatadogClient;
use crate::errors::Result;
use crate::types::{HostActionResponse, HostSearchResponse, HostTotals, MuteHostRequest};

/// Page size the service assumes when `count` is not sent.
pub const DEFAULT_SEARCH_COUNT: u32 = 100;

// The service reads the sort field from `priority` and the sort direction
// from `sources`.
const SORT_FIELD_KEY: &str = "priority";
const SORT_DIR_KEY: &str = "sources";

/// Parameters of a host search
///
/// Only hosts that reported within the past two hours are searched, and
/// the service returns at most 100 hosts per call whatever `count` says.
///
/// # Example
///
/// ```rust
/// use datadog_hosts_api::HostSearch;
///
/// let search = HostSearch::new()
///     .with_filter("env:prod")
///     .with_count(50);
/// assert_eq!(search.encode_query(), "count=50&filter=env%3Aprod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSearch {
    /// Search string, e.g. `env:prod`
    pub filter: String,
    /// Field to sort by
    pub sort_field: String,
    /// `asc` or `desc`
    pub sort_dir: String,
    /// Offset of the first host returned
    pub start: u32,
    /// Number of hosts to return
    pub count: u32,
    /// Only hosts that reported since this POSIX timestamp
    pub from: i64,
}

impl Default for HostSearch {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort_field: String::new(),
            sort_dir: String::new(),
            start: 0,
            count: DEFAULT_SEARCH_COUNT,
            from: 0,
        }
    }
}

impl HostSearch {
    /// Search everything with service defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to hosts matching a search string (e.g. `env:prod`)
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = filter.to_string();
        self
    }

    /// Sort by `field` in direction `dir` (`asc` or `desc`)
    pub fn with_sort(mut self, field: &str, dir: &str) -> Self {
        self.sort_field = field.to_string();
        self.sort_dir = dir.to_string();
        self
    }

    /// Skip the first `start` hosts
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Number of hosts to return (the service caps this at 100)
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Only hosts that reported since this POSIX timestamp
    pub fn with_from(mut self, from: i64) -> Self {
        self.from = from;
        self
    }

    /// Query parameters to send, sorted by key
    ///
    /// Parameters still at their default (empty string, zero, or a count
    /// of 100) are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if !self.filter.is_empty() {
            pairs.push(("filter", self.filter.clone()));
        }
        if !self.sort_field.is_empty() {
            pairs.push((SORT_FIELD_KEY, self.sort_field.clone()));
        }
        if !self.sort_dir.is_empty() {
            pairs.push((SORT_DIR_KEY, self.sort_dir.clone()));
        }
        if self.start != 0 {
            pairs.push(("start", self.start.to_string()));
        }
        if self.count != DEFAULT_SEARCH_COUNT {
            pairs.push(("count", self.count.to_string()));
        }
        if self.from != 0 {
            pairs.push(("from", self.from.to_string()));
        }

        pairs.sort_by_key(|(key, _)| *key);
        pairs
    }

    /// Form-urlencoded query string, empty when nothing is set
    pub fn encode_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

impl DatadogClient {
    /// Mute all monitors for a host
    ///
    /// # Arguments
    ///
    /// * `host` - Host name as known to Datadog
    /// * `request` - Optional message, end time and override flag
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP request fails
    /// - Datadog returns a non-success status code (e.g. unknown host)
    /// - The response cannot be decoded
    /// - `host` is `.` or `..`, which cannot be sent as a path segment
    #[instrument(name = "DatadogClient::mute_host", skip_all, fields(host = %host))]
    pub async fn mute_host(
        &self,
        host: &str,
        request: &MuteHostRequest,
    ) -> Result<HostActionResponse> {
        let response: HostActionResponse = self
            .do_json_request(Method::POST, &["v1", "host", host, "mute"], Some(request), None)
            .await?;
        debug!(action = %response.action, "Host muted");
        Ok(response)
    }

    /// Unmute all monitors for a host
    #[instrument(name = "DatadogClient::unmute_host", skip_all, fields(host = %host))]
    pub async fn unmute_host(&self, host: &str) -> Result<HostActionResponse> {
        let response: HostActionResponse = self
            .do_json_request(
                Method::POST,
                &["v1", "host", host, "unmute"],
                None::<&()>,
                None,
            )
            .await?;
        debug!(action = %response.action, "Host unmuted");
        Ok(response)
    }

    /// Get the number of active and up hosts
    ///
    /// Active means the host reported in the past hour, up means it
    /// reported in the past two hours.
    #[instrument(name = "DatadogClient::get_host_totals", skip_all)]
    pub async fn get_host_totals(&self) -> Result<HostTotals> {
        self.do_json_request(Method::GET, &["v1", "hosts", "totals"], None::<&()>, None)
            .await
    }

    /// Search hosts that reported in the past two hours
    ///
    /// At most 100 hosts are returned per call; page with `start`.
    #[instrument(
        name = "DatadogClient::search_hosts",
        skip_all,
        fields(filter = %search.filter, start = search.start, count = search.count)
    )]
    pub async fn search_hosts(&self, search: &HostSearch) -> Result<HostSearchResponse> {
        let query = search.encode_query();
        let response: HostSearchResponse = self
            .do_json_request(Method::GET, &["v1", "hosts"], None::<&()>, Some(&query))
            .await?;
        debug!(
            total_returned = response.total_returned,
            total_matching = response.total_matching,
            "Host search completed"
        );
        Ok(response)
    }
}
