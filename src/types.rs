use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Body of `POST /v1/host/{host}/mute`
///
/// Every field is optional; unset fields are left out of the JSON body
/// entirely rather than sent as `null`.
///
/// # Example
///
/// ```rust
/// use datadog_hosts_api::MuteHostRequest;
///
/// let request = MuteHostRequest::new()
///     .with_message("kernel upgrade")
///     .with_end("1700000000")
///     .with_override(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteHostRequest {
    /// Message attached to the mute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// POSIX timestamp (as a string) at which the mute ends
    #[serde(rename = "end", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Replace the end time and message of an already muted host
    #[serde(rename = "override", default, skip_serializing_if = "Option::is_none")]
    pub override_existing: Option<bool>,
}

impl MuteHostRequest {
    /// Create an empty request (mute indefinitely, no message)
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to the mute
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Set the end time as the raw string the API expects
    pub fn with_end(mut self, end: &str) -> Self {
        self.end_time = Some(end.to_string());
        self
    }

    /// Set the end time from a timestamp, sent as POSIX seconds
    pub fn with_end_time(self, time: DateTime<Utc>) -> Self {
        self.with_end(&time.timestamp().to_string())
    }

    /// Replace the end time and message if the host is already muted
    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = Some(override_existing);
        self
    }
}

/// Acknowledgement returned by mute and unmute calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostActionResponse {
    /// Action taken by the service (e.g. `Muted`, `Unmuted`)
    #[serde(default)]
    pub action: String,
    /// Host the action applied to
    #[serde(default)]
    pub hostname: String,
    /// Mute message, when one was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of `GET /v1/hosts/totals`
///
/// "Active" hosts reported within the last hour, "up" hosts within the
/// last two hours. A count the service leaves out stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTotals {
    /// Hosts that reported within the last two hours
    #[serde(default)]
    pub total_up: Option<u64>,
    /// Hosts that reported within the last hour
    #[serde(default)]
    pub total_active: Option<u64>,
}

/// Response of `GET /v1/hosts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_returned: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_matching: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_list: Vec<HostListEntry>,
}

/// One host in a search result
///
/// The service sends `null` for several of these fields depending on the
/// host's state; those decode to the empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostListEntry {
    /// POSIX seconds of the last report
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_reported_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_muted: bool,
    /// POSIX seconds at which the mute expires; `None` when unmuted or muted indefinitely
    #[serde(default)]
    pub mute_timeout: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub apps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags_by_source: HashMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub up: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: HashMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub host_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
}

impl HostListEntry {
    /// Time of the last report, if the timestamp is in range
    pub fn last_reported_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_reported_time, 0)
    }

    /// Tags from every source, in no particular order
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.tags_by_source
            .values()
            .flat_map(|tags| tags.iter().map(String::as_str))
    }
}

/// Response of `GET /v1/validate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct ValidateResponse {
    #[serde(default)]
    pub valid: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
