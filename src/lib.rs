//! # Datadog Hosts API
//!
//! A Rust client library for the host endpoints of the [Datadog API](https://docs.datadoghq.com/api/latest/hosts/).
//!
//! ## Features
//!
//! - Mute and unmute all monitors of a host
//! - Count active and up hosts
//! - Search hosts with filtering, sorting and paging
//! - Credentials from code or from `DATADOG_*` environment variables
//!
//! Every call is a single HTTP request; retries and rate limiting are left
//! to the caller (see [`DatadogClient::with_client`] for plugging in
//! middleware).
//!
//! ## Example
//!
//! ```rust,no_run
//! use datadog_hosts_api::{ClientConfig, DatadogClient, HostSearch, MuteHostRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DatadogClient::from_config(ClientConfig::from_env()?)?;
//!
//!     let totals = client.get_host_totals().await?;
//!     println!("{:?} hosts up", totals.total_up);
//!
//!     let hosts = client
//!         .search_hosts(&HostSearch::new().with_filter("env:prod"))
//!         .await?;
//!     for host in &hosts.host_list {
//!         client
//!             .mute_host(&host.name, &MuteHostRequest::new().with_message("deploy"))
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod errors;
mod hosts;
mod types;

pub use client::DatadogClient;
pub use config::{ClientConfig, Credentials, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use errors::{DatadogError, Result};
pub use hosts::{HostSearch, DEFAULT_SEARCH_COUNT};
pub use types::{HostActionResponse, HostListEntry, HostSearchResponse, HostTotals, MuteHostRequest};
