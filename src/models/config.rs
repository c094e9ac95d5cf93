//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
/// Timings of the enquiry widget, in milliseconds.
pub struct EngagementConfig {
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,
    #[serde(default = "default_reopen_delay_ms")]
    pub reopen_delay_ms: u64,
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
}

fn default_open_delay_ms() -> u64 {
    60_000
}

fn default_reopen_delay_ms() -> u64 {
    60_000
}

fn default_success_display_ms() -> u64 {
    4_000
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: default_open_delay_ms(),
            reopen_delay_ms: default_reopen_delay_ms(),
            success_display_ms: default_success_display_ms(),
        }
    }
}

impl EngagementConfig {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn reopen_delay(&self) -> Duration {
        Duration::from_millis(self.reopen_delay_ms)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the API client and the widgets.
pub struct PortalConfig {
    /// Root of the REST API, e.g. `https://cms.example.com/api`.
    pub api_base_url: String,
    /// Host prepended to relative upload URLs.
    pub media_base_url: String,
    /// File backing the persisted `formSubmitted` flag.
    pub flag_store_path: String,
    /// No timeout when absent.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub admin_identifier: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}
