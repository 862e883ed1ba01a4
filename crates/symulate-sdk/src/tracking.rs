//! Fire-and-forget usage tracking.
//!
//! Every faker-path generation reports usage to the tracking endpoint as a
//! detached task. Failures are logged at debug and never reach the caller.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use symulate_core::SymulateConfig;

#[derive(Serialize)]
struct TrackingBody {
    mode: String,
    endpoint: String,
    cached: bool,
    #[serde(rename = "trackOnly")]
    track_only: bool,
}

/// Client for the usage-tracking endpoint.
#[derive(Clone)]
pub struct UsageTracker {
    client: Option<Client>,
    tracking_url: String,
    api_key: Option<String>,
}

impl UsageTracker {
    /// Build from the SDK-wide configuration.
    pub fn from_config(config: &SymulateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .ok();
        Self {
            client,
            tracking_url: config.tracking_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// A tracker that records nothing.
    pub fn disabled() -> Self {
        Self {
            client: None,
            tracking_url: String::new(),
            api_key: None,
        }
    }

    /// Record one generation. Detached and best-effort: the call returns
    /// immediately and the response is ignored.
    pub fn record(&self, mode: &str, endpoint: &str, cached: bool) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let url = self.tracking_url.clone();
        let api_key = self.api_key.clone();
        let body = TrackingBody {
            mode: mode.to_string(),
            endpoint: endpoint.to_string(),
            cached,
            track_only: true,
        };

        tokio::spawn(async move {
            let mut request = client.post(&url).json(&body);
            if let Some(key) = &api_key {
                request = request.header("x-api-key", key);
            }
            if let Err(e) = request.send().await {
                debug!(error = %e, "Usage tracking failed");
            }
        });
    }
}
