//! HTTP Tracking Channel
//!
//! POSTs each payload as JSON to a collector URL.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use quiz_funnel_core::ProxyConfig;
use quiz_funnel_llm::build_http_client;

use super::TrackingChannel;
use crate::services::tracking::types::{TrackingError, TrackingPayload};

/// Timeout for a single delivery
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Generic HTTP collector.
///
/// Headers included:
/// - `Content-Type: application/json`
/// - `X-Funnel-Event: <event name>`
pub struct HttpTrackingChannel {
    client: reqwest::Client,
    url: Url,
}

impl HttpTrackingChannel {
    pub fn new(url: &str, proxy: Option<&ProxyConfig>) -> Result<Self, TrackingError> {
        let url = Url::parse(url)
            .map_err(|e| TrackingError::InvalidConfig(format!("invalid collector URL {}: {}", url, e)))?;
        let client = build_http_client(proxy, DELIVERY_TIMEOUT)
            .map_err(|e| TrackingError::InvalidConfig(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl TrackingChannel for HttpTrackingChannel {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, payload: &TrackingPayload) -> Result<(), TrackingError> {
        let body = serde_json::to_string(payload)?;

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .header("X-Funnel-Event", payload.event_name())
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TrackingError::HttpError(format!(
                "Tracking endpoint returned HTTP {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
