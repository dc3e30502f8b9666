//! Tracking Types
//!
//! The payload delivered to tracking channels and the channel error type.

use serde::{Deserialize, Serialize};

use quiz_funnel_core::FunnelEvent;

/// One tracked event, as delivered to every channel.
///
/// Serialized flat: the event's own `event` tag and fields sit next to
/// the envelope fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingPayload {
    /// Identifies one controller (one terminal session)
    pub session_id: String,
    /// Quiz run within the session; bumped on restart
    pub generation: u64,
    /// RFC 3339
    pub timestamp: String,
    #[serde(flatten)]
    pub event: FunnelEvent,
}

impl TrackingPayload {
    pub fn new(session_id: impl Into<String>, generation: u64, event: FunnelEvent) -> Self {
        Self {
            session_id: session_id.into(),
            generation,
            timestamp: chrono::Utc::now().to_rfc3339(),
            event,
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event.name()
    }
}

/// Tracking delivery errors
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<reqwest::Error> for TrackingError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for TrackingError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
