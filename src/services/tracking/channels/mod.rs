//! Tracking Channels
//!
//! Destinations a tracking payload can be delivered to.

use async_trait::async_trait;

use super::types::{TrackingError, TrackingPayload};

pub mod http;
pub mod log;

pub use self::http::HttpTrackingChannel;
pub use self::log::LogTrackingChannel;

/// Trait all tracking channels implement.
#[async_trait]
pub trait TrackingChannel: Send + Sync {
    /// Short name used in log fields
    fn name(&self) -> &'static str;

    /// Deliver one payload. Callers log failures; nothing is retried.
    async fn send(&self, payload: &TrackingPayload) -> Result<(), TrackingError>;
}
