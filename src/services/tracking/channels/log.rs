//! Log Tracking Channel

use async_trait::async_trait;

use super::TrackingChannel;
use crate::services::tracking::types::{TrackingError, TrackingPayload};

/// Emits each payload as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrackingChannel;

#[async_trait]
impl TrackingChannel for LogTrackingChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, payload: &TrackingPayload) -> Result<(), TrackingError> {
        let details = serde_json::to_string(&payload.event)?;
        tracing::info!(
            target: "quiz_funnel::tracking",
            event = payload.event_name(),
            session_id = %payload.session_id,
            generation = payload.generation,
            details = %details,
            "funnel event"
        );
        Ok(())
    }
}
