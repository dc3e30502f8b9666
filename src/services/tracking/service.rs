//! Tracking Service
//!
//! `FunnelNotifier` implementation that fans each event out to the
//! configured channels on a background tokio task. Deliveries are tracked
//! so the process can wait for them before exiting.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};
use uuid::Uuid;

use quiz_funnel_core::{FunnelEvent, FunnelNotifier};

use super::channels::TrackingChannel;
use super::types::TrackingPayload;

/// Fire-and-forget event delivery
pub struct TrackingService {
    session_id: String,
    channels: Arc<Vec<Arc<dyn TrackingChannel>>>,
    deliveries: TaskTracker,
}

impl TrackingService {
    /// New service with a fresh session id
    pub fn new(channels: Vec<Arc<dyn TrackingChannel>>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            channels: Arc::new(channels),
            deliveries: TaskTracker::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Wait up to `timeout` for in-flight deliveries.
    ///
    /// Returns `false` if some were still pending when the timeout hit.
    /// Events notified afterwards are still delivered.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let pending = self.deliveries.len();
        self.deliveries.close();
        let finished = tokio::time::timeout(timeout, self.deliveries.wait())
            .await
            .is_ok();
        self.deliveries.reopen();

        if finished {
            debug!(pending, "tracking deliveries flushed");
        } else {
            warn!(
                remaining = self.deliveries.len(),
                "tracking flush timed out, pending events dropped"
            );
        }
        finished
    }

    /// Deliver to every channel, logging failures. Returns how many failed.
    pub async fn dispatch(
        channels: &[Arc<dyn TrackingChannel>],
        payload: &TrackingPayload,
    ) -> usize {
        let mut failures = 0;
        for channel in channels {
            if let Err(e) = channel.send(payload).await {
                failures += 1;
                warn!(
                    channel = channel.name(),
                    event = payload.event_name(),
                    error = %e,
                    "tracking delivery failed"
                );
            }
        }
        failures
    }
}

impl FunnelNotifier for TrackingService {
    fn notify(&self, generation: u64, event: FunnelEvent) {
        if self.channels.is_empty() {
            return;
        }

        let payload = TrackingPayload::new(self.session_id.clone(), generation, event);
        let channels = Arc::clone(&self.channels);

        match Handle::try_current() {
            Ok(handle) => {
                self.deliveries.spawn_on(
                    async move {
                        let failures = Self::dispatch(&channels, &payload).await;
                        debug!(
                            event = payload.event_name(),
                            delivered = channels.len() - failures,
                            failures,
                            "tracking event dispatched"
                        );
                    },
                    &handle,
                );
            }
            Err(_) => {
                warn!(
                    event = payload.event_name(),
                    "no async runtime available, tracking event dropped"
                );
            }
        }
    }
}
