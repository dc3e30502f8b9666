//! Funnel Events
//!
//! Lifecycle events the controller emits after a transition has been
//! applied. Delivery is the notifier's business: `notify` must return
//! immediately and must never fail from the caller's point of view.

use serde::{Deserialize, Serialize};

/// A tracked lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FunnelEvent {
    /// Questions loaded and the first one is on screen
    QuizStarted { question_count: usize },
    /// A recommendation was accepted for this run
    QuizCompleted {
        recommended_title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        product_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        archetype: Option<String>,
    },
    /// The user left an email at the lead-capture step
    LeadCaptured { email: String },
    /// The user followed the outbound offer link
    OfferClicked { product_id: String, link: String },
}

impl FunnelEvent {
    /// Stable event name for headers and log fields
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuizStarted { .. } => "quiz_started",
            Self::QuizCompleted { .. } => "quiz_completed",
            Self::LeadCaptured { .. } => "lead_captured",
            Self::OfferClicked { .. } => "offer_clicked",
        }
    }
}

impl std::fmt::Display for FunnelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fire-and-forget sink for funnel events.
pub trait FunnelNotifier: Send + Sync {
    /// Record an event. Must not block and must swallow its own failures.
    fn notify(&self, generation: u64, event: FunnelEvent);
}

/// Notifier that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl FunnelNotifier for NoopNotifier {
    fn notify(&self, _generation: u64, _event: FunnelEvent) {}
}
