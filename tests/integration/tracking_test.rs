//! Funnel Tracking Integration Tests
//!
//! Checks which events the controller emits for a run, and that broken
//! tracking channels never change the quiz outcome.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use quiz_funnel::services::quiz::{ControllerOptions, QuizController};
use quiz_funnel::services::tracking::{
    TrackingChannel, TrackingError, TrackingPayload, TrackingService,
};
use quiz_funnel_core::{
    Catalog, FetchError, FunnelEvent, FunnelNotifier, Question, QuizOption, QuizState,
    Recommendation, RecommendationClient, RecommendationError, TranscriptEntry,
};

// ============================================================================
// Helpers
// ============================================================================

struct InstantClient;

#[async_trait]
impl RecommendationClient for InstantClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        Ok(vec![
            Question::new("Goal?", vec![QuizOption::titled("Lose weight")]),
            Question::new("Cooking?", vec![QuizOption::titled("Quick meals")]),
        ])
    }

    async fn request_recommendation(
        &self,
        _transcript: &[TranscriptEntry],
    ) -> Result<Recommendation, RecommendationError> {
        Ok(Recommendation {
            recommended_product_title: "21-Day Keto Transformation Guide".to_string(),
            reason: "Structure wins.".to_string(),
            archetype: Some("The Planner".to_string()),
        })
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<(u64, FunnelEvent)>>,
}

impl FunnelNotifier for RecordingNotifier {
    fn notify(&self, generation: u64, event: FunnelEvent) {
        self.events.lock().unwrap().push((generation, event));
    }
}

struct BrokenChannel;

#[async_trait]
impl TrackingChannel for BrokenChannel {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn send(&self, _payload: &TrackingPayload) -> Result<(), TrackingError> {
        Err(TrackingError::HttpError("503 Service Unavailable".to_string()))
    }
}

struct ForwardingChannel {
    tx: mpsc::UnboundedSender<TrackingPayload>,
}

#[async_trait]
impl TrackingChannel for ForwardingChannel {
    fn name(&self) -> &'static str {
        "forwarding"
    }

    async fn send(&self, payload: &TrackingPayload) -> Result<(), TrackingError> {
        let _ = self.tx.send(payload.clone());
        Ok(())
    }
}

fn controller(notifier: Arc<dyn FunnelNotifier>, lead_capture: bool) -> QuizController {
    QuizController::new(
        Arc::new(InstantClient),
        notifier,
        Catalog::default(),
        ControllerOptions {
            min_analyzing: Duration::ZERO,
            lead_capture,
        },
    )
}

async fn finish_run(ctrl: &QuizController) {
    let mut snapshot = ctrl.start_quiz().await.unwrap();
    while snapshot.state == QuizState::InProgress {
        snapshot = ctrl.submit_option(0).await.unwrap();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_events_for_a_full_run() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = controller(notifier.clone(), true);

    finish_run(&ctrl).await;
    ctrl.submit_email("reader@example.com").await.unwrap();
    let link = ctrl.record_offer_click().await.unwrap();

    let events = notifier.events.lock().unwrap();
    let names: Vec<&str> = events.iter().map(|(_, e)| e.name()).collect();
    assert_eq!(
        names,
        vec!["quiz_started", "quiz_completed", "lead_captured", "offer_clicked"]
    );
    assert!(events.iter().all(|(generation, _)| *generation == 0));

    assert_eq!(
        events[0].1,
        FunnelEvent::QuizStarted { question_count: 2 }
    );
    assert_eq!(
        events[1].1,
        FunnelEvent::QuizCompleted {
            recommended_title: "21-Day Keto Transformation Guide".to_string(),
            product_id: Some("keto-transformation-21".to_string()),
            archetype: Some("The Planner".to_string()),
        }
    );
    assert_eq!(
        events[3].1,
        FunnelEvent::OfferClicked {
            product_id: "keto-transformation-21".to_string(),
            link,
        }
    );
}

#[tokio::test]
async fn test_invalid_email_emits_nothing() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = controller(notifier.clone(), true);

    finish_run(&ctrl).await;
    ctrl.submit_email("nope").await.unwrap();

    let events = notifier.events.lock().unwrap();
    assert!(events.iter().all(|(_, e)| e.name() != "lead_captured"));
}

#[tokio::test]
async fn test_events_after_restart_carry_new_generation() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ctrl = controller(notifier.clone(), false);

    finish_run(&ctrl).await;
    ctrl.restart().await;
    ctrl.start_quiz().await.unwrap();

    let events = notifier.events.lock().unwrap();
    let (generation, event) = events.last().unwrap();
    assert_eq!(*generation, 1);
    assert_eq!(event.name(), "quiz_started");
}

#[tokio::test]
async fn test_broken_channel_does_not_change_outcome() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let channels: Vec<Arc<dyn TrackingChannel>> =
        vec![Arc::new(BrokenChannel), Arc::new(ForwardingChannel { tx })];
    let service = TrackingService::new(channels);
    let session_id = service.session_id().to_string();
    let ctrl = controller(Arc::new(service), false);

    finish_run(&ctrl).await;
    let snapshot = ctrl.snapshot().await;
    assert_eq!(snapshot.state, QuizState::Finished);
    assert!(snapshot.error.is_none());

    let mut delivered = Vec::new();
    while delivered.len() < 2 {
        let payload = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        delivered.push(payload);
    }
    assert!(delivered.iter().all(|p| p.session_id == session_id));
    let mut names: Vec<&str> = delivered.iter().map(|p| p.event_name()).collect();
    names.sort();
    assert_eq!(names, vec!["quiz_completed", "quiz_started"]);
}

#[tokio::test]
async fn test_offer_click_delivered_after_flush() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let channels: Vec<Arc<dyn TrackingChannel>> = vec![Arc::new(ForwardingChannel { tx })];
    let service = Arc::new(TrackingService::new(channels));
    let ctrl = controller(service.clone(), false);

    finish_run(&ctrl).await;
    ctrl.record_offer_click().await.unwrap();
    assert!(service.flush(Duration::from_secs(1)).await);

    // Everything is already queued once the flush returns
    let mut names = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        names.push(payload.event_name());
    }
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"offer_clicked"));
}
