//! Quiz Controller Integration Tests
//!
//! Drives `QuizController` through whole runs with stub recommendation
//! clients. Timing tests run on tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use quiz_funnel::services::presentation::{render, QuizView};
use quiz_funnel::services::quiz::{
    ControllerOptions, QuizController, LOAD_QUIZ_ERROR, RECOMMENDATION_ERROR,
};
use quiz_funnel_core::{
    Catalog, FetchError, NoopNotifier, Question, QuizError, QuizOption, QuizState,
    Recommendation, RecommendationClient, RecommendationError, TranscriptEntry,
};

// ============================================================================
// Helpers
// ============================================================================

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("Question {}", i + 1),
                vec![
                    QuizOption::new("Often", "Most days"),
                    QuizOption::new("Rarely", "Once a month"),
                ],
            )
        })
        .collect()
}

fn recommendation(title: &str) -> Recommendation {
    Recommendation {
        recommended_product_title: title.to_string(),
        reason: "It matches what you told us.".to_string(),
        archetype: Some("The Steady Burner".to_string()),
    }
}

/// Answers immediately with canned results and records transcripts.
struct StubClient {
    questions: Result<Vec<Question>, FetchError>,
    recommendation: Result<Recommendation, RecommendationError>,
    transcripts: std::sync::Mutex<Vec<Vec<TranscriptEntry>>>,
}

impl StubClient {
    fn new(n: usize, title: &str) -> Self {
        Self {
            questions: Ok(questions(n)),
            recommendation: Ok(recommendation(title)),
            transcripts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecommendationClient for StubClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.questions.clone()
    }

    async fn request_recommendation(
        &self,
        transcript: &[TranscriptEntry],
    ) -> Result<Recommendation, RecommendationError> {
        self.transcripts.lock().unwrap().push(transcript.to_vec());
        self.recommendation.clone()
    }
}

/// Holds every call until the gate is opened.
struct GatedClient {
    gate: Arc<Notify>,
    n: usize,
}

#[async_trait]
impl RecommendationClient for GatedClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.gate.notified().await;
        Ok(questions(self.n))
    }

    async fn request_recommendation(
        &self,
        _transcript: &[TranscriptEntry],
    ) -> Result<Recommendation, RecommendationError> {
        self.gate.notified().await;
        Ok(recommendation("80+ Keto Recipes"))
    }
}

fn options(min_ms: u64) -> ControllerOptions {
    ControllerOptions {
        min_analyzing: Duration::from_millis(min_ms),
        lead_capture: false,
    }
}

fn controller(client: impl RecommendationClient + 'static, opts: ControllerOptions) -> QuizController {
    QuizController::new(
        Arc::new(client),
        Arc::new(NoopNotifier),
        Catalog::default(),
        opts,
    )
}

/// Yield until the session reaches `state`, or give up.
async fn wait_for_state(ctrl: &QuizController, state: QuizState) {
    for _ in 0..1000 {
        if ctrl.snapshot().await.state == state {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never reached {}", state);
}

/// Yield until a load is in flight, or give up.
async fn wait_for_loading(ctrl: &QuizController) {
    for _ in 0..1000 {
        if ctrl.snapshot().await.loading {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never started loading");
}

// ============================================================================
// Full runs
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_run_renders_each_question_then_result() {
    let n = 4;
    let ctrl = controller(StubClient::new(n, "21-Day Keto Transformation Guide"), options(3500));

    assert_eq!(render(&ctrl.snapshot().await), QuizView::Welcome);
    let mut snapshot = ctrl.start_quiz().await.unwrap();

    let mut seen_indices = Vec::new();
    while snapshot.state == QuizState::InProgress {
        match render(&snapshot) {
            QuizView::Question { number, total, .. } => {
                assert_eq!(total, n);
                seen_indices.push(number - 1);
            }
            other => panic!("expected a question, got {:?}", other),
        }
        assert_eq!(snapshot.current_index, snapshot.answers.len());
        snapshot = ctrl.submit_option(0).await.unwrap();
    }

    assert_eq!(seen_indices, (0..n).collect::<Vec<_>>());
    assert_eq!(snapshot.state, QuizState::Finished);
    assert_eq!(snapshot.answers.len(), snapshot.questions.len());

    match render(&snapshot) {
        QuizView::Result {
            product, archetype, ..
        } => {
            assert_eq!(product.unwrap().id, "keto-transformation-21");
            assert_eq!(archetype.as_deref(), Some("The Steady Burner"));
        }
        other => panic!("expected the result, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_transcript_is_order_aligned() {
    let client = Arc::new(StubClient::new(2, "80+ Keto Recipes"));
    let ctrl = QuizController::new(
        client.clone(),
        Arc::new(NoopNotifier),
        Catalog::default(),
        options(10),
    );

    ctrl.start_quiz().await.unwrap();
    ctrl.submit_answer("I cook every day").await.unwrap();
    ctrl.submit_option(1).await.unwrap();

    let transcripts = client.transcripts.lock().unwrap();
    assert_eq!(transcripts.len(), 1);
    assert_eq!(
        transcripts[0],
        vec![
            TranscriptEntry {
                question: "Question 1".to_string(),
                answer: "I cook every day".to_string(),
            },
            TranscriptEntry {
                question: "Question 2".to_string(),
                answer: "Rarely - Once a month".to_string(),
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unknown_title_finishes_without_product() {
    let ctrl = controller(StubClient::new(1, "A Book We Do Not Sell"), options(100));
    ctrl.start_quiz().await.unwrap();
    let snapshot = ctrl.submit_option(0).await.unwrap();

    assert_eq!(snapshot.state, QuizState::Finished);
    assert!(snapshot.matched_product.is_none());
    assert!(snapshot.error.is_none());
    assert!(matches!(
        render(&snapshot),
        QuizView::Result { product: None, .. }
    ));
    assert!(matches!(
        ctrl.record_offer_click().await,
        Err(QuizError::InvalidInput(_))
    ));
}

// ============================================================================
// Contract violations
// ============================================================================

#[tokio::test]
async fn test_answer_outside_in_progress_is_rejected() {
    let ctrl = controller(StubClient::new(1, "80+ Keto Recipes"), options(0));

    let before = ctrl.snapshot().await;
    let err = ctrl.submit_answer("too early").await.unwrap_err();
    assert!(matches!(
        err,
        QuizError::InvalidTransition {
            state: QuizState::Start,
            ..
        }
    ));
    assert_eq!(ctrl.snapshot().await, before);

    ctrl.start_quiz().await.unwrap();
    ctrl.submit_option(0).await.unwrap();
    let finished = ctrl.snapshot().await;
    assert_eq!(finished.state, QuizState::Finished);

    assert!(ctrl.submit_option(0).await.is_err());
    assert!(ctrl.submit_answer("too late").await.is_err());
    assert_eq!(ctrl.snapshot().await, finished);
}

#[tokio::test]
async fn test_second_start_while_loading_is_rejected() {
    let gate = Arc::new(Notify::new());
    let ctrl = controller(GatedClient { gate: gate.clone(), n: 2 }, options(0));

    let first = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.start_quiz().await }
    });
    wait_for_loading(&ctrl).await;

    let err = ctrl.start_quiz().await.unwrap_err();
    assert!(matches!(err, QuizError::InvalidTransition { .. }));

    gate.notify_one();
    let snapshot = first.await.unwrap().unwrap();
    assert_eq!(snapshot.state, QuizState::InProgress);
}

// ============================================================================
// Failures at either fetch step
// ============================================================================

#[tokio::test]
async fn test_question_fetch_failure_returns_to_start() {
    let ctrl = controller(
        StubClient {
            questions: Err(FetchError::malformed("expected value at line 1")),
            recommendation: Ok(recommendation("x")),
            transcripts: Default::default(),
        },
        options(0),
    );

    let snapshot = ctrl.start_quiz().await.unwrap();
    assert_eq!(snapshot.state, QuizState::Start);
    assert_eq!(snapshot.error.as_deref(), Some(LOAD_QUIZ_ERROR));
    assert_eq!(snapshot.current_index, 0);
    assert!(snapshot.answers.is_empty());
    assert!(!snapshot.loading);
    assert!(matches!(render(&snapshot), QuizView::Error { .. }));

    // Restart clears the error and the quiz can be started again
    let snapshot = ctrl.restart().await;
    assert!(snapshot.error.is_none());
    assert_eq!(render(&snapshot), QuizView::Welcome);
}

#[tokio::test(start_paused = true)]
async fn test_recommendation_failure_returns_to_start() {
    let ctrl = controller(
        StubClient {
            questions: Ok(questions(3)),
            recommendation: Err(RecommendationError::MissingField("reason")),
            transcripts: Default::default(),
        },
        options(3500),
    );

    ctrl.start_quiz().await.unwrap();
    ctrl.submit_option(0).await.unwrap();
    ctrl.submit_option(1).await.unwrap();
    let snapshot = ctrl.submit_option(0).await.unwrap();

    assert_eq!(snapshot.state, QuizState::Start);
    assert_eq!(snapshot.error.as_deref(), Some(RECOMMENDATION_ERROR));
    assert_eq!(snapshot.current_index, 0);
    assert!(snapshot.answers.is_empty());
    assert!(snapshot.questions.is_empty());
    assert!(snapshot.recommendation.is_none());
}

// ============================================================================
// Minimum analyzing duration
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_analyzing_never_finishes_before_floor() {
    let ctrl = controller(StubClient::new(1, "80+ Keto Recipes"), options(3500));
    ctrl.start_quiz().await.unwrap();

    let started = tokio::time::Instant::now();
    let snapshot = ctrl.submit_option(0).await.unwrap();

    assert_eq!(snapshot.state, QuizState::Finished);
    assert!(started.elapsed() >= Duration::from_millis(3500));
}

#[tokio::test(start_paused = true)]
async fn test_analyzing_is_observable_until_floor_elapses() {
    let ctrl = controller(StubClient::new(2, "80+ Keto Recipes"), options(3500));
    ctrl.start_quiz().await.unwrap();
    ctrl.submit_option(0).await.unwrap();

    let last = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.submit_option(1).await }
    });
    wait_for_state(&ctrl, QuizState::Analyzing).await;

    let snapshot = ctrl.snapshot().await;
    assert!(snapshot.loading);
    assert_eq!(snapshot.answers.len(), 2);
    assert!(matches!(render(&snapshot), QuizView::Loading { .. }));

    tokio::time::advance(Duration::from_millis(3000)).await;
    tokio::task::yield_now().await;
    assert_eq!(ctrl.snapshot().await.state, QuizState::Analyzing);
    assert!(!last.is_finished());

    let snapshot = last.await.unwrap().unwrap();
    assert_eq!(snapshot.state, QuizState::Finished);
}

// ============================================================================
// Restart and stale responses
// ============================================================================

#[tokio::test]
async fn test_restart_discards_stale_recommendation() {
    let gate = Arc::new(Notify::new());
    let ctrl = controller(GatedClient { gate: gate.clone(), n: 1 }, options(0));

    gate.notify_one();
    ctrl.start_quiz().await.unwrap();

    let pending = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.submit_option(0).await }
    });
    wait_for_state(&ctrl, QuizState::Analyzing).await;

    let restarted = ctrl.restart().await;
    assert_eq!(restarted.state, QuizState::Start);
    assert_eq!(restarted.generation, 1);

    gate.notify_one();
    let returned = pending.await.unwrap().unwrap();
    assert_eq!(returned.state, QuizState::Start);
    assert!(returned.recommendation.is_none());

    let snapshot = ctrl.snapshot().await;
    assert_eq!(snapshot.state, QuizState::Start);
    assert_eq!(snapshot.generation, 1);
    assert!(snapshot.questions.is_empty());
    assert!(snapshot.answers.is_empty());
    assert!(snapshot.recommendation.is_none());
    assert!(snapshot.matched_product.is_none());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_restart_discards_stale_question_fetch() {
    let gate = Arc::new(Notify::new());
    let ctrl = controller(GatedClient { gate: gate.clone(), n: 3 }, options(0));

    let pending = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.start_quiz().await }
    });
    wait_for_loading(&ctrl).await;

    ctrl.restart().await;
    gate.notify_one();
    pending.await.unwrap().unwrap();

    let snapshot = ctrl.snapshot().await;
    assert_eq!(snapshot.state, QuizState::Start);
    assert!(snapshot.questions.is_empty());
    assert!(!snapshot.loading);

    // The new run starts cleanly
    gate.notify_one();
    let snapshot = ctrl.start_quiz().await.unwrap();
    assert_eq!(snapshot.state, QuizState::InProgress);
    assert_eq!(snapshot.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_from_finished_resets_everything() {
    let ctrl = controller(
        StubClient::new(2, "80+ Keto Recipes"),
        ControllerOptions {
            min_analyzing: Duration::from_millis(50),
            lead_capture: true,
        },
    );
    ctrl.start_quiz().await.unwrap();
    ctrl.submit_option(0).await.unwrap();
    ctrl.submit_option(0).await.unwrap();
    let snapshot = ctrl.submit_email("reader@example.com").await.unwrap();
    assert_eq!(snapshot.state, QuizState::Finished);

    let snapshot = ctrl.restart().await;
    assert_eq!(snapshot.state, QuizState::Start);
    assert!(snapshot.questions.is_empty());
    assert!(snapshot.answers.is_empty());
    assert_eq!(snapshot.current_index, 0);
    assert!(snapshot.recommendation.is_none());
    assert!(snapshot.matched_product.is_none());
    assert!(snapshot.lead_email.is_none());
    assert!(snapshot.error.is_none());
    assert!(!snapshot.loading);
}
