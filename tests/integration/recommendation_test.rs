//! Recommendation Client Integration Tests
//!
//! Runs whole quizzes through `FunnelApp` with the LLM-backed client and a
//! mock provider, so prompt building, fence stripping, schema validation
//! and catalog matching are exercised together. No network calls are made.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quiz_funnel::models::settings::{FunnelSettings, QuestionSource};
use quiz_funnel::services::quiz::{LOAD_QUIZ_ERROR, RECOMMENDATION_ERROR};
use quiz_funnel::FunnelApp;
use quiz_funnel_core::{NoopNotifier, QuizState};
use quiz_funnel_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, StopReason,
    UsageStats,
};

// ============================================================================
// Mock LLM Provider
// ============================================================================

/// Returns predefined responses in order and records each request.
struct MockLlmProvider {
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    systems: Mutex<Vec<String>>,
}

impl MockLlmProvider {
    fn with_texts(texts: &[&str]) -> Self {
        Self {
            responses: Mutex::new(texts.iter().map(|t| Ok(text_response(t))).collect()),
            systems: Mutex::new(Vec::new()),
        }
    }
}

fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: Some(text.to_string()),
        stop_reason: StopReason::EndTurn,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        _messages: Vec<Message>,
        system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.systems
            .lock()
            .unwrap()
            .push(system.unwrap_or_default());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

const TWO_QUESTIONS: &str = r#"```json
[
  {"question": "How long have you been low-carb?", "category": "Experience",
   "options": [{"title": "Never", "description": "Brand new"}, {"title": "Years"}]},
  {"question": "What is your main goal?", "options": ["Lose weight", "More flavor"]}
]
```"#;

fn settings(source: QuestionSource) -> FunnelSettings {
    FunnelSettings {
        question_source: source,
        min_analyzing_ms: 0,
        ..FunnelSettings::default()
    }
}

fn app(provider: Arc<MockLlmProvider>, source: QuestionSource) -> FunnelApp {
    FunnelApp::builder(settings(source))
        .provider(provider)
        .notifier(Arc::new(NoopNotifier))
        .build()
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_remote_questions_and_recommendation() {
    let provider = Arc::new(MockLlmProvider::with_texts(&[
        TWO_QUESTIONS,
        r#"Sure! {"recommendedProductTitle": "80+ keto recipes", "reason": "You want flavor.", "archetype": "The Flavor Hunter"}"#,
    ]));
    let app = app(provider.clone(), QuestionSource::Remote);
    let ctrl = app.controller();

    let snapshot = ctrl.start_quiz().await.unwrap();
    assert_eq!(snapshot.state, QuizState::InProgress);
    assert_eq!(snapshot.questions.len(), 2);
    assert_eq!(snapshot.questions[0].category.as_deref(), Some("Experience"));

    ctrl.submit_option(0).await.unwrap();
    let snapshot = ctrl.submit_option(1).await.unwrap();

    assert_eq!(snapshot.state, QuizState::Finished);
    let product = snapshot.matched_product.unwrap();
    assert_eq!(product.id, "keto-carnivore-recipes");
    assert_eq!(
        snapshot.recommendation.unwrap().archetype.as_deref(),
        Some("The Flavor Hunter")
    );

    let systems = provider.systems.lock().unwrap();
    assert_eq!(systems.len(), 2);
    assert!(systems[0].contains("5-question"));
    assert!(systems[1].contains("recommendedProductTitle"));
}

#[tokio::test]
async fn test_fixed_questions_use_one_model_call() {
    let provider = Arc::new(MockLlmProvider::with_texts(&[
        r#"{"recommendedProductTitle": "The Definitive Carnivore Beginner's Guide", "reason": "Keep it simple."}"#,
    ]));
    let app = app(provider.clone(), QuestionSource::Fixed);
    let ctrl = app.controller();

    let mut snapshot = ctrl.start_quiz().await.unwrap();
    assert_eq!(snapshot.questions.len(), 5);
    while snapshot.state == QuizState::InProgress {
        snapshot = ctrl.submit_option(0).await.unwrap();
    }

    assert_eq!(snapshot.state, QuizState::Finished);
    assert_eq!(snapshot.matched_product.unwrap().id, "carnivore-beginners");
    assert_eq!(provider.systems.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_questions_return_to_start() {
    let provider = Arc::new(MockLlmProvider::with_texts(&["I cannot help with that."]));
    let app = app(provider, QuestionSource::Remote);

    let snapshot = app.controller().start_quiz().await.unwrap();
    assert_eq!(snapshot.state, QuizState::Start);
    assert_eq!(snapshot.error.as_deref(), Some(LOAD_QUIZ_ERROR));
    assert_eq!(snapshot.current_index, 0);
    assert!(snapshot.answers.is_empty());
}

#[tokio::test]
async fn test_malformed_recommendation_returns_to_start() {
    let provider = Arc::new(MockLlmProvider::with_texts(&[
        TWO_QUESTIONS,
        r#"{"recommendedProductTitle": "80+ Keto Recipes"}"#,
    ]));
    let app = app(provider, QuestionSource::Remote);
    let ctrl = app.controller();

    ctrl.start_quiz().await.unwrap();
    ctrl.submit_option(0).await.unwrap();
    let snapshot = ctrl.submit_option(0).await.unwrap();

    assert_eq!(snapshot.state, QuizState::Start);
    assert_eq!(snapshot.error.as_deref(), Some(RECOMMENDATION_ERROR));
    assert_eq!(snapshot.current_index, 0);
    assert!(snapshot.answers.is_empty());
}

#[tokio::test]
async fn test_provider_error_is_recovered() {
    // No canned responses: every call fails
    let provider = Arc::new(MockLlmProvider::with_texts(&[]));
    let app = app(provider, QuestionSource::Remote);

    let snapshot = app.controller().start_quiz().await.unwrap();
    assert_eq!(snapshot.state, QuizState::Start);
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn test_custom_catalog_from_settings() {
    let toml = r#"
        question_source = "fixed"
        min_analyzing_ms = 0

        [[catalog]]
        id = "bone-broth"
        title = "Bone Broth Basics"
        description = "Broth for beginners"
        image_url = "https://example.com/broth.jpg"
        link = "https://example.com/broth"
        audience = "Wants gut healing"
    "#;
    let settings: FunnelSettings = toml::from_str(toml).unwrap();

    let provider = Arc::new(MockLlmProvider::with_texts(&[
        r#"{"recommendedProductTitle": "bone broth basics", "reason": "Gut first."}"#,
    ]));
    let app = FunnelApp::builder(settings)
        .provider(provider.clone())
        .notifier(Arc::new(NoopNotifier))
        .build()
        .unwrap();
    let ctrl = app.controller();

    let mut snapshot = ctrl.start_quiz().await.unwrap();
    while snapshot.state == QuizState::InProgress {
        snapshot = ctrl.submit_option(0).await.unwrap();
    }
    assert_eq!(snapshot.matched_product.unwrap().id, "bone-broth");
    assert_eq!(
        ctrl.record_offer_click().await.unwrap(),
        "https://example.com/broth"
    );
    assert!(provider.systems.lock().unwrap()[0].contains("Bone Broth Basics"));
}
