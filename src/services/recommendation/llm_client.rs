//! LLM-backed Recommendation Client
//!
//! Implements `RecommendationClient` on top of any `LlmProvider`: questions
//! from the fixed bank or the model, recommendations always from the model.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use quiz_funnel_core::{
    Catalog, FetchError, Question, Recommendation, RecommendationClient, RecommendationError,
    TranscriptEntry,
};
use quiz_funnel_llm::{LlmProvider, LlmRequestOptions, Message, ResponseFormat};

use super::prompts::{
    build_questions_system_prompt, build_questions_user_message,
    build_recommendation_system_prompt, build_recommendation_user_message,
    questions_response_schema, recommendation_response_schema,
};
use super::question_bank::fixed_questions;
use super::schema::{parse_questions, parse_recommendation};
use crate::models::settings::QuestionSource;

/// Recommendation client that talks to a language model
pub struct LlmRecommendationClient {
    provider: Arc<dyn LlmProvider>,
    source: QuestionSource,
    question_count: usize,
    catalog: Catalog,
}

impl LlmRecommendationClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        source: QuestionSource,
        question_count: usize,
        catalog: Catalog,
    ) -> Self {
        Self {
            provider,
            source,
            question_count,
            catalog,
        }
    }

    fn json_options(schema: serde_json::Value) -> LlmRequestOptions {
        LlmRequestOptions {
            response_format: Some(ResponseFormat::json(schema)),
            ..Default::default()
        }
    }

    async fn generate_questions(&self) -> Result<Vec<Question>, FetchError> {
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            count = self.question_count,
            "requesting quiz questions"
        );

        let response = self
            .provider
            .send_message(
                vec![Message::user(build_questions_user_message(self.question_count))],
                Some(build_questions_system_prompt(
                    &self.catalog,
                    self.question_count,
                )),
                Self::json_options(questions_response_schema()),
            )
            .await
            .map_err(|e| FetchError::provider(e.to_string()))?;

        let text = response.text().ok_or(FetchError::EmptyResponse)?;
        let questions = parse_questions(text).map_err(|e| {
            warn!(error = %e, "question list rejected");
            e
        })?;

        if questions.len() != self.question_count {
            debug!(
                requested = self.question_count,
                received = questions.len(),
                "model returned a different number of questions"
            );
        }
        Ok(questions)
    }
}

#[async_trait]
impl RecommendationClient for LlmRecommendationClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        match self.source {
            QuestionSource::Fixed => Ok(fixed_questions()),
            QuestionSource::Remote => self.generate_questions().await,
        }
    }

    async fn request_recommendation(
        &self,
        transcript: &[TranscriptEntry],
    ) -> Result<Recommendation, RecommendationError> {
        let user_message = build_recommendation_user_message(transcript)
            .map_err(|e| RecommendationError::malformed(e.to_string()))?;

        debug!(
            provider = self.provider.name(),
            answers = transcript.len(),
            "requesting recommendation"
        );

        let response = self
            .provider
            .send_message(
                vec![Message::user(user_message)],
                Some(build_recommendation_system_prompt(&self.catalog)),
                Self::json_options(recommendation_response_schema()),
            )
            .await
            .map_err(|e| RecommendationError::provider(e.to_string()))?;

        let text = response.text().ok_or(RecommendationError::EmptyResponse)?;
        parse_recommendation(text).map_err(|e| {
            warn!(error = %e, "recommendation rejected");
            e
        })
    }
}
