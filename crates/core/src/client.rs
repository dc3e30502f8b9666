//! Recommendation Client Trait
//!
//! The controller's only view of the remote generator. Implementations
//! live in the application crate (LLM-backed) and in tests (stubs).

use async_trait::async_trait;

use crate::error::{FetchError, RecommendationError};
use crate::quiz::{Question, Recommendation, TranscriptEntry};

/// Source of quiz questions and recommendations.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Fetch the ordered question list for a new run.
    ///
    /// Implementations must reject an empty or malformed list with
    /// [`FetchError`] rather than returning partial data.
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError>;

    /// Ask for a recommendation given the full transcript.
    async fn request_recommendation(
        &self,
        transcript: &[TranscriptEntry],
    ) -> Result<Recommendation, RecommendationError>;
}
