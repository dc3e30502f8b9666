//! Services
//!
//! Business logic for the funnel: the quiz flow, the LLM-backed
//! recommendation client, tracking and the presentation layer.

pub mod presentation;
pub mod quiz;
pub mod recommendation;
pub mod tracking;

pub use presentation::{render, AnalyzingTicker, QuizView, ViewAction};
pub use quiz::{ControllerOptions, QuizController, QuizSnapshot};
pub use recommendation::LlmRecommendationClient;
pub use tracking::TrackingService;
