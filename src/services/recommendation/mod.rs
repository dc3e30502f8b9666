//! Recommendation Service
//!
//! LLM-backed implementation of `RecommendationClient`, its prompts, the
//! reply schema validation and the fixed question bank.

pub mod llm_client;
pub mod prompts;
pub mod question_bank;
pub mod schema;

pub use llm_client::LlmRecommendationClient;
pub use question_bank::fixed_questions;
pub use schema::{parse_questions, parse_recommendation};
