//! Quiz Funnel LLM
//!
//! Provides a small provider interface for single-shot text generation and
//! its Google Gemini implementation. Also includes the HTTP client factory
//! and JSON extraction for replies that arrive wrapped in markdown.

pub mod gemini;
pub mod http_client;
pub mod json_extract;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use json_extract::extract_json_from_response;
pub use provider::LlmProvider;
pub use types::*;
