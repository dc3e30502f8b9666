//! Quiz Funnel Core
//!
//! Foundational types and traits for the quiz funnel workspace. This crate
//! has no I/O and no dependency on the LLM layer or the front end.
//!
//! ## Module Organization
//!
//! - `error` - Collaborator and controller error types (`FetchError`, `RecommendationError`, `QuizError`, `CoreError`)
//! - `quiz` - Questions, answers, transcript entries, recommendations and `QuizState`
//! - `catalog` - Static product catalog with case-insensitive title lookup
//! - `client` - The `RecommendationClient` trait the controller depends on
//! - `events` - Funnel events and the fire-and-forget `FunnelNotifier` trait
//! - `proxy` - Proxy configuration shared by every HTTP-using component

pub mod catalog;
pub mod client;
pub mod error;
pub mod events;
pub mod proxy;
pub mod quiz;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{
    CoreError, CoreResult, FetchError, QuizError, QuizResult, RecommendationError,
};

// ── Domain ─────────────────────────────────────────────────────────────
pub use catalog::{Catalog, Product};
pub use quiz::{
    build_transcript, Answer, Question, QuizOption, QuizState, Recommendation, TranscriptEntry,
};

// ── Collaborators ──────────────────────────────────────────────────────
pub use client::RecommendationClient;
pub use events::{FunnelEvent, FunnelNotifier, NoopNotifier};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};
