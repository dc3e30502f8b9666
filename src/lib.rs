//! Quiz Funnel
//!
//! Marketing quiz funnel backed by a generative-language model:
//! - Quiz controller (state machine over questions, answers and the recommendation)
//! - LLM-backed recommendation client and fixed question bank
//! - Fire-and-forget funnel tracking
//! - View model and interactive terminal front end
//! - Settings file and environment overrides

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod terminal;
pub mod utils;

pub use models::settings::{FunnelSettings, QuestionSource, SettingsUpdate};
pub use services::presentation::{render, QuizView};
pub use services::quiz::{ControllerOptions, QuizController, QuizSnapshot};
pub use state::FunnelApp;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
