//! Error Handling
//!
//! Unified error types for the application crate.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use quiz_funnel_core::{CoreError, QuizError};
use quiz_funnel_llm::LlmError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (missing API key, bad settings file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be written
    #[error("Settings write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Quiz controller contract violations
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Terminal prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(msg) => Self::Config(msg),
            CoreError::Io(e) => Self::Io(e),
            CoreError::Serialization(e) => Self::Serialization(e),
            CoreError::Validation(msg) | CoreError::Parse(msg) => Self::Validation(msg),
        }
    }
}
