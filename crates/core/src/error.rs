//! Core Error Types
//!
//! Defines the error types shared across the quiz funnel workspace.
//! These types are dependency-free (only thiserror + std) so that the
//! controller, the recommendation client and the front end can agree on
//! failure kinds without pulling in HTTP or LLM crates.
//!
//! Two collaborator failure kinds exist: [`FetchError`] for question
//! retrieval and [`RecommendationError`] for the recommendation step.
//! [`QuizError`] is what controller operations return for contract
//! violations.

use thiserror::Error;

use crate::quiz::QuizState;

/// Core error type for configuration, validation and parsing concerns.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Question retrieval failed or produced a malformed list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote generator could not be reached or refused the request
    #[error("Question provider failed: {0}")]
    Provider(String),

    /// The generator answered with no text at all
    #[error("Question provider returned an empty response")]
    EmptyResponse,

    /// The body was not valid JSON of the expected shape
    #[error("Malformed question list: {0}")]
    Malformed(String),

    /// A required field was missing or blank
    #[error("Question list is missing required field `{0}`")]
    MissingField(&'static str),

    /// The list parsed but contained no questions
    #[error("Question list is empty")]
    NoQuestions,
}

impl FetchError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Recommendation retrieval failed or produced a malformed object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    /// The remote generator could not be reached or refused the request
    #[error("Recommendation provider failed: {0}")]
    Provider(String),

    /// The generator answered with no text at all
    #[error("Recommendation provider returned an empty response")]
    EmptyResponse,

    /// The body was not valid JSON of the expected shape
    #[error("Malformed recommendation: {0}")]
    Malformed(String),

    /// A required field was missing or blank
    #[error("Recommendation is missing required field `{0}`")]
    MissingField(&'static str),
}

impl RecommendationError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Errors returned by quiz controller operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The operation is not allowed in the current state
    #[error("Cannot {operation} while quiz is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: QuizState,
    },

    /// An argument did not fit the current session (e.g. option index)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
}

/// Result type alias for controller operations
pub type QuizResult<T> = Result<T, QuizError>;

impl QuizError {
    /// Create an invalid transition error
    pub fn invalid_transition(operation: &'static str, state: QuizState) -> Self {
        Self::InvalidTransition { operation, state }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
