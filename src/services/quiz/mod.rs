//! Quiz Flow
//!
//! The quiz state machine (`QuizController`) and the session it owns.

pub mod controller;
pub mod session;

pub use controller::{
    ControllerOptions, QuizController, DEFAULT_MIN_ANALYZING, INVALID_EMAIL_ERROR,
    LOAD_QUIZ_ERROR, RECOMMENDATION_ERROR,
};
pub use session::{QuizSession, QuizSnapshot};
