//! Quiz Session
//!
//! Mutable state of one quiz run and the read-only snapshot handed to
//! callers after every controller operation.

use serde::Serialize;

use quiz_funnel_core::{Answer, Product, Question, QuizState, Recommendation};

/// Mutable session owned by the controller
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    pub(crate) state: QuizState,
    pub(crate) questions: Vec<Question>,
    pub(crate) answers: Vec<Answer>,
    pub(crate) current_index: usize,
    pub(crate) recommendation: Option<Recommendation>,
    pub(crate) matched_product: Option<Product>,
    pub(crate) lead_email: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) loading: bool,
    pub(crate) generation: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to `Start` with nothing kept, under a new generation
    pub(crate) fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Drop the run's progress and land on `Start` showing `message`.
    ///
    /// The generation is kept; only a restart starts a new one.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.state = QuizState::Start;
        self.questions.clear();
        self.answers.clear();
        self.current_index = 0;
        self.recommendation = None;
        self.matched_product = None;
        self.lead_email = None;
        self.loading = false;
        self.error = Some(message.into());
    }

    pub(crate) fn current_question(&self) -> Option<&Question> {
        if self.state == QuizState::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            state: self.state,
            questions: self.questions.clone(),
            answers: self.answers.clone(),
            current_index: self.current_index,
            recommendation: self.recommendation.clone(),
            matched_product: self.matched_product.clone(),
            lead_email: self.lead_email.clone(),
            error: self.error.clone(),
            loading: self.loading,
            generation: self.generation,
        }
    }
}

/// Read-only copy of the session at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub state: QuizState,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub current_index: usize,
    pub recommendation: Option<Recommendation>,
    pub matched_product: Option<Product>,
    pub lead_email: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub generation: u64,
}

impl QuizSnapshot {
    /// The question on screen, only while in progress
    pub fn current_question(&self) -> Option<&Question> {
        if self.state == QuizState::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Share of questions answered so far, 0 - 100
    pub fn progress_percent(&self) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        let pct = self.answers.len() * 100 / self.questions.len();
        pct.min(100) as u8
    }
}
