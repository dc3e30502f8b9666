//! View Model
//!
//! `render` maps a controller snapshot to exactly one screen. It is pure:
//! no I/O and no access to the controller, so any front end can use it.

use serde::Serialize;

use quiz_funnel_core::{Product, QuizOption, QuizState};

use crate::services::quiz::{QuizSnapshot, RECOMMENDATION_ERROR};

pub const PREPARING_MESSAGE: &str = "Preparing your questions...";
pub const ANALYZING_MESSAGE: &str = "Analyzing your profile...";

/// Something the user can do from a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAction {
    Start,
    ChooseOption,
    SubmitEmail,
    FollowOffer,
    Restart,
}

/// The single screen to show for a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum QuizView {
    Loading {
        message: String,
    },
    Error {
        message: String,
    },
    Welcome,
    Question {
        /// 1-based
        number: usize,
        total: usize,
        progress_percent: u8,
        category: Option<String>,
        prompt: String,
        options: Vec<QuizOption>,
    },
    LeadCapture {
        /// Inline validation message
        error: Option<String>,
    },
    Result {
        archetype: Option<String>,
        recommended_title: String,
        reason: String,
        /// `None` when the title matched nothing in the catalog
        product: Option<Product>,
    },
}

impl QuizView {
    /// Actions offered on this screen
    pub fn actions(&self) -> Vec<ViewAction> {
        match self {
            Self::Loading { .. } => vec![],
            Self::Error { .. } => vec![ViewAction::Restart],
            Self::Welcome => vec![ViewAction::Start],
            Self::Question { .. } => vec![ViewAction::ChooseOption, ViewAction::Restart],
            Self::LeadCapture { .. } => vec![ViewAction::SubmitEmail, ViewAction::Restart],
            Self::Result { product, .. } => {
                if product.is_some() {
                    vec![ViewAction::FollowOffer, ViewAction::Restart]
                } else {
                    vec![ViewAction::Restart]
                }
            }
        }
    }
}

/// Render a snapshot.
///
/// Precedence: loading, then the lead-capture form (which shows its own
/// error inline), then any error, then the state.
pub fn render(snapshot: &QuizSnapshot) -> QuizView {
    if snapshot.loading {
        let message = if snapshot.state == QuizState::Start {
            PREPARING_MESSAGE
        } else {
            ANALYZING_MESSAGE
        };
        return QuizView::Loading {
            message: message.to_string(),
        };
    }

    if snapshot.state == QuizState::LeadCapture {
        return QuizView::LeadCapture {
            error: snapshot.error.clone(),
        };
    }

    if let Some(message) = &snapshot.error {
        return QuizView::Error {
            message: message.clone(),
        };
    }

    match snapshot.state {
        QuizState::Start => QuizView::Welcome,
        QuizState::InProgress => match snapshot.current_question() {
            Some(question) => {
                let number = snapshot.current_index + 1;
                let total = snapshot.total_questions();
                QuizView::Question {
                    number,
                    total,
                    progress_percent: (number * 100 / total).min(100) as u8,
                    category: question.category.clone(),
                    prompt: question.prompt.clone(),
                    options: question.options.clone(),
                }
            }
            None => QuizView::Welcome,
        },
        QuizState::Analyzing => QuizView::Loading {
            message: ANALYZING_MESSAGE.to_string(),
        },
        QuizState::LeadCapture => QuizView::LeadCapture { error: None },
        QuizState::Finished => match &snapshot.recommendation {
            Some(recommendation) => QuizView::Result {
                archetype: recommendation.archetype.clone(),
                recommended_title: recommendation.recommended_product_title.clone(),
                reason: recommendation.reason.clone(),
                product: snapshot.matched_product.clone(),
            },
            None => QuizView::Error {
                message: RECOMMENDATION_ERROR.to_string(),
            },
        },
    }
}
