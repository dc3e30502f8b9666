//! Quiz Domain Types
//!
//! Questions, answers, transcript entries, recommendations and the quiz
//! state enum. These are the shapes the controller, the recommendation
//! client and the presentation layer exchange.

use serde::{Deserialize, Serialize};

/// Progression of a single quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizState {
    /// Waiting for the user to start (also the error-recovery state)
    Start,
    /// Questions loaded, answers being collected
    InProgress,
    /// All questions answered, recommendation in flight
    Analyzing,
    /// Recommendation ready, waiting for the user's email
    LeadCapture,
    /// Recommendation shown; terminal until restart
    Finished,
}

impl QuizState {
    /// Get the string form used in logs and tracking payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::InProgress => "in-progress",
            Self::Analyzing => "analyzing",
            Self::LeadCapture => "lead-capture",
            Self::Finished => "finished",
        }
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::Start
    }
}

impl std::fmt::Display for QuizState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl QuizOption {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Option without a description (the remote generator may send bare strings)
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }

    /// Text recorded as the answer when this option is picked
    pub fn answer_text(&self) -> String {
        if self.description.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.description)
        }
    }
}

/// A quiz question with its ordered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: Vec<QuizOption>) -> Self {
        Self {
            prompt: prompt.into(),
            category: None,
            options,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Free-text answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer(String);

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&QuizOption> for Answer {
    fn from(option: &QuizOption) -> Self {
        Self(option.answer_text())
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// A (question, answer) pair sent to the recommendation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
}

/// Zip questions and answers into a transcript, order-aligned.
///
/// Stops at the shorter of the two lists.
pub fn build_transcript(questions: &[Question], answers: &[Answer]) -> Vec<TranscriptEntry> {
    questions
        .iter()
        .zip(answers)
        .map(|(q, a)| TranscriptEntry {
            question: q.prompt.clone(),
            answer: a.as_str().to_string(),
        })
        .collect()
}

/// Recommendation returned by the remote generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub recommended_product_title: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}
