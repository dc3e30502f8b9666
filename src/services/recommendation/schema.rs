//! Response Schema
//!
//! Wire structs for the model's JSON replies and their validation into
//! domain types. Anything that does not match is rejected; nothing is
//! guessed or repaired beyond stripping fences and surrounding text.

use serde::Deserialize;

use quiz_funnel_core::{FetchError, Question, QuizOption, Recommendation, RecommendationError};
use quiz_funnel_llm::extract_json_from_response;

/// How much of an unparseable body to keep in the error message
const SNIPPET_CHARS: usize = 160;

/// An option is either a bare label or a `{title, description}` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireOption {
    Text(String),
    Rich {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    #[serde(default, alias = "prompt")]
    question: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    options: Option<Vec<WireOption>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecommendation {
    #[serde(default, alias = "recommended_product_title")]
    recommended_product_title: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    archetype: Option<String>,
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

/// Trimmed, non-blank value
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse and validate a question list reply.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, FetchError> {
    if text.trim().is_empty() {
        return Err(FetchError::EmptyResponse);
    }

    let json = extract_json_from_response(text);
    let wire: Vec<WireQuestion> = serde_json::from_str(&json).map_err(|e| {
        FetchError::malformed(format!("{}; body starts with {:?}", e, snippet(&json)))
    })?;

    if wire.is_empty() {
        return Err(FetchError::NoQuestions);
    }

    wire.into_iter().map(validate_question).collect()
}

fn validate_question(wire: WireQuestion) -> Result<Question, FetchError> {
    let prompt = non_blank(wire.question).ok_or(FetchError::MissingField("question"))?;

    let options = wire
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|option| match option {
            WireOption::Text(title) => non_blank(Some(title)).map(QuizOption::titled),
            WireOption::Rich { title, description } => non_blank(title).map(|title| {
                QuizOption::new(title, non_blank(description).unwrap_or_default())
            }),
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(FetchError::MissingField("options.title"))?;

    if options.is_empty() {
        return Err(FetchError::MissingField("options"));
    }

    let question = Question::new(prompt, options);
    Ok(match non_blank(wire.category) {
        Some(category) => question.with_category(category),
        None => question,
    })
}

/// Parse and validate a recommendation reply.
pub fn parse_recommendation(text: &str) -> Result<Recommendation, RecommendationError> {
    if text.trim().is_empty() {
        return Err(RecommendationError::EmptyResponse);
    }

    let json = extract_json_from_response(text);
    let wire: WireRecommendation = serde_json::from_str(&json).map_err(|e| {
        RecommendationError::malformed(format!("{}; body starts with {:?}", e, snippet(&json)))
    })?;

    let recommended_product_title = non_blank(wire.recommended_product_title)
        .ok_or(RecommendationError::MissingField("recommendedProductTitle"))?;
    let reason = non_blank(wire.reason).ok_or(RecommendationError::MissingField("reason"))?;

    Ok(Recommendation {
        recommended_product_title,
        reason,
        archetype: non_blank(wire.archetype),
    })
}
