//! Recommendation Prompts
//!
//! Prompt text and `responseSchema` declarations for the two model calls:
//! generating the quiz questions and choosing a product from the answers.

use serde_json::{json, Value};

use quiz_funnel_core::{Catalog, TranscriptEntry};

/// Build the system prompt for question generation.
pub fn build_questions_system_prompt(catalog: &Catalog, question_count: usize) -> String {
    format!(
        r#"You are the nutrition specialist behind a keto and carnivore diet community.
Write a {count}-question multiple-choice quiz that helps a follower find the digital product that fits them best.

Products available for the final recommendation:
{products}

The questions must investigate:
- Experience with low-carb diets. The FIRST question must cover experience with both keto and carnivore.
- Main goal (e.g. weight loss, autoimmune relief, more energy, variety at the table).
- Current lifestyle, including physical activity (e.g. sedentary, active, long time without training).
- Relationship with food and cooking (e.g. prefers quick meals, enjoys cooking, gets bored of routine easily).
- Difficulties met on other diets (e.g. lack of satiety, sugar cravings, complexity).

Rules:
1. Exactly {count} questions, each with 3 to 5 options.
2. Every option has a short "title" and a one-sentence "description".
3. Give each question a short "category" label (e.g. "Experience", "Goal").
4. Engaging, direct wording.

Respond with ONLY a JSON array of question objects. No markdown fences, no explanatory text."#,
        count = question_count,
        products = format_candidates(catalog),
    )
}

/// Build the user message for question generation.
pub fn build_questions_user_message(question_count: usize) -> String {
    format!("Generate the {} quiz questions now.", question_count)
}

/// Build the system prompt for the recommendation step.
///
/// Candidates are listed in catalog order, which is also the tie-break
/// priority when more than one rule applies.
pub fn build_recommendation_system_prompt(catalog: &Catalog) -> String {
    let rules: Vec<String> = catalog
        .candidates()
        .enumerate()
        .filter_map(|(i, product)| {
            product.audience.as_ref().map(|audience| {
                format!(
                    "{}. Prefer \"{}\" for someone who: {}.",
                    i + 1,
                    product.title,
                    audience.trim_end_matches('.')
                )
            })
        })
        .collect();

    format!(
        r#"You are the specialist behind a keto and carnivore diet community.
Analyze the user's quiz answers and recommend exactly ONE of these products:
{products}

Rules:
{rules}
When more than one rule applies, the lower-numbered rule wins.

Return a JSON object with:
- "recommendedProductTitle": the EXACT title of one of the products above.
- "reason": a short (2-3 sentence), motivating explanation personalized to the answers.
- "archetype": a catchy two-to-four word name for the user's metabolic profile.

Respond with ONLY the JSON object."#,
        products = format_candidates(catalog),
        rules = rules.join("\n"),
    )
}

/// Build the user message carrying the answered questions.
pub fn build_recommendation_user_message(
    transcript: &[TranscriptEntry],
) -> serde_json::Result<String> {
    Ok(format!(
        "User answers:\n{}",
        serde_json::to_string_pretty(transcript)?
    ))
}

fn format_candidates(catalog: &Catalog) -> String {
    catalog
        .candidates()
        .enumerate()
        .map(|(i, product)| {
            let audience = product.audience.as_deref().unwrap_or_default();
            format!("{}. \"{}\" ({})", i + 1, product.title, audience)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `responseSchema` for the question list
pub fn questions_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "category": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["title"]
                    }
                }
            },
            "required": ["question", "options"]
        }
    })
}

/// `responseSchema` for the recommendation object
pub fn recommendation_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendedProductTitle": { "type": "STRING" },
            "reason": { "type": "STRING" },
            "archetype": { "type": "STRING" }
        },
        "required": ["recommendedProductTitle", "reason"]
    })
}
