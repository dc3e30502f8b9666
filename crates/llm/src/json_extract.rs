//! JSON Extraction
//!
//! Models asked for "JSON only" still wrap replies in markdown fences or
//! add a sentence before the payload. This module recovers the JSON text;
//! validating its shape is the caller's job.

/// Extract JSON from an LLM response string, handling markdown fences.
///
/// Order of attempts:
/// 1. the body of the first fenced block (with or without a language tag)
/// 2. the outermost `[`..`]` or `{`..`}` span, whichever opens first
/// 3. the trimmed input as-is
pub fn extract_json_from_response(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = match after_fence.find('\n') {
            Some(nl) if is_language_tag(&after_fence[..nl]) => nl + 1,
            _ => 0,
        };
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
        // Unterminated fence: keep what follows it.
        return extract_span(content.trim()).to_string();
    }

    extract_span(trimmed).to_string()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn extract_span(text: &str) -> &str {
    let array = text.find('[').zip(text.rfind(']'));
    let object = text.find('{').zip(text.rfind('}'));

    let span = match (array, object) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (Some(a), None) => Some(a),
        (None, Some(o)) => Some(o),
        (None, None) => None,
    };

    match span {
        Some((start, end)) if start <= end => &text[start..=end],
        _ => text,
    }
}
