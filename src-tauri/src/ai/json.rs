//! Pulling JSON out of model replies.
//!
//! Even with structured output requested, some providers wrap their JSON
//! in markdown fences or chatter around it. [`scrape_json`] is the lenient
//! extractor; [`extract_json`] is the same scan but reports failure.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::provider::truncate_for_log;
use crate::error::TutorError;

fn json_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy: from the first opening brace/bracket to the last closing one.
    RE.get_or_init(|| Regex::new(r"(?s)(\{.*\}|\[.*\])").expect("static regex"))
}

/// Remove markdown code fence markers anywhere in the text.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Find and parse the JSON span in a model reply.
pub fn extract_json(text: &str) -> Result<Value, TutorError> {
    let cleaned = strip_code_fences(text);
    let span = json_span()
        .find(&cleaned)
        .ok_or_else(|| {
            TutorError::MalformedResponse(format!(
                "no JSON object or array in reply: {}",
                truncate_for_log(cleaned.trim(), 200)
            ))
        })?;

    serde_json::from_str(span.as_str()).map_err(|e| {
        TutorError::MalformedResponse(format!(
            "invalid JSON ({}): {}",
            e,
            truncate_for_log(span.as_str(), 200)
        ))
    })
}

/// Best-effort variant of [`extract_json`]: anything unusable becomes `{}`.
pub fn scrape_json(text: &str) -> Value {
    match extract_json(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Falling back to empty JSON: {}", e);
            Value::Object(serde_json::Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scrape_json_returns_object_unchanged() {
        let input = r#"{"score": 7, "strengths": "clear", "weaknesses": "", "model_answer": "x"}"#;
        let expected: Value = serde_json::from_str(input).unwrap();
        assert_eq!(scrape_json(input), expected);
    }

    #[test]
    fn test_scrape_json_no_span_is_empty_object() {
        assert_eq!(scrape_json("I cannot help with that."), json!({}));
        assert_eq!(scrape_json(""), json!({}));
    }

    #[test]
    fn test_scrape_json_invalid_span_is_empty_object() {
        assert_eq!(scrape_json("result: {score: seven}"), json!({}));
    }

    #[test]
    fn test_scrape_json_strips_fences_and_chatter() {
        let input = "Sure! Here you go:\n```json\n[\"What is ATP?\", \"Why?\"]\n```\nGood luck.";
        assert_eq!(scrape_json(input), json!(["What is ATP?", "Why?"]));
    }

    #[test]
    fn test_scrape_json_leftmost_span_wins() {
        let input = r#"[{"question": "A"}, {"question": "B"}]"#;
        let value = scrape_json(input);
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_json_reports_missing_span() {
        let err = extract_json("no json here").unwrap_err();
        assert!(matches!(err, TutorError::MalformedResponse(_)));
        assert!(err.to_string().contains("no JSON"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "\n{}\n");
    }
}
