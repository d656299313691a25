//! Typed results of the model façade and the parsers that produce them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::json::{extract_json, scrape_json};
use crate::error::TutorError;

/// How the tutor frames a chat question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorMode {
    /// General tutoring, no document context.
    Free,
    /// Answer in the context of the uploaded document's summary.
    FromDocument,
}

/// Feedback for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Expected in 0..=10, stored as given.
    pub score: i64,
    pub strengths: String,
    pub weaknesses: String,
    pub model_answer: String,
}

/// Read the question list out of a model reply.
///
/// Accepts a bare array or `{"questions": [...]}`; items may be strings or
/// objects carrying a `question`/`text` field. A reply with no JSON at all
/// yields an empty list.
pub fn parse_questions(reply: &str) -> Vec<String> {
    let value = scrape_json(reply);
    let items: &[Value] = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("questions").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(obj) => obj
                .get("question")
                .or_else(|| obj.get("text"))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|q| !q.is_empty())
        .collect()
}

/// Parse an evaluation reply. A missing or non-numeric score is an error.
pub fn parse_evaluation(reply: &str) -> Result<Evaluation, TutorError> {
    let value = extract_json(reply)?;
    let obj = value.as_object().ok_or_else(|| {
        TutorError::MalformedResponse("evaluation is not a JSON object".to_string())
    })?;

    let score = obj
        .get("score")
        .ok_or_else(|| TutorError::MalformedResponse("missing 'score' field".to_string()))
        .and_then(score_from_value)?;
    if !(0..=10).contains(&score) {
        warn!("Evaluation score {} outside 0-10, storing as given", score);
    }

    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    Ok(Evaluation {
        score,
        strengths: text("strengths"),
        weaknesses: text("weaknesses"),
        model_answer: text("model_answer"),
    })
}

/// Scores arrive as 7, 7.5, "7" or "7/10" depending on the model's mood.
fn score_from_value(value: &Value) -> Result<i64, TutorError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s
            .split('/')
            .next()
            .map(str::trim)
            .and_then(|s| s.parse::<f64>().ok())
            .map(|f| f.round() as i64),
        _ => None,
    };
    parsed.ok_or_else(|| TutorError::MalformedResponse(format!("'score' is not a number: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_bare_array() {
        let reply = r#"["Explain osmosis.", "Compare mitosis and meiosis."]"#;
        assert_eq!(
            parse_questions(reply),
            vec!["Explain osmosis.", "Compare mitosis and meiosis."]
        );
    }

    #[test]
    fn test_parse_questions_wrapped_object() {
        let reply = r#"{"questions": [{"question": "Why?"}, {"text": "How?"}, 3, ""]}"#;
        assert_eq!(parse_questions(reply), vec!["Why?", "How?"]);
    }

    #[test]
    fn test_parse_questions_no_json_is_empty() {
        assert!(parse_questions("Sorry, the summary was empty.").is_empty());
        assert!(parse_questions(r#"{"items": ["x"]}"#).is_empty());
    }

    #[test]
    fn test_parse_evaluation_full() {
        let reply = r#"```json
{"score": 8, "strengths": "Accurate", "weaknesses": "Brief", "model_answer": "ATP stores energy."}
```"#;
        let eval = parse_evaluation(reply).unwrap();
        assert_eq!(eval.score, 8);
        assert_eq!(eval.strengths, "Accurate");
        assert_eq!(eval.weaknesses, "Brief");
        assert_eq!(eval.model_answer, "ATP stores energy.");
    }

    #[test]
    fn test_parse_evaluation_lenient_score_formats() {
        let eval = parse_evaluation(r#"{"score": "6/10"}"#).unwrap();
        assert_eq!(eval.score, 6);
        assert!(eval.strengths.is_empty());

        let eval = parse_evaluation(r#"{"score": 7.6}"#).unwrap();
        assert_eq!(eval.score, 8);
    }

    #[test]
    fn test_parse_evaluation_out_of_range_is_kept() {
        let eval = parse_evaluation(r#"{"score": 12}"#).unwrap();
        assert_eq!(eval.score, 12);
    }

    #[test]
    fn test_parse_evaluation_missing_score() {
        let err = parse_evaluation(r#"{"strengths": "Good"}"#).unwrap_err();
        assert!(matches!(err, TutorError::MalformedResponse(_)));
        assert!(err.to_string().contains("score"));
    }

    #[test]
    fn test_parse_evaluation_no_json() {
        let err = parse_evaluation("The answer is mostly right.").unwrap_err();
        assert!(matches!(err, TutorError::MalformedResponse(_)));
    }

    #[test]
    fn test_tutor_mode_serde() {
        let mode: TutorMode = serde_json::from_str(r#""from_document""#).unwrap();
        assert_eq!(mode, TutorMode::FromDocument);
        assert_eq!(serde_json::to_string(&TutorMode::Free).unwrap(), r#""free""#);
    }
}
