//! Prompt templates and response schemas for the tutor operations.

use serde_json::{json, Value};

use super::types::TutorMode;
use crate::session::Difficulty;

/// Characters of document text sent for summarization. The rest is dropped.
pub const SUMMARY_CHAR_BUDGET: usize = 8000;

/// Fixed instruction sent along with an uploaded image.
pub const IMAGE_INSTRUCTION: &str = "Analyze this image clearly and educationally.";

/// Number of quiz questions requested per document.
pub const QUESTION_COUNT: usize = 5;

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

pub fn build_summary_prompt(doc_text: &str) -> String {
    format!(
        "Create a clear, structured learning summary:\n{}",
        truncate_chars(doc_text, SUMMARY_CHAR_BUDGET)
    )
}

pub fn build_questions_prompt(summary: &str) -> String {
    format!(
        "Generate EXACTLY {} higher-order questions as JSON array:\n{}",
        QUESTION_COUNT, summary
    )
}

/// OpenAI strict mode needs an object root, so the array is wrapped.
pub fn questions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Exactly five higher-order questions about the material"
            }
        },
        "required": ["questions"],
        "additionalProperties": false
    })
}

pub fn build_evaluation_prompt(question: &str, answer: &str, summary: &str) -> String {
    format!(
        r#"Return JSON only:
{{
  "score": 0-10,
  "strengths": "",
  "weaknesses": "",
  "model_answer": ""
}}

QUESTION: {question}
ANSWER: {answer}
SUMMARY: {summary}
"#
    )
}

pub fn evaluation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": {
                "type": "integer",
                "description": "0-10 rating of the answer"
            },
            "strengths": { "type": "string" },
            "weaknesses": { "type": "string" },
            "model_answer": { "type": "string" }
        },
        "required": ["score", "strengths", "weaknesses", "model_answer"],
        "additionalProperties": false
    })
}

pub fn build_tutor_prompt(
    question: &str,
    mode: TutorMode,
    level: Difficulty,
    summary: &str,
) -> String {
    match mode {
        TutorMode::Free => format!(
            "You are an expert tutor. Level: {}\n\n{}",
            level.label(),
            question
        ),
        TutorMode::FromDocument => format!(
            r#"
You are an adaptive tutor.
Level: {level}

DOCUMENT SUMMARY:
{summary}

QUESTION:
{question}
"#,
            level = level.label(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_budget() {
        let long = "a".repeat(SUMMARY_CHAR_BUDGET + 500);
        assert_eq!(truncate_chars(&long, SUMMARY_CHAR_BUDGET).len(), SUMMARY_CHAR_BUDGET);
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("éèêë", 2), "éè");
    }

    #[test]
    fn test_summary_prompt_drops_overflow() {
        let doc = format!("{}{}", "x".repeat(SUMMARY_CHAR_BUDGET), "TAIL");
        let prompt = build_summary_prompt(&doc);
        assert!(prompt.starts_with("Create a clear, structured learning summary:\n"));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_evaluation_prompt_contains_inputs() {
        let prompt = build_evaluation_prompt("What is ATP?", "Energy currency", "Cells...");
        assert!(prompt.contains("QUESTION: What is ATP?"));
        assert!(prompt.contains("ANSWER: Energy currency"));
        assert!(prompt.contains("SUMMARY: Cells..."));
        assert!(prompt.contains("\"model_answer\""));
    }

    #[test]
    fn test_tutor_prompt_modes() {
        let free = build_tutor_prompt("What is a cell?", TutorMode::Free, Difficulty::Beginner, "ignored");
        assert_eq!(free, "You are an expert tutor. Level: Beginner\n\nWhat is a cell?");

        let doc = build_tutor_prompt(
            "Explain chapter 2",
            TutorMode::FromDocument,
            Difficulty::Advanced,
            "Chapter 2 covers enzymes.",
        );
        assert!(doc.contains("Level: Advanced"));
        assert!(doc.contains("DOCUMENT SUMMARY:\nChapter 2 covers enzymes."));
        assert!(doc.contains("QUESTION:\nExplain chapter 2"));
    }

    #[test]
    fn test_schemas_require_all_fields() {
        let eval = evaluation_schema();
        assert_eq!(eval["required"].as_array().unwrap().len(), 4);
        assert_eq!(questions_schema()["properties"]["questions"]["type"], "array");
    }
}
