//! The five tutor operations backed by the generative model.
//!
//! Each builds its prompt, makes one provider call and turns the reply into
//! a typed value. None of them retry; provider errors propagate as-is.

use tracing::{info, warn};

use super::image_prep::prepare_image;
use super::prompts::{
    build_evaluation_prompt, build_questions_prompt, build_summary_prompt, build_tutor_prompt,
    evaluation_schema, questions_schema, IMAGE_INSTRUCTION, QUESTION_COUNT, SUMMARY_CHAR_BUDGET,
};
use super::provider::{generate, AiSettings, ModelRequest};
use super::types::{parse_evaluation, parse_questions, Evaluation, TutorMode};
use crate::error::TutorError;
use crate::session::Difficulty;

/// Summarize document text for study. Only the first 8000 characters are sent.
pub async fn summarize(settings: &AiSettings, doc_text: &str) -> Result<String, TutorError> {
    let total_chars = doc_text.chars().count();
    if total_chars > SUMMARY_CHAR_BUDGET {
        warn!(
            "Document has {} chars, summarizing the first {} ({} dropped)",
            total_chars,
            SUMMARY_CHAR_BUDGET,
            total_chars - SUMMARY_CHAR_BUDGET
        );
    }

    let prompt = build_summary_prompt(doc_text);
    let summary = generate(settings, &ModelRequest::text(&prompt)).await?;
    Ok(summary.trim().to_string())
}

/// Generate quiz questions from a summary.
///
/// A reply without any usable JSON produces an empty list, not an error.
pub async fn generate_questions(
    settings: &AiSettings,
    summary: &str,
) -> Result<Vec<String>, TutorError> {
    let prompt = build_questions_prompt(summary);
    let schema = questions_schema();
    let reply = generate(
        settings,
        &ModelRequest::structured(&prompt, &schema, "question_set"),
    )
    .await?;

    let questions = parse_questions(&reply);
    if questions.len() != QUESTION_COUNT {
        warn!(
            "Asked for {} questions, model returned {}",
            QUESTION_COUNT,
            questions.len()
        );
    }
    Ok(questions)
}

/// Score a learner's answer against the document summary.
pub async fn evaluate_answer(
    settings: &AiSettings,
    question: &str,
    answer: &str,
    summary: &str,
) -> Result<Evaluation, TutorError> {
    let prompt = build_evaluation_prompt(question, answer, summary);
    let schema = evaluation_schema();
    let reply = generate(
        settings,
        &ModelRequest::structured(&prompt, &schema, "answer_evaluation"),
    )
    .await?;

    let evaluation = parse_evaluation(&reply)?;
    info!("Evaluated answer: score {}", evaluation.score);
    Ok(evaluation)
}

/// Describe an uploaded image for study purposes.
pub async fn analyze_image(settings: &AiSettings, image_bytes: &[u8]) -> Result<String, TutorError> {
    let image = prepare_image(image_bytes)?;
    let reply = generate(
        settings,
        &ModelRequest::text(IMAGE_INSTRUCTION).with_image(&image),
    )
    .await?;
    Ok(reply.trim().to_string())
}

/// Answer a free-form question at the learner's current level.
pub async fn tutor_reply(
    settings: &AiSettings,
    question: &str,
    mode: TutorMode,
    level: Difficulty,
    summary: &str,
) -> Result<String, TutorError> {
    info!("Tutor question in {:?} mode at {} level", mode, level.label());
    let prompt = build_tutor_prompt(question, mode, level, summary);
    let reply = generate(settings, &ModelRequest::text(&prompt)).await?;
    Ok(reply.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::Provider;

    fn offline_settings() -> AiSettings {
        AiSettings {
            provider: Provider::Gemini,
            model: "gemini-2.5-flash".to_string(),
            api_key: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analyze_image_rejects_invalid_before_network() {
        let result = analyze_image(&offline_settings(), b"not an image").await;
        let err = result.unwrap_err();
        assert!(
            matches!(err, TutorError::Image(_)),
            "Expected image error, got: {}",
            err
        );
    }
}
