//! Answer evaluation for the quiz, typed or spoken.

use base64::Engine;
use serde::Serialize;
use tauri::State;
use tracing::{info, warn};

use super::config::ai_settings;
use crate::ai::{self, Evaluation};
use crate::history::NewAssessment;
use crate::session::{round2, Difficulty};
use crate::speech::{self, Transcription};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub index: usize,
    pub assessment_id: i64,
    pub evaluation: Evaluation,
    pub average_score: f64,
    pub difficulty: Difficulty,
}

/// Store an evaluated answer, then fold its score into the session.
///
/// Returns the new row id, the rounded average and the resulting level.
pub(crate) fn apply_evaluation(
    state: &AppState,
    question: &str,
    answer: &str,
    evaluation: &Evaluation,
) -> Result<(i64, f64, Difficulty), String> {
    let assessment_id = state.store()?.record_assessment(&NewAssessment {
        question,
        answer,
        score: Some(evaluation.score),
        strengths: &evaluation.strengths,
        weaknesses: &evaluation.weaknesses,
        model_answer: &evaluation.model_answer,
    })?;

    let mut session = state.session()?;
    session.record_score(Some(evaluation.score), &evaluation.weaknesses);
    Ok((assessment_id, round2(session.average_score()), session.difficulty()))
}

/// Evaluate one quiz answer, store it, and update the running average.
#[tauri::command]
pub async fn evaluate_answer(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    index: usize,
    question: String,
    answer: String,
) -> Result<AssessmentOutcome, String> {
    let summary = {
        let session = state.session()?;
        if !session.ready {
            return Err("Upload and analyze a PDF before answering questions.".to_string());
        }
        session.summary.clone()
    };
    if answer.trim().is_empty() {
        warn!("Evaluating an empty answer for question {}", index + 1);
    }

    let settings = ai_settings(&app)?;
    let evaluation = ai::evaluate_answer(&settings, &question, &answer, &summary).await?;

    let (assessment_id, average_score, difficulty) =
        apply_evaluation(&state, &question, &answer, &evaluation)?;

    info!(
        "Question {} scored {} (assessment {}, average {:.2})",
        index + 1,
        evaluation.score,
        assessment_id,
        average_score
    );
    Ok(AssessmentOutcome {
        index,
        assessment_id,
        evaluation,
        average_score,
        difficulty,
    })
}

/// Turn a recorded answer into text. Failures come back as a
/// `Transcription` variant rather than an error.
#[tauri::command]
pub async fn transcribe_answer(audio_base64: String) -> Result<Transcription, String> {
    let audio = base64::engine::general_purpose::STANDARD
        .decode(audio_base64.trim())
        .map_err(|e| format!("Invalid base64 audio data: {}", e))?;
    info!("Transcribing answer audio ({} bytes)", audio.len());
    Ok(speech::transcribe(&audio).await)
}
