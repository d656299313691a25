//! Document learning: upload a PDF, get a summary and a quiz.

use base64::Engine;
use serde::Serialize;
use tauri::State;
use tracing::info;

use super::config::ai_settings;
use crate::ai::{self, prompts::SUMMARY_CHAR_BUDGET};
use crate::ingest::extract_pdf_text;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub summary: String,
    pub questions: Vec<String>,
    /// Characters of text extracted from the PDF.
    pub char_count: usize,
    /// True when only the first part of the text was summarized.
    pub truncated: bool,
}

/// Extract, summarize and quiz a PDF, replacing the session's document.
#[tauri::command]
pub async fn analyze_pdf(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    pdf_base64: String,
) -> Result<DocumentAnalysis, String> {
    let pdf_bytes = base64::engine::general_purpose::STANDARD
        .decode(pdf_base64.trim())
        .map_err(|e| format!("Invalid base64 PDF data: {}", e))?;
    info!("Analyzing PDF upload ({} bytes)", pdf_bytes.len());

    let doc_text = extract_pdf_text(&pdf_bytes)?;
    let char_count = doc_text.chars().count();

    let settings = ai_settings(&app)?;
    let summary = ai::summarize(&settings, &doc_text).await?;
    let questions = ai::generate_questions(&settings, &summary).await?;

    state
        .session()?
        .load_document(doc_text, summary.clone(), questions.clone());

    info!(
        "PDF analyzed: {} chars, {} questions",
        char_count,
        questions.len()
    );
    Ok(DocumentAnalysis {
        summary,
        questions,
        char_count,
        truncated: char_count > SUMMARY_CHAR_BUDGET,
    })
}
