//! Read-only views over the learning database.

use tauri::State;
use tracing::info;

use crate::history::{
    AssessmentRecord, ChatTurn, ImageHistoryEntry, IMAGE_HISTORY_LIMIT, RECENT_CHAT_LIMIT,
};
use crate::state::AppState;

/// The most recent chat lines, newest first.
#[tauri::command]
pub fn recent_chat(state: State<'_, AppState>) -> Result<Vec<ChatTurn>, String> {
    Ok(state.store()?.recent_chat(RECENT_CHAT_LIMIT)?)
}

/// The most recent image analyses, newest first.
#[tauri::command]
pub fn recent_images(state: State<'_, AppState>) -> Result<Vec<ImageHistoryEntry>, String> {
    Ok(state.store()?.recent_images(IMAGE_HISTORY_LIMIT)?)
}

/// Every stored assessment in insertion order.
#[tauri::command]
pub fn list_assessments(state: State<'_, AppState>) -> Result<Vec<AssessmentRecord>, String> {
    let rows = state.store()?.list_assessments()?;
    info!("Listed {} assessments", rows.len());
    Ok(rows)
}
