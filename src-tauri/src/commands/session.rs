use serde::Serialize;
use tauri::State;
use tracing::{info, warn};

use super::config::write_preference;
use crate::session::{round2, DashboardStats, Difficulty};
use crate::state::AppState;

/// Session fields the frontend renders; the raw document text stays behind.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub ready: bool,
    pub summary: String,
    pub questions: Vec<String>,
    pub scores: Vec<i64>,
    pub average_score: f64,
    pub difficulty: Difficulty,
    pub dark_mode: bool,
}

#[tauri::command]
pub fn get_session(state: State<'_, AppState>) -> Result<SessionView, String> {
    let session = state.session()?;
    Ok(SessionView {
        ready: session.ready,
        summary: session.summary.clone(),
        questions: session.questions.clone(),
        scores: session.scores.clone(),
        average_score: round2(session.average_score()),
        difficulty: session.difficulty(),
        dark_mode: session.dark_mode,
    })
}

#[tauri::command]
pub fn reset_session(state: State<'_, AppState>) -> Result<(), String> {
    info!("Resetting learning session");
    state.session()?.reset();
    Ok(())
}

/// Toggle the theme for this session and remember it for the next launch.
#[tauri::command]
pub fn set_dark_mode(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    enabled: bool,
) -> Result<(), String> {
    state.session()?.dark_mode = enabled;
    if let Err(e) = write_preference(&app, "dark_mode", if enabled { "true" } else { "false" }) {
        warn!("Dark mode not persisted: {}", e);
    }
    Ok(())
}

#[tauri::command]
pub fn dashboard_stats(state: State<'_, AppState>) -> Result<DashboardStats, String> {
    Ok(state.session()?.dashboard())
}
