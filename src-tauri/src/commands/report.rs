use base64::Engine;
use serde::Serialize;
use tauri::State;
use tracing::info;

use crate::report::{build_report, REPORT_FILE_NAME};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ExportedReport {
    pub path: String,
    pub pdf_base64: String,
    pub assessment_count: usize,
}

/// Write the learning report PDF to the app data directory.
#[tauri::command]
pub fn export_report(state: State<'_, AppState>) -> Result<ExportedReport, String> {
    let average = state.session()?.average_score();
    let rows = state.store()?.list_assessments()?;

    let pdf = build_report(average, &rows)?;
    std::fs::create_dir_all(&state.data_dir)
        .map_err(|e| format!("Failed to create data dir: {}", e))?;
    let path = state.data_dir.join(REPORT_FILE_NAME);
    std::fs::write(&path, &pdf).map_err(|e| format!("Failed to write report: {}", e))?;

    info!(
        "Exported report with {} assessments to {}",
        rows.len(),
        path.display()
    );
    Ok(ExportedReport {
        path: path.to_string_lossy().to_string(),
        pdf_base64: base64::engine::general_purpose::STANDARD.encode(&pdf),
        assessment_count: rows.len(),
    })
}
