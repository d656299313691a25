use base64::Engine;
use tauri::State;
use tracing::info;

use super::config::ai_settings;
use crate::ai;
use crate::state::AppState;

/// Describe an uploaded image and keep the result in image history.
#[tauri::command]
pub async fn analyze_image(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    image_name: String,
    image_base64: String,
) -> Result<String, String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(image_base64.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;
    info!("Analyzing image {} ({} bytes)", image_name, bytes.len());

    let settings = ai_settings(&app)?;
    let summary = ai::analyze_image(&settings, &bytes).await?;

    state.store()?.record_image_summary(&image_name, &summary)?;
    Ok(summary)
}
