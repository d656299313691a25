use base64::Engine;
use serde::Serialize;
use tauri::State;
use tracing::warn;

use super::config::read_preference;
use crate::speech::speak_to_file;
use crate::state::AppState;

const DEFAULT_TTS_LANG: &str = "en";

#[derive(Debug, Clone, Serialize)]
pub struct SpokenText {
    pub path: String,
    pub audio_base64: String,
}

/// Synthesize `text` to MP3 in the cache dir and hand the audio back for playback.
#[tauri::command]
pub async fn speak_text(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    text: String,
) -> Result<SpokenText, String> {
    if text.trim().is_empty() {
        return Err("Nothing to read aloud.".to_string());
    }
    let lang = match read_preference(&app, "tts_lang") {
        Ok(lang) => lang.unwrap_or_else(|| DEFAULT_TTS_LANG.to_string()),
        Err(e) => {
            warn!("Falling back to default speech language: {}", e);
            DEFAULT_TTS_LANG.to_string()
        }
    };

    let (path, audio) = speak_to_file(&text, &lang, &state.cache_dir).await?;
    Ok(SpokenText {
        path: path.to_string_lossy().to_string(),
        audio_base64: base64::engine::general_purpose::STANDARD.encode(&audio),
    })
}
