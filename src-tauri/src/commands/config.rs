use keyring::Entry;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{info, warn};

use crate::ai::{AiSettings, Provider};
use crate::error::TutorError;

pub(crate) const PREFERENCES_FILE: &str = "preferences.json";
pub(crate) const KEYRING_USER: &str = "learntutor";

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    Ok(read_preference(&app, key)?)
}

#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {} = {}", key, value);
    Ok(write_preference(&app, key, value)?)
}

pub(crate) fn read_preference(app: &AppHandle, key: &str) -> Result<Option<String>, TutorError> {
    let store = app.store(PREFERENCES_FILE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        TutorError::Config(e.to_string())
    })?;
    Ok(store
        .get(key)
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .filter(|s| !s.is_empty()))
}

pub(crate) fn write_preference(app: &AppHandle, key: &str, value: &str) -> Result<(), TutorError> {
    let store = app.store(PREFERENCES_FILE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        TutorError::Config(e.to_string())
    })?;
    store.set(key, serde_json::json!(value));
    store.save().map_err(|e| {
        warn!("Failed to save store: {}", e);
        TutorError::Config(e.to_string())
    })
}

/// Look up a provider's key: keychain first, then the environment.
pub(crate) fn api_key_for(provider: Provider) -> Result<String, TutorError> {
    let entry = Entry::new(&provider.keyring_service(), KEYRING_USER)
        .map_err(|e| TutorError::Keychain(e.to_string()))?;
    match entry.get_password() {
        Ok(key) => Ok(key),
        Err(keyring::Error::NoEntry) => std::env::var(provider.env_var())
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                TutorError::Config(format!(
                    "No API key configured for '{}'. Please set it in Settings.",
                    provider.id()
                ))
            }),
        Err(e) => Err(TutorError::Keychain(format!(
            "Failed to read API key for '{}': {}",
            provider.id(),
            e
        ))),
    }
}

/// Resolve provider, model and key for a model call from preferences.
pub(crate) fn ai_settings(app: &AppHandle) -> Result<AiSettings, TutorError> {
    let provider_name = read_preference(app, "ai_provider")?;
    let provider = match provider_name {
        Some(name) => Provider::parse(&name)?,
        None => Provider::Gemini,
    };
    let model = read_preference(app, "ai_model")?
        .unwrap_or_else(|| provider.default_model().to_string());
    let api_key = api_key_for(provider)?;

    Ok(AiSettings {
        provider,
        model,
        api_key,
    })
}
