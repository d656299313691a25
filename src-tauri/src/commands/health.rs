use serde::Serialize;
use tauri::State;
use tracing::info;

use super::config::KEYRING_USER;
use crate::ai::Provider;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderKeyStatus {
    pub provider: String,
    pub key_set: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub database_path: String,
    pub database_ok: bool,
    pub data_dir_writable: bool,
    pub providers: Vec<ProviderKeyStatus>,
}

fn provider_key_set(provider: Provider) -> bool {
    let in_keychain = keyring::Entry::new(&provider.keyring_service(), KEYRING_USER)
        .and_then(|e| e.get_password())
        .is_ok();
    in_keychain || std::env::var(provider.env_var()).is_ok_and(|k| !k.trim().is_empty())
}

#[tauri::command]
pub fn run_health_check(state: State<'_, AppState>) -> Result<HealthReport, String> {
    info!("Running health check");

    let database_ok = state
        .store()
        .map(|store| store.recent_chat(1).is_ok())
        .unwrap_or(false);

    let probe = state.data_dir.join(".write_probe");
    let data_dir_writable = std::fs::write(&probe, b"ok").is_ok();
    let _ = std::fs::remove_file(&probe);

    let providers: Vec<ProviderKeyStatus> = Provider::ALL
        .iter()
        .map(|p| ProviderKeyStatus {
            provider: p.id().to_string(),
            key_set: provider_key_set(*p),
        })
        .collect();
    info!(
        "Database ok: {}, data dir writable: {}, keys: {:?}",
        database_ok,
        data_dir_writable,
        providers
            .iter()
            .map(|p| format!("{}={}", p.provider, p.key_set))
            .collect::<Vec<_>>()
    );

    Ok(HealthReport {
        database_path: state.db_path().to_string_lossy().to_string(),
        database_ok,
        data_dir_writable,
        providers,
    })
}
