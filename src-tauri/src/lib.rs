pub mod ai;
mod commands;
pub mod error;
pub mod history;
pub mod ingest;
pub mod report;
pub mod session;
pub mod speech;
pub mod state;

use anyhow::Context;
use tauri::Manager;
use tauri_plugin_store::StoreExt;

pub use error::TutorError;
pub use history::{AssessmentRecord, ChatTurn, ImageHistoryEntry, TutorStore};
pub use session::{DashboardStats, Difficulty, LearningSession};
pub use state::AppState;

/// Open the database under the app data dir and build the managed state.
fn init_state(app: &tauri::App) -> anyhow::Result<AppState> {
    let data_dir = app
        .path()
        .app_data_dir()
        .context("Failed to resolve app data dir")?;
    let cache_dir = app
        .path()
        .app_cache_dir()
        .context("Failed to resolve app cache dir")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let store = TutorStore::open(&data_dir.join(state::DB_FILE_NAME))
        .context("Failed to open learning database")?;
    let state = AppState::new(store, data_dir, cache_dir);

    // Theme survives restarts; nothing else in the session does.
    if let Ok(prefs) = app.store(commands::config::PREFERENCES_FILE) {
        let dark = prefs
            .get("dark_mode")
            .and_then(|v| v.as_str().map(|s| s == "true"))
            .unwrap_or(false);
        if let Ok(mut session) = state.session() {
            session.dark_mode = dark;
        }
    }
    Ok(state)
}

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            commands::keychain::set_api_key,
            commands::keychain::get_api_key,
            commands::keychain::delete_api_key,
            commands::config::get_preference,
            commands::config::set_preference,
            commands::health::run_health_check,
            commands::models::list_models,
            commands::document::analyze_pdf,
            commands::session::get_session,
            commands::session::reset_session,
            commands::session::set_dark_mode,
            commands::session::dashboard_stats,
            commands::assessment::evaluate_answer,
            commands::assessment::transcribe_answer,
            commands::tutor::ask_tutor,
            commands::image::analyze_image,
            commands::history::recent_chat,
            commands::history::recent_images,
            commands::history::list_assessments,
            commands::report::export_report,
            commands::speech::speak_text,
        ])
        .setup(|app| {
            let state = init_state(app)?;
            tracing::info!("Learning database at {}", state.db_path().display());
            app.manage(state);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
