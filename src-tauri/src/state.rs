//! Process-wide state managed by Tauri and handed to every command.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::history::TutorStore;
use crate::session::LearningSession;

pub const DB_FILE_NAME: &str = "learntutor.db";

pub struct AppState {
    session: Mutex<LearningSession>,
    store: Mutex<TutorStore>,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl AppState {
    pub fn new(store: TutorStore, data_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            session: Mutex::new(LearningSession::default()),
            store: Mutex::new(store),
            data_dir,
            cache_dir,
        }
    }

    /// Lock the learning session. Never hold the guard across an `.await`.
    pub fn session(&self) -> Result<MutexGuard<'_, LearningSession>, String> {
        self.session
            .lock()
            .map_err(|_| "Session state is unavailable after a previous failure".to_string())
    }

    pub fn store(&self) -> Result<MutexGuard<'_, TutorStore>, String> {
        self.store
            .lock()
            .map_err(|_| "Database handle is unavailable after a previous failure".to_string())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
