use tauri::State;
use tracing::info;

use super::config::ai_settings;
use crate::ai::{self, TutorMode};
use crate::history::ChatRole;
use crate::state::AppState;

/// Trim a chat question, rejecting one with no content.
pub(crate) fn validate_question(question: &str) -> Result<String, String> {
    let question = question.trim();
    if question.is_empty() {
        return Err("Please enter a question.".to_string());
    }
    Ok(question.to_string())
}

/// Persist one answered exchange: the learner's line, then the tutor's.
pub(crate) fn record_exchange(state: &AppState, question: &str, reply: &str) -> Result<(), String> {
    let store = state.store()?;
    store.record_chat_turn(ChatRole::User, question)?;
    store.record_chat_turn(ChatRole::Tutor, reply)?;
    Ok(())
}

/// Ask the tutor a question. In document mode the stored summary is used
/// as context, and is empty until a PDF has been analyzed.
#[tauri::command]
pub async fn ask_tutor(
    app: tauri::AppHandle,
    state: State<'_, AppState>,
    question: String,
    mode: TutorMode,
) -> Result<String, String> {
    let question = validate_question(&question)?;

    let (level, summary) = {
        let session = state.session()?;
        (session.difficulty(), session.summary.clone())
    };

    let settings = ai_settings(&app)?;
    let reply = ai::tutor_reply(&settings, &question, mode, level, &summary).await?;

    record_exchange(&state, &question, &reply)?;
    info!("Tutor replied ({} chars)", reply.len());
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::TutorStore;
    use std::path::PathBuf;

    fn test_state() -> AppState {
        let store = TutorStore::open_in_memory().unwrap();
        AppState::new(store, PathBuf::from("/data"), PathBuf::from("/cache"))
    }

    #[test]
    fn test_validate_question_rejects_blank() {
        assert_eq!(validate_question("   \n").unwrap_err(), "Please enter a question.");
        assert_eq!(validate_question("  What is ATP? ").unwrap(), "What is ATP?");
    }

    #[test]
    fn test_record_exchange_user_then_tutor() {
        let state = test_state();
        record_exchange(&state, "What is ATP?", "The cell's energy currency.").unwrap();

        let chat = state.store().unwrap().recent_chat(10).unwrap();
        assert_eq!(chat.len(), 2);
        // Newest first
        assert_eq!(chat[0].role, "Tutor");
        assert_eq!(chat[0].content, "The cell's energy currency.");
        assert_eq!(chat[1].role, "User");
        assert_eq!(chat[1].content, "What is ATP?");
        assert!(chat[1].id < chat[0].id);
    }

    #[test]
    fn test_blank_question_writes_nothing() {
        let state = test_state();
        assert!(validate_question("").is_err());
        assert!(state.store().unwrap().recent_chat(10).unwrap().is_empty());
    }
}
