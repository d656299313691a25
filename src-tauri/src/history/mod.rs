//! Local SQLite persistence for chat turns, assessments and image summaries.

pub mod store;
pub mod types;

pub use store::{TutorStore, IMAGE_HISTORY_LIMIT, RECENT_CHAT_LIMIT};
pub use types::{AssessmentRecord, ChatRole, ChatTurn, ImageHistoryEntry, NewAssessment};
