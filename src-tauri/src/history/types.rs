use serde::{Deserialize, Serialize};

/// Who said a chat line. Stored as "User" / "Tutor".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Tutor,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Tutor => "Tutor",
        }
    }
}

/// One persisted line of the tutoring chat.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub id: i64,
    /// Kept as text so rows written by other tools still load.
    pub role: String,
    pub content: String,
    pub ts: String,
}

/// Fields of an assessment before it has a row id.
#[derive(Debug, Clone)]
pub struct NewAssessment<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub score: Option<i64>,
    pub strengths: &'a str,
    pub weaknesses: &'a str,
    pub model_answer: &'a str,
}

/// A stored, evaluated answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Not range-checked; NULL when the model gave none.
    pub score: Option<i64>,
    pub strengths: String,
    pub weaknesses: String,
    pub model_answer: String,
}

/// A stored image analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ImageHistoryEntry {
    pub id: i64,
    pub image_name: String,
    pub summary: String,
    pub ts: String,
}
