use std::path::Path;

use chrono::Local;
use rusqlite::{params, Connection, Row};
use tracing::info;

use super::types::{AssessmentRecord, ChatRole, ChatTurn, ImageHistoryEntry, NewAssessment};
use crate::error::TutorError;

/// How many chat lines the history view shows.
pub const RECENT_CHAT_LIMIT: usize = 10;

/// How many image analyses the history view shows.
pub const IMAGE_HISTORY_LIMIT: usize = 20;

/// SQLite store with three independent append-only tables.
/// All operations are synchronous (rusqlite is blocking).
pub struct TutorStore {
    conn: Connection,
}

impl TutorStore {
    /// Create or open the tutor database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, TutorError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TutorError::Storage(format!("Failed to create data dir: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        Self::init(conn, db_path)
    }

    /// In-memory store, used by tests and as a fallback.
    pub fn open_in_memory() -> Result<Self, TutorError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, Path::new(":memory:"))
    }

    fn init(conn: Connection, db_path: &Path) -> Result<Self, TutorError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chat (
                id INTEGER PRIMARY KEY,
                role TEXT,
                content TEXT,
                ts TEXT
            );
            CREATE TABLE IF NOT EXISTS assessments (
                id INTEGER PRIMARY KEY,
                question TEXT,
                answer TEXT,
                score INTEGER,
                strengths TEXT,
                weaknesses TEXT,
                model_answer TEXT
            );
            CREATE TABLE IF NOT EXISTS image_history (
                id INTEGER PRIMARY KEY,
                image_name TEXT,
                summary TEXT,
                ts TEXT
            );",
        )?;

        info!("Opened tutor database at {:?}", db_path);
        Ok(Self { conn })
    }

    fn now() -> String {
        Local::now().to_rfc3339()
    }

    /// Append one chat line. Returns the row id.
    pub fn record_chat_turn(&self, role: ChatRole, content: &str) -> Result<i64, TutorError> {
        self.conn.execute(
            "INSERT INTO chat (role, content, ts) VALUES (?1, ?2, ?3)",
            params![role.as_str(), content, Self::now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent chat lines, newest first.
    pub fn recent_chat(&self, limit: usize) -> Result<Vec<ChatTurn>, TutorError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, content, ts FROM chat ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ChatTurn {
                id: row.get(0)?,
                role: text_or_empty(row, 1)?,
                content: text_or_empty(row, 2)?,
                ts: text_or_empty(row, 3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Store an evaluated answer. Returns the row id.
    pub fn record_assessment(&self, assessment: &NewAssessment<'_>) -> Result<i64, TutorError> {
        self.conn.execute(
            "INSERT INTO assessments (question, answer, score, strengths, weaknesses, model_answer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                assessment.question,
                assessment.answer,
                assessment.score,
                assessment.strengths,
                assessment.weaknesses,
                assessment.model_answer,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Recorded assessment {} (score {:?})", id, assessment.score);
        Ok(id)
    }

    pub fn get_assessment(&self, id: i64) -> Result<AssessmentRecord, TutorError> {
        self.conn
            .query_row(
                "SELECT id, question, answer, score, strengths, weaknesses, model_answer
                 FROM assessments WHERE id = ?1",
                params![id],
                assessment_from_row,
            )
            .map_err(|e| TutorError::Storage(format!("Assessment {} not found: {}", id, e)))
    }

    /// Every assessment in insertion order.
    pub fn list_assessments(&self) -> Result<Vec<AssessmentRecord>, TutorError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question, answer, score, strengths, weaknesses, model_answer
             FROM assessments ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], assessment_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Store an image analysis. Returns the row id.
    pub fn record_image_summary(&self, image_name: &str, summary: &str) -> Result<i64, TutorError> {
        self.conn.execute(
            "INSERT INTO image_history (image_name, summary, ts) VALUES (?1, ?2, ?3)",
            params![image_name, summary, Self::now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent image analyses, newest first.
    pub fn recent_images(&self, limit: usize) -> Result<Vec<ImageHistoryEntry>, TutorError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, image_name, summary, ts FROM image_history ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ImageHistoryEntry {
                id: row.get(0)?,
                image_name: text_or_empty(row, 1)?,
                summary: text_or_empty(row, 2)?,
                ts: text_or_empty(row, 3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// Columns carry no NOT NULL constraint, so read them leniently.
fn text_or_empty(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn assessment_from_row(row: &Row<'_>) -> rusqlite::Result<AssessmentRecord> {
    Ok(AssessmentRecord {
        id: row.get(0)?,
        question: text_or_empty(row, 1)?,
        answer: text_or_empty(row, 2)?,
        score: row.get(3)?,
        strengths: text_or_empty(row, 4)?,
        weaknesses: text_or_empty(row, 5)?,
        model_answer: text_or_empty(row, 6)?,
    })
}
