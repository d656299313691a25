//! Per-window learning session.
//!
//! Holds everything the tutor knows about the current study run: the
//! uploaded document, its summary, the generated questions and the scores
//! earned so far. Nothing here is persisted; the database only sees
//! chat turns, assessments and image summaries.

use serde::{Deserialize, Serialize};

/// Score below which an evaluation's weaknesses are tracked as a weak area.
pub const WEAK_AREA_THRESHOLD: i64 = 5;

/// Learner level derived from the running average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Below 4 is Beginner, below 7 is Intermediate, anything else Advanced.
    pub fn from_average(avg: f64) -> Self {
        if avg < 4.0 {
            Difficulty::Beginner
        } else if avg < 7.0 {
            Difficulty::Intermediate
        } else {
            Difficulty::Advanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// Mean of the recorded scores, 0.0 when nothing has been scored yet.
pub fn average_score(scores: &[i64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<i64>() as f64 / scores.len() as f64
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningSession {
    pub doc_text: String,
    pub summary: String,
    pub questions: Vec<String>,
    pub scores: Vec<i64>,
    pub weak_areas: Vec<String>,
    pub ready: bool,
    pub dark_mode: bool,
}

/// What the frontend needs to render the dashboard tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub average_score: f64,
    pub attempts: usize,
    pub weak_area_count: usize,
    pub difficulty: Difficulty,
}

impl LearningSession {
    /// Drop all document and scoring state. The theme choice survives.
    pub fn reset(&mut self) {
        let dark_mode = self.dark_mode;
        *self = LearningSession {
            dark_mode,
            ..Default::default()
        };
    }

    /// Install a freshly analyzed document, replacing the previous one.
    pub fn load_document(&mut self, doc_text: String, summary: String, questions: Vec<String>) {
        self.doc_text = doc_text;
        self.summary = summary;
        self.questions = questions;
        self.ready = true;
    }

    /// Record the outcome of one evaluated answer.
    ///
    /// A missing score is not counted towards the average.
    pub fn record_score(&mut self, score: Option<i64>, weaknesses: &str) {
        let Some(score) = score else {
            return;
        };
        self.scores.push(score);
        let weaknesses = weaknesses.trim();
        if score < WEAK_AREA_THRESHOLD && !weaknesses.is_empty() {
            self.weak_areas.push(weaknesses.to_string());
        }
    }

    pub fn average_score(&self) -> f64 {
        average_score(&self.scores)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_average(self.average_score())
    }

    pub fn dashboard(&self) -> DashboardStats {
        let mut distinct: Vec<&str> = self.weak_areas.iter().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();

        DashboardStats {
            average_score: round2(self.average_score()),
            attempts: self.scores.len(),
            weak_area_count: distinct.len(),
            difficulty: self.difficulty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_boundaries() {
        assert_eq!(Difficulty::from_average(3.9), Difficulty::Beginner);
        assert_eq!(Difficulty::from_average(4.0), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_average(6.9), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_average(7.0), Difficulty::Advanced);
        assert_eq!(Difficulty::from_average(0.0).label(), "Beginner");
    }

    #[test]
    fn test_average_score() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[4, 8]), 6.0);
        assert_eq!(round2(average_score(&[7, 8, 8])), 7.67);
    }

    #[test]
    fn test_default_session() {
        let session = LearningSession::default();
        assert!(session.doc_text.is_empty());
        assert!(session.questions.is_empty());
        assert!(!session.ready);
        assert!(!session.dark_mode);
        assert_eq!(session.difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn test_reset_keeps_dark_mode() {
        let mut session = LearningSession::default();
        session.dark_mode = true;
        session.load_document("text".into(), "summary".into(), vec!["Q1".into()]);
        session.record_score(Some(3), "Misses the key definition");

        session.reset();

        assert!(session.dark_mode);
        assert!(!session.ready);
        assert!(session.summary.is_empty());
        assert!(session.scores.is_empty());
        assert!(session.weak_areas.is_empty());
    }

    #[test]
    fn test_record_score_tracks_weak_areas() {
        let mut session = LearningSession::default();
        session.record_score(Some(2), "No examples");
        session.record_score(Some(9), "Slightly verbose");
        session.record_score(Some(4), "No examples");
        session.record_score(None, "ignored");

        assert_eq!(session.scores, vec![2, 9, 4]);
        assert_eq!(session.weak_areas.len(), 2);

        let stats = session.dashboard();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.weak_area_count, 1);
        assert_eq!(stats.average_score, 5.0);
        assert_eq!(stats.difficulty, Difficulty::Intermediate);
    }
}
