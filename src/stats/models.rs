//! Study statistics data models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of session a review happened in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReviewMode {
    #[default]
    Flashcard,
    Quiz,
    Typing,
}

/// One review session from start to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub id: Uuid,
    pub mode: ReviewMode,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_count: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub skipped_count: u32,
}

impl ReviewSession {
    pub fn start(mode: ReviewMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            started_at: Utc::now(),
            completed_at: None,
            total_count: 0,
            correct_count: 0,
            incorrect_count: 0,
            skipped_count: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Record one answer; ignored once the session is completed
    pub fn record_answer(&mut self, correct: bool) {
        if self.is_completed() {
            log::warn!("Stats: answer recorded on a completed session, ignoring");
            return;
        }
        self.total_count += 1;
        if correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }
    }

    /// Record a skipped card; ignored once the session is completed
    pub fn record_skip(&mut self) {
        if self.is_completed() {
            return;
        }
        self.total_count += 1;
        self.skipped_count += 1;
    }

    /// Mark the session finished. Completing twice keeps the first timestamp.
    pub fn complete(&mut self) {
        if self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }

    /// Wall-clock duration; measured up to now for a session still running
    pub fn duration_seconds(&self) -> i64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds().max(0)
    }
}

/// Per-day learning activity counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLearningStats {
    pub date: NaiveDate,
    pub words_added: u32,
    pub words_reviewed: u32,
    pub correct_reviews: u32,
    pub incorrect_reviews: u32,
    pub study_time_seconds: u32,
}

impl DailyLearningStats {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            words_added: 0,
            words_reviewed: 0,
            correct_reviews: 0,
            incorrect_reviews: 0,
            study_time_seconds: 0,
        }
    }

    /// Whether any learning activity happened this day
    pub fn is_active(&self) -> bool {
        self.words_added > 0 || self.words_reviewed > 0 || self.study_time_seconds > 0
    }
}
