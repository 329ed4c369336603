//! Due-entry selection and progress aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::{MasteryLevel, VocabularyEntry, DEFAULT_EASE_FACTOR};

/// Select the entries due for review, most overdue first.
///
/// Archived entries and entries with a future `next_review_at` are excluded.
/// Entries that have never been reviewed (`next_review_at` is None) sort
/// before everything else; ties break toward the less-mastered word.
pub fn select_due(entries: &[VocabularyEntry], limit: Option<usize>) -> Vec<&VocabularyEntry> {
    let now = Utc::now();
    let mut due: Vec<&VocabularyEntry> = entries
        .iter()
        .filter(|e| !e.is_archived)
        .filter(|e| e.next_review_at.map_or(true, |at| at <= now))
        .collect();

    due.sort_by_key(|e| {
        let at = e
            .next_review_at
            .map_or(0, |at: DateTime<Utc>| at.timestamp_millis());
        (at, e.mastery_level.as_index())
    });

    if let Some(limit) = limit {
        due.truncate(limit);
    }
    due
}

/// Aggregate learning progress across a vocabulary set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Non-archived entries
    pub total_words: usize,
    pub new_words: usize,
    pub learning_words: usize,
    pub reviewing_words: usize,
    pub familiar_words: usize,
    pub mastered_words: usize,
    /// Share of entries at the Mastered tier, 0-100
    pub mastery_percent: f32,
    pub total_reviews: i64,
    pub total_correct: i64,
    /// Correct reviews over total reviews, 0-100
    pub accuracy_percent: f32,
    pub average_ease_factor: f32,
}

impl Default for ProgressSummary {
    fn default() -> Self {
        Self {
            total_words: 0,
            new_words: 0,
            learning_words: 0,
            reviewing_words: 0,
            familiar_words: 0,
            mastered_words: 0,
            mastery_percent: 0.0,
            total_reviews: 0,
            total_correct: 0,
            accuracy_percent: 0.0,
            // The system default, not a computed zero
            average_ease_factor: DEFAULT_EASE_FACTOR,
        }
    }
}

/// Compute progress over the non-archived entries.
///
/// Returns the zeroed default (ease factor 2.5) when there is nothing to count.
pub fn aggregate_progress(entries: &[VocabularyEntry]) -> ProgressSummary {
    let active: Vec<&VocabularyEntry> = entries.iter().filter(|e| !e.is_archived).collect();
    if active.is_empty() {
        return ProgressSummary::default();
    }

    let mut summary = ProgressSummary {
        total_words: active.len(),
        ..Default::default()
    };

    let mut ease_sum = 0.0_f32;
    for entry in &active {
        match entry.mastery_level {
            MasteryLevel::New => summary.new_words += 1,
            MasteryLevel::Learning => summary.learning_words += 1,
            MasteryLevel::Reviewing => summary.reviewing_words += 1,
            MasteryLevel::Familiar => summary.familiar_words += 1,
            MasteryLevel::Mastered => summary.mastered_words += 1,
        }
        summary.total_reviews += entry.review_count as i64;
        summary.total_correct += entry.correct_count as i64;
        ease_sum += entry.ease_factor;
    }

    summary.mastery_percent = summary.mastered_words as f32 / summary.total_words as f32 * 100.0;
    summary.accuracy_percent = if summary.total_reviews > 0 {
        summary.total_correct as f32 / summary.total_reviews as f32 * 100.0
    } else {
        0.0
    };
    summary.average_ease_factor = ease_sum / summary.total_words as f32;

    summary
}
