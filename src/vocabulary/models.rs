//! Data models for the vocabulary system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default SM-2 ease factor for a new entry
pub const DEFAULT_EASE_FACTOR: f32 = 2.5;

/// Mastery tier of an entry, derived from its review interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MasteryLevel {
    /// Never reviewed (interval 0)
    New,
    /// Interval under a week
    Learning,
    /// Interval under three weeks
    Reviewing,
    /// Interval under two months
    Familiar,
    /// Interval of two months or more
    Mastered,
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::New
    }
}

impl MasteryLevel {
    /// Numeric tier (0-4), used for wire serialization and sort keys
    pub fn as_index(self) -> i64 {
        match self {
            Self::New => 0,
            Self::Learning => 1,
            Self::Reviewing => 2,
            Self::Familiar => 3,
            Self::Mastered => 4,
        }
    }

    /// Tier from a numeric value; out-of-range values clamp to the ends
    pub fn from_index(index: i64) -> Self {
        match index {
            i if i <= 0 => Self::New,
            1 => Self::Learning,
            2 => Self::Reviewing,
            3 => Self::Familiar,
            _ => Self::Mastered,
        }
    }
}

/// Replication state of an entry relative to the remote backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    /// Local changes not yet confirmed on the remote
    Pending,
    /// Remote copy matches the last local write
    Synced,
    /// Last push attempt for this entry failed; retried on the next sync
    Failed,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Normalize a word for storage and lookup: trimmed and lower-cased
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// One learned word with its review state and sync bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    /// Unique identifier, assigned locally at creation
    pub id: Uuid,
    /// Normalized word text, unique among non-archived entries
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_cn: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form note the learner attached when capturing the word
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Soft delete: archived entries are excluded from due queries
    /// and from the uniqueness check
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub mastery_level: MasteryLevel,
    /// SM-2 ease factor, never below 1.3
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// Current review interval in days
    #[serde(default)]
    pub interval: i32,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub correct_count: i32,
    /// Set only by a review event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// None or a past timestamp means the entry is due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every field mutation, local or merged from remote
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    /// Remote identifier, set once the entry is first pushed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,
}

fn default_ease_factor() -> f32 {
    DEFAULT_EASE_FACTOR
}

impl VocabularyEntry {
    /// Create a new entry for a word. The word is normalized here;
    /// uniqueness is the caller's responsibility.
    pub fn new(word: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            word: normalize_word(word),
            phonetic: None,
            part_of_speech: None,
            definition_en: None,
            definition_cn: None,
            examples: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            tags: Vec::new(),
            category: None,
            user_context: None,
            is_favorite: false,
            is_archived: false,
            mastery_level: MasteryLevel::New,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            review_count: 0,
            correct_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::Pending,
            backend_id: None,
        }
    }

    /// Check whether the entry is due for review
    pub fn is_due(&self) -> bool {
        !self.is_archived
            && self
                .next_review_at
                .map_or(true, |due| due <= Utc::now())
    }

    /// Stamp a local mutation: bump `updated_at` and mark the entry pending
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.sync_status = SyncStatus::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Serendipity "), "serendipity");
        assert_eq!(normalize_word("HELLO"), "hello");
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = VocabularyEntry::new(" Ephemeral ");
        assert_eq!(entry.word, "ephemeral");
        assert_eq!(entry.interval, 0);
        assert_eq!(entry.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(entry.mastery_level, MasteryLevel::New);
        assert_eq!(entry.sync_status, SyncStatus::Pending);
        assert!(entry.backend_id.is_none());
        assert!(entry.is_due());
    }

    #[test]
    fn test_due_check() {
        let mut entry = VocabularyEntry::new("word");
        entry.next_review_at = Some(Utc::now() + Duration::days(2));
        assert!(!entry.is_due());

        entry.next_review_at = Some(Utc::now() - Duration::hours(1));
        assert!(entry.is_due());

        entry.is_archived = true;
        assert!(!entry.is_due());
    }

    #[test]
    fn test_touch_marks_pending() {
        let mut entry = VocabularyEntry::new("word");
        entry.sync_status = SyncStatus::Synced;
        let before = entry.updated_at;
        entry.touch();
        assert_eq!(entry.sync_status, SyncStatus::Pending);
        assert!(entry.updated_at >= before);
    }

    #[test]
    fn test_mastery_index_round_trip() {
        for level in [
            MasteryLevel::New,
            MasteryLevel::Learning,
            MasteryLevel::Reviewing,
            MasteryLevel::Familiar,
            MasteryLevel::Mastered,
        ] {
            assert_eq!(MasteryLevel::from_index(level.as_index()), level);
        }
        assert_eq!(MasteryLevel::from_index(-3), MasteryLevel::New);
        assert_eq!(MasteryLevel::from_index(9), MasteryLevel::Mastered);
    }
}
