//! Vocabulary operations over a repository
//!
//! The thin layer the UI calls: word capture with uniqueness validation,
//! metadata edits, archiving, review submission, and the due/progress queries.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::review::{
    aggregate_progress, compute_next_review, select_due, ProgressSummary, ReviewQuality,
};

use super::models::{normalize_word, VocabularyEntry};
use super::repository::{Repository, RepositoryError};

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Word already exists: {0}")]
    DuplicateWord(String),

    #[error("Word is empty")]
    EmptyWord,

    #[error("Entry not found: {0}")]
    NotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, VocabularyError>;

/// Descriptive metadata supplied when capturing or editing a word.
/// Every field is optional; `None` leaves the existing value untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub phonetic: Option<String>,
    pub part_of_speech: Option<String>,
    pub definition_en: Option<String>,
    pub definition_cn: Option<String>,
    pub examples: Option<Vec<String>>,
    pub synonyms: Option<Vec<String>>,
    pub antonyms: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub user_context: Option<String>,
}

impl EntryUpdate {
    fn apply(self, entry: &mut VocabularyEntry) {
        if let Some(v) = self.phonetic {
            entry.phonetic = Some(v);
        }
        if let Some(v) = self.part_of_speech {
            entry.part_of_speech = Some(v);
        }
        if let Some(v) = self.definition_en {
            entry.definition_en = Some(v);
        }
        if let Some(v) = self.definition_cn {
            entry.definition_cn = Some(v);
        }
        if let Some(v) = self.examples {
            entry.examples = v;
        }
        if let Some(v) = self.synonyms {
            entry.synonyms = v;
        }
        if let Some(v) = self.antonyms {
            entry.antonyms = v;
        }
        if let Some(v) = self.tags {
            entry.tags = v;
        }
        if let Some(v) = self.category {
            entry.category = Some(v);
        }
        if let Some(v) = self.user_context {
            entry.user_context = Some(v);
        }
    }
}

/// Service wrapping a [`Repository`] with validation and review bookkeeping
pub struct VocabularyService {
    repository: Arc<dyn Repository>,
}

impl VocabularyService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Capture a new word.
    ///
    /// The word is normalized; uniqueness is enforced among non-archived
    /// entries only, so an archived word can be captured again.
    pub async fn add_word(&self, word: &str, metadata: EntryUpdate) -> Result<VocabularyEntry> {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            return Err(VocabularyError::EmptyWord);
        }

        if let Some(existing) = self.repository.get_by_word(&normalized).await? {
            if !existing.is_archived {
                return Err(VocabularyError::DuplicateWord(normalized));
            }
        }

        let mut entry = VocabularyEntry::new(&normalized);
        metadata.apply(&mut entry);
        self.repository.put(&entry).await?;
        log::info!("Vocabulary: captured '{}'", entry.word);
        Ok(entry)
    }

    async fn load(&self, id: Uuid) -> Result<VocabularyEntry> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(VocabularyError::NotFound(id))
    }

    /// Edit descriptive metadata on an entry
    pub async fn update_metadata(&self, id: Uuid, update: EntryUpdate) -> Result<VocabularyEntry> {
        let mut entry = self.load(id).await?;
        update.apply(&mut entry);
        entry.touch();
        self.repository.put(&entry).await?;
        Ok(entry)
    }

    pub async fn set_favorite(&self, id: Uuid, favorite: bool) -> Result<VocabularyEntry> {
        let mut entry = self.load(id).await?;
        entry.is_favorite = favorite;
        entry.touch();
        self.repository.put(&entry).await?;
        Ok(entry)
    }

    /// Soft-delete: the entry drops out of due queries and the uniqueness check
    pub async fn archive(&self, id: Uuid) -> Result<VocabularyEntry> {
        let mut entry = self.load(id).await?;
        entry.is_archived = true;
        entry.touch();
        self.repository.put(&entry).await?;
        Ok(entry)
    }

    pub async fn unarchive(&self, id: Uuid) -> Result<VocabularyEntry> {
        let mut entry = self.load(id).await?;
        entry.is_archived = false;
        entry.touch();
        self.repository.put(&entry).await?;
        Ok(entry)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Apply a review rating to an entry and persist the new schedule
    pub async fn record_review(
        &self,
        id: Uuid,
        quality: ReviewQuality,
    ) -> Result<VocabularyEntry> {
        let mut entry = self.load(id).await?;

        let outcome = compute_next_review(entry.interval, entry.ease_factor, quality);
        entry.interval = outcome.interval;
        entry.ease_factor = outcome.ease_factor;
        entry.mastery_level = outcome.mastery_level;
        entry.next_review_at = Some(outcome.next_review_at);
        entry.last_reviewed_at = Some(Utc::now());
        entry.review_count += 1;
        if outcome.was_correct {
            entry.correct_count += 1;
        }
        entry.touch();

        self.repository.put(&entry).await?;
        log::debug!(
            "Vocabulary: reviewed '{}' ({:?}), next in {}d",
            entry.word,
            quality,
            entry.interval
        );
        Ok(entry)
    }

    /// Entries due for review, most overdue first
    pub async fn due_entries(&self, limit: Option<usize>) -> Result<Vec<VocabularyEntry>> {
        let entries = self.repository.get_all(false).await?;
        Ok(select_due(&entries, limit).into_iter().cloned().collect())
    }

    /// Aggregate progress over the non-archived vocabulary
    pub async fn progress(&self) -> Result<ProgressSummary> {
        let entries = self.repository.get_all(false).await?;
        Ok(aggregate_progress(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{MasteryLevel, MemoryRepository, SyncStatus};

    fn service() -> VocabularyService {
        VocabularyService::new(Arc::new(MemoryRepository::new()))
    }

    #[tokio::test]
    async fn test_add_word_normalizes_and_validates() {
        let svc = service();
        let entry = svc.add_word("  Serendipity ", EntryUpdate::default()).await.unwrap();
        assert_eq!(entry.word, "serendipity");
        assert_eq!(entry.sync_status, SyncStatus::Pending);

        // duplicate in any casing is rejected
        let err = svc.add_word("SERENDIPITY", EntryUpdate::default()).await;
        assert!(matches!(err, Err(VocabularyError::DuplicateWord(_))));

        let err = svc.add_word("   ", EntryUpdate::default()).await;
        assert!(matches!(err, Err(VocabularyError::EmptyWord)));
    }

    #[tokio::test]
    async fn test_archived_word_can_be_captured_again() {
        let svc = service();
        let entry = svc.add_word("ephemeral", EntryUpdate::default()).await.unwrap();
        svc.archive(entry.id).await.unwrap();

        let again = svc.add_word("ephemeral", EntryUpdate::default()).await.unwrap();
        assert_ne!(again.id, entry.id);
    }

    #[tokio::test]
    async fn test_record_review_updates_schedule_and_counters() {
        let svc = service();
        let entry = svc.add_word("ubiquitous", EntryUpdate::default()).await.unwrap();

        let reviewed = svc.record_review(entry.id, ReviewQuality::Good).await.unwrap();
        assert_eq!(reviewed.interval, 1);
        assert_eq!(reviewed.review_count, 1);
        assert_eq!(reviewed.correct_count, 1);
        assert_eq!(reviewed.mastery_level, MasteryLevel::Learning);
        assert!(reviewed.last_reviewed_at.is_some());
        assert!(reviewed.next_review_at.is_some());
        assert_eq!(reviewed.sync_status, SyncStatus::Pending);

        let reviewed = svc.record_review(entry.id, ReviewQuality::Hard).await.unwrap();
        assert_eq!(reviewed.interval, 1);
        assert_eq!(reviewed.review_count, 2);
        // Hard does not count as correct
        assert_eq!(reviewed.correct_count, 1);
    }

    #[tokio::test]
    async fn test_update_metadata_bumps_updated_at() {
        let svc = service();
        let entry = svc.add_word("halcyon", EntryUpdate::default()).await.unwrap();

        let update = EntryUpdate {
            definition_en: Some("calm, peaceful".to_string()),
            tags: Some(vec!["adjective".to_string()]),
            ..Default::default()
        };
        let edited = svc.update_metadata(entry.id, update).await.unwrap();
        assert_eq!(edited.definition_en.as_deref(), Some("calm, peaceful"));
        assert_eq!(edited.tags, vec!["adjective"]);
        assert!(edited.updated_at >= entry.updated_at);
    }

    #[tokio::test]
    async fn test_due_entries_excludes_archived() {
        let svc = service();
        let keep = svc.add_word("keep", EntryUpdate::default()).await.unwrap();
        let gone = svc.add_word("gone", EntryUpdate::default()).await.unwrap();
        svc.archive(gone.id).await.unwrap();

        let due = svc.due_entries(None).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_missing_entry_errors() {
        let svc = service();
        let err = svc.record_review(Uuid::new_v4(), ReviewQuality::Good).await;
        assert!(matches!(err, Err(VocabularyError::NotFound(_))));
    }
}
