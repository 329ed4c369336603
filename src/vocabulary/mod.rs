//! The vocabulary set: entries, persistence, and the operations on them
//!
//! This module provides:
//! - The entry model and its enums (mastery tiers, sync status)
//! - The repository trait plus file-backed and in-memory implementations
//! - The service the UI calls (capture, edit, archive, review, queries)

pub mod models;
pub mod repository;
pub mod service;

pub use models::{
    normalize_word, MasteryLevel, SyncStatus, VocabularyEntry, DEFAULT_EASE_FACTOR,
};
pub use repository::{FileRepository, MemoryRepository, Repository, RepositoryError};
pub use service::{EntryUpdate, VocabularyError, VocabularyService};
