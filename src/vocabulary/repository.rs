//! Entry storage: the `Repository` trait and the built-in backends
//!
//! The core never assumes how entries are physically stored. Everything goes
//! through [`Repository`], which requires atomic single-entry get/put keyed
//! by id and by normalized word text. Two backends ship with the crate:
//!
//! - [`FileRepository`] — one JSON file per entry under a data directory
//! - [`MemoryRepository`] — a HashMap behind a mutex, for embedding and tests

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{normalize_word, VocabularyEntry};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data directory")]
    InvalidDataDir,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Abstract store for vocabulary entries.
///
/// Callers sort explicitly; no ordering is guaranteed by `get_all`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// All entries, optionally including archived ones
    async fn get_all(&self, include_archived: bool) -> Result<Vec<VocabularyEntry>>;

    /// Entry by id, if present
    async fn get_by_id(&self, id: Uuid) -> Result<Option<VocabularyEntry>>;

    /// Entry by word text, case-insensitive (the word is normalized before
    /// lookup). A re-captured word can coexist with an archived entry of the
    /// same text; the non-archived one is returned in that case.
    async fn get_by_word(&self, word: &str) -> Result<Option<VocabularyEntry>>;

    /// Insert or replace an entry
    async fn put(&self, entry: &VocabularyEntry) -> Result<()>;

    /// Remove an entry; missing ids are not an error
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// File-backed repository: `{data_dir}/entries/{entry-id}.json`
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Default data directory: `~/.local/share/wordvault` (platform equivalent)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join("wordvault"))
            .ok_or(RepositoryError::InvalidDataDir)
    }

    fn entries_dir(&self) -> PathBuf {
        self.data_dir.join("entries")
    }

    fn entry_path(&self, id: Uuid) -> PathBuf {
        self.entries_dir().join(format!("{}.json", id))
    }

    /// Create the directory layout if it does not exist yet
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.entries_dir())?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<VocabularyEntry>> {
        let dir = self.entries_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dirent in fs::read_dir(&dir)? {
            let path = dirent?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<VocabularyEntry>(&content) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        // A single corrupt file should not take down every query
                        log::warn!(
                            "Repository: skipping unreadable entry file {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn get_all(&self, include_archived: bool) -> Result<Vec<VocabularyEntry>> {
        let mut entries = self.read_all()?;
        if !include_archived {
            entries.retain(|e| !e.is_archived);
        }
        Ok(entries)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<VocabularyEntry>> {
        let path = self.entry_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn get_by_word(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let needle = normalize_word(word);
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.word == needle)
            .min_by_key(|e| e.is_archived))
    }

    async fn put(&self, entry: &VocabularyEntry) -> Result<()> {
        self.init()?;
        let path = self.entry_path(entry.id);
        fs::write(&path, serde_json::to_string_pretty(entry)?)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let path = self.entry_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory repository for embedding and tests
#[derive(Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<Uuid, VocabularyEntry>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_all(&self, include_archived: bool) -> Result<Vec<VocabularyEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .values()
            .filter(|e| include_archived || !e.is_archived)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<VocabularyEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(&id).cloned())
    }

    async fn get_by_word(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let needle = normalize_word(word);
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .values()
            .filter(|e| e.word == needle)
            .min_by_key(|e| e.is_archived)
            .cloned())
    }

    async fn put(&self, entry: &VocabularyEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&id);
        Ok(())
    }
}
