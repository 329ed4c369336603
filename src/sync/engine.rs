//! Bidirectional sync between the local repository and the remote store
//!
//! Push sends every entry not marked `Synced` — pending changes and earlier
//! failures alike (POST for entries the remote has never seen, PATCH
//! otherwise). Pull fetches remote rows updated
//! since the last sync and merges them last-write-wins by timestamp. Entries
//! are processed strictly one at a time; one entry's failure never aborts the
//! batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vocabulary::{
    normalize_word, Repository, RepositoryError, SyncStatus, VocabularyEntry,
};

use super::payload::WirePayload;
use super::remote::{RemoteError, RemoteStore, RestRemoteStore};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync is not configured")]
    NotConfigured,
    #[error("Sync already in progress")]
    AlreadyInProgress,
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a full sync cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// Entries successfully pushed to the remote
    pub pushed: usize,
    /// Remote entries processed during pull
    pub pulled: usize,
}

/// Clears the busy flag when a sync cycle ends, error or not
struct SyncGuard<'a>(&'a AtomicBool);

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Engine coordinating replication between a [`Repository`] and a [`RemoteStore`]
pub struct SyncEngine {
    repository: Arc<dyn Repository>,
    remote: Mutex<Option<Arc<dyn RemoteStore>>>,
    /// Non-reentrant busy flag; a second top-level sync call while one is in
    /// flight fails immediately rather than queuing
    is_syncing: AtomicBool,
    /// Advances only on successful completion of a push or pull cycle
    last_sync: Mutex<Option<DateTime<Utc>>>,
}

impl SyncEngine {
    /// Create an engine with no remote bound yet
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            remote: Mutex::new(None),
            is_syncing: AtomicBool::new(false),
            last_sync: Mutex::new(None),
        }
    }

    /// Bind the REST backend by url and API key
    pub fn configure(&self, url: &str, api_key: &str) -> Result<(), SyncError> {
        let store = RestRemoteStore::new(url, api_key)?;
        self.configure_remote(Arc::new(store));
        Ok(())
    }

    /// Bind an arbitrary remote store (tests, alternative transports)
    pub fn configure_remote(&self, remote: Arc<dyn RemoteStore>) {
        *self.remote.lock().unwrap() = Some(remote);
    }

    /// True once a remote is bound
    pub fn is_enabled(&self) -> bool {
        self.remote.lock().unwrap().is_some()
    }

    /// Whether a sync cycle is currently running
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::SeqCst)
    }

    /// Timestamp of the last completed push or pull cycle
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock().unwrap()
    }

    fn require_remote(&self) -> Result<Arc<dyn RemoteStore>, SyncError> {
        self.remote
            .lock()
            .unwrap()
            .clone()
            .ok_or(SyncError::NotConfigured)
    }

    fn begin_sync(&self) -> Result<SyncGuard<'_>, SyncError> {
        if self.is_syncing.swap(true, Ordering::SeqCst) {
            return Err(SyncError::AlreadyInProgress);
        }
        Ok(SyncGuard(&self.is_syncing))
    }

    /// Push local changes to the remote.
    ///
    /// Selects every entry not yet marked `Synced`, so entries whose last
    /// push failed are retried alongside pending ones. Returns the number of
    /// entries the remote accepted. Per-entry failures (remote or local
    /// bookkeeping) are logged and skipped; callers must not assume a
    /// non-error result means every entry synced.
    pub async fn sync_to_backend(&self) -> Result<usize, SyncError> {
        let remote = self.require_remote()?;
        let _guard = self.begin_sync()?;
        self.push(&remote).await
    }

    /// Pull remote changes into the repository.
    ///
    /// Returns the number of remote entries processed (including no-op merges
    /// where the local copy was already as new or newer).
    pub async fn sync_from_backend(&self) -> Result<usize, SyncError> {
        let remote = self.require_remote()?;
        let _guard = self.begin_sync()?;
        self.pull(&remote).await
    }

    /// Run push then pull under a single busy guard.
    ///
    /// Pull does not run if push fails at the configuration or repository
    /// level; individual entry errors inside either phase never propagate.
    pub async fn full_sync(&self) -> Result<SyncOutcome, SyncError> {
        let remote = self.require_remote()?;
        let _guard = self.begin_sync()?;

        let pushed = self.push(&remote).await?;
        let pulled = self.pull(&remote).await?;
        Ok(SyncOutcome { pushed, pulled })
    }

    async fn push(&self, remote: &Arc<dyn RemoteStore>) -> Result<usize, SyncError> {
        // Archived entries still replicate; archiving is itself a change
        let candidates: Vec<VocabularyEntry> = self
            .repository
            .get_all(true)
            .await?
            .into_iter()
            .filter(|e| e.sync_status != SyncStatus::Synced)
            .collect();

        log::info!("Sync: pushing {} pending entries", candidates.len());

        let mut synced = 0;
        for mut entry in candidates {
            let payload = WirePayload::from_entry(&entry);

            let result = match entry.backend_id.as_deref() {
                None => remote
                    .create_entry(&payload)
                    .await
                    .map(|backend_id| entry.backend_id = Some(backend_id)),
                Some(backend_id) => remote.update_entry(backend_id, &payload).await,
            };

            match result {
                Ok(()) => {
                    entry.sync_status = SyncStatus::Synced;
                    // The remote accepted the entry, so it counts as pushed
                    // even if the local state write fails; the entry stays
                    // unsynced and is retried on the next push.
                    if let Err(e) = self.repository.put(&entry).await {
                        log::warn!(
                            "Sync: pushed '{}' but could not persist sync state: {}",
                            entry.word,
                            e
                        );
                    }
                    synced += 1;
                    log::debug!("Sync: pushed '{}'", entry.word);
                }
                Err(e) => {
                    log::warn!("Sync: push failed for '{}': {}", entry.word, e);
                    entry.sync_status = SyncStatus::Failed;
                    // Best-effort bookkeeping; the push itself already failed
                    if let Err(e) = self.repository.put(&entry).await {
                        log::error!("Sync: could not mark '{}' as failed: {}", entry.word, e);
                    }
                }
            }
        }

        *self.last_sync.lock().unwrap() = Some(Utc::now());
        log::info!("Sync: push complete, {} entries synced", synced);
        Ok(synced)
    }

    async fn pull(&self, remote: &Arc<dyn RemoteStore>) -> Result<usize, SyncError> {
        let since = self.last_sync();
        let rows = remote.fetch_updated_since(since).await?;
        log::info!(
            "Sync: pulled {} remote rows (since={:?})",
            rows.len(),
            since
        );

        let mut processed = 0;
        for row in rows {
            match self.apply_remote_row(&row).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    log::warn!("Sync: pull failed for '{}': {}", row.word, e);
                }
            }
        }

        *self.last_sync.lock().unwrap() = Some(Utc::now());
        log::info!("Sync: pull complete, {} rows processed", processed);
        Ok(processed)
    }

    /// Merge one remote row into the repository, last-write-wins
    async fn apply_remote_row(&self, row: &WirePayload) -> Result<(), SyncError> {
        let word = normalize_word(&row.word);
        if word.is_empty() {
            return Err(SyncError::Remote(RemoteError::UnexpectedResponse(
                "remote row has an empty word".to_string(),
            )));
        }

        match self.repository.get_by_word(&word).await? {
            Some(mut local) => {
                let remote_updated = match row.updated_at {
                    Some(at) => at,
                    None => {
                        return Err(SyncError::Remote(RemoteError::UnexpectedResponse(
                            format!("remote row '{}' has no updated_at", word),
                        )))
                    }
                };

                // Local wins ties
                if remote_updated <= local.updated_at {
                    log::debug!("Sync: '{}' local copy is current, skipping", word);
                    return Ok(());
                }

                row.merge_into(&mut local);
                if row.id.is_some() {
                    local.backend_id = row.id.clone();
                }
                local.sync_status = SyncStatus::Synced;
                // Adopt the remote timestamp so a repeat pull is a no-op
                local.updated_at = remote_updated;
                self.repository.put(&local).await?;
                log::debug!("Sync: merged remote changes into '{}'", word);
            }
            None => {
                let entry = row.into_new_entry();
                self.repository.put(&entry).await?;
                log::debug!("Sync: created '{}' from remote", word);
            }
        }
        Ok(())
    }
}
