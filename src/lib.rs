//! wordvault - a vocabulary learning core
//!
//! Local-first vocabulary capture with spaced-repetition review scheduling
//! and bidirectional replication to a REST backend:
//!
//! - [`vocabulary`]: the entry model, repository, and word operations
//! - [`review`]: the SM-2 variant scheduler, due queue, and progress rollup
//! - [`sync`]: push/pull replication with last-write-wins conflict handling
//! - [`stats`]: review sessions, daily activity counters, and study streaks

pub mod review;
pub mod stats;
pub mod sync;
pub mod vocabulary;

pub use review::{compute_next_review, preview_intervals, ReviewOutcome, ReviewQuality};
pub use stats::{ReviewSession, StatsTracker};
pub use sync::{SyncEngine, SyncError, SyncOutcome};
pub use vocabulary::{
    FileRepository, MasteryLevel, MemoryRepository, Repository, SyncStatus, VocabularyEntry,
    VocabularyService,
};
