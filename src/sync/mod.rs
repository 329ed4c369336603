//! Replication between the local repository and the remote backend
//!
//! This module provides:
//! - The sync engine (push, pull, full sync, busy guard)
//! - The REST remote store and its abstract trait
//! - The wire payload adapter (sparse merge, stringly-typed list codecs)

pub mod engine;
pub mod payload;
pub mod remote;

pub use engine::{SyncEngine, SyncError, SyncOutcome};
pub use payload::WirePayload;
pub use remote::{RemoteError, RemoteStore, RestRemoteStore};
