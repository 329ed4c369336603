//! Spaced repetition scheduling for vocabulary entries
//!
//! This module provides:
//! - The fixed SM-2 variant (three-level rating scale)
//! - Due-entry selection for review sessions
//! - Progress aggregation across the vocabulary set

pub mod algorithm;
pub mod queue;

pub use algorithm::{
    compute_next_review, mastery_level_for_interval, preview_intervals, ReviewOutcome,
    ReviewQuality,
};
pub use queue::{aggregate_progress, select_due, ProgressSummary};
