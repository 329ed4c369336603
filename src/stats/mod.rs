//! Study statistics: review sessions, daily activity, streaks

pub mod models;
pub mod tracker;

pub use models::{DailyLearningStats, ReviewMode, ReviewSession};
pub use tracker::StatsTracker;
