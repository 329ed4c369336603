//! Daily activity tracking and study streaks

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::models::DailyLearningStats;

/// Streaks longer than a year are reported as a year
const MAX_STREAK_DAYS: u32 = 365;

/// Rolling per-day activity counters, keyed by calendar date.
///
/// The tracker itself is plain data; callers persist it alongside the rest
/// of their state (it serializes as a flat list of day records).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatsTracker {
    #[serde(with = "day_list")]
    days: HashMap<NaiveDate, DailyLearningStats>,
}

/// Serialize the day map as a sorted list; the date lives inside each record
mod day_list {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        days: &HashMap<NaiveDate, DailyLearningStats>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut list: Vec<&DailyLearningStats> = days.values().collect();
        list.sort_by_key(|d| d.date);
        serde::Serialize::serialize(&list, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<NaiveDate, DailyLearningStats>, D::Error> {
        let list: Vec<DailyLearningStats> = serde::Deserialize::deserialize(deserializer)?;
        Ok(list.into_iter().map(|d| (d.date, d)).collect())
    }
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn day_mut(&mut self, date: NaiveDate) -> &mut DailyLearningStats {
        self.days
            .entry(date)
            .or_insert_with(|| DailyLearningStats::new(date))
    }

    pub fn record_word_added(&mut self) {
        self.day_mut(Self::today()).words_added += 1;
    }

    pub fn record_review(&mut self, correct: bool) {
        let day = self.day_mut(Self::today());
        day.words_reviewed += 1;
        if correct {
            day.correct_reviews += 1;
        } else {
            day.incorrect_reviews += 1;
        }
    }

    pub fn add_study_time(&mut self, seconds: u32) {
        self.day_mut(Self::today()).study_time_seconds += seconds;
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyLearningStats> {
        self.days.get(&date)
    }

    /// Days with any activity in the given inclusive range, oldest first
    pub fn active_days(&self, from: NaiveDate, to: NaiveDate) -> Vec<&DailyLearningStats> {
        let mut list: Vec<&DailyLearningStats> = self
            .days
            .values()
            .filter(|d| d.date >= from && d.date <= to && d.is_active())
            .collect();
        list.sort_by_key(|d| d.date);
        list
    }

    /// Consecutive days of study ending today or yesterday.
    ///
    /// An inactive today does not break the streak: the day is not over yet,
    /// so counting starts from yesterday in that case.
    pub fn current_streak(&self) -> u32 {
        self.streak_ending(Self::today())
    }

    fn is_active_on(&self, date: NaiveDate) -> bool {
        self.days.get(&date).map(|d| d.is_active()).unwrap_or(false)
    }

    fn streak_ending(&self, today: NaiveDate) -> u32 {
        let mut check_date = today;

        if !self.is_active_on(check_date) {
            // today may simply not have happened yet
            check_date = check_date - Duration::days(1);
            if !self.is_active_on(check_date) {
                return 0;
            }
        }
        let mut streak = 1;
        check_date = check_date - Duration::days(1);

        while streak < MAX_STREAK_DAYS && self.is_active_on(check_date) {
            streak += 1;
            check_date = check_date - Duration::days(1);
        }
        streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(tracker: &mut StatsTracker, date: NaiveDate, reviews: u32) {
        let stats = tracker.day_mut(date);
        stats.words_reviewed += reviews;
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_records_land_on_today() {
        let mut tracker = StatsTracker::new();
        tracker.record_word_added();
        tracker.record_review(true);
        tracker.record_review(false);
        tracker.add_study_time(90);

        let today = Utc::now().date_naive();
        let stats = tracker.days.get(&today).unwrap();
        assert_eq!(stats.words_added, 1);
        assert_eq!(stats.words_reviewed, 2);
        assert_eq!(stats.correct_reviews, 1);
        assert_eq!(stats.incorrect_reviews, 1);
        assert_eq!(stats.study_time_seconds, 90);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let mut tracker = StatsTracker::new();
        let today = d(2026, 8, 23);
        day(&mut tracker, today, 1);
        day(&mut tracker, today - Duration::days(1), 1);
        day(&mut tracker, today - Duration::days(2), 1);
        // gap on day 3
        day(&mut tracker, today - Duration::days(4), 1);

        assert_eq!(tracker.streak_ending(today), 3);
    }

    #[test]
    fn test_inactive_today_does_not_break_streak() {
        let mut tracker = StatsTracker::new();
        let today = d(2026, 8, 23);
        day(&mut tracker, today - Duration::days(1), 1);
        day(&mut tracker, today - Duration::days(2), 1);

        assert_eq!(tracker.streak_ending(today), 2);
    }

    #[test]
    fn test_two_day_gap_resets_streak() {
        let mut tracker = StatsTracker::new();
        let today = d(2026, 8, 23);
        day(&mut tracker, today - Duration::days(2), 1);
        day(&mut tracker, today - Duration::days(3), 1);

        assert_eq!(tracker.streak_ending(today), 0);
    }

    #[test]
    fn test_empty_day_is_not_active() {
        let mut tracker = StatsTracker::new();
        let today = d(2026, 8, 23);
        // bucket exists but nothing happened
        tracker.day_mut(today);
        assert_eq!(tracker.streak_ending(today), 0);
    }

    #[test]
    fn test_active_days_range() {
        let mut tracker = StatsTracker::new();
        day(&mut tracker, d(2026, 8, 20), 1);
        day(&mut tracker, d(2026, 8, 22), 1);
        day(&mut tracker, d(2026, 8, 10), 1);

        let list = tracker.active_days(d(2026, 8, 15), d(2026, 8, 23));
        let dates: Vec<NaiveDate> = list.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![d(2026, 8, 20), d(2026, 8, 22)]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut tracker = StatsTracker::new();
        day(&mut tracker, d(2026, 8, 22), 2);
        day(&mut tracker, d(2026, 8, 23), 1);

        let json = serde_json::to_string(&tracker).unwrap();
        let restored: StatsTracker = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.days.len(), 2);
        assert_eq!(restored.days.get(&d(2026, 8, 22)).unwrap().words_reviewed, 2);
    }
}
