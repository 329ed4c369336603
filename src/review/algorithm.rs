//! SM-2 variant used for vocabulary reviews
//!
//! A deliberately coarse three-level rating scale instead of classic SM-2's
//! 0-5:
//! - 0: Forgot — no recall
//! - 1: Hard — recalled with difficulty, does not count as correct
//! - 2: Good — recalled, counts as correct
//!
//! The interval/ease-factor formula is fixed; it is not a configurable SRS.

use chrono::{DateTime, Duration, Utc};

use crate::vocabulary::MasteryLevel;

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f32 = 1.3;

/// Learner's rating of a single recall attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewQuality {
    Forgot,
    Hard,
    Good,
}

impl ReviewQuality {
    fn as_f32(self) -> f32 {
        match self {
            Self::Forgot => 0.0,
            Self::Hard => 1.0,
            Self::Good => 2.0,
        }
    }
}

/// Result of calculating the next review
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// New interval in days
    pub interval: i32,
    /// New ease factor, always >= 1.3
    pub ease_factor: f32,
    /// Mastery tier derived from the new interval
    pub mastery_level: MasteryLevel,
    /// When the entry is next due
    pub next_review_at: DateTime<Utc>,
    /// Whether the rating counts as a correct recall (Good only)
    pub was_correct: bool,
}

/// Mastery tier as a function of the review interval alone
pub fn mastery_level_for_interval(interval: i32) -> MasteryLevel {
    if interval == 0 {
        MasteryLevel::New
    } else if interval < 7 {
        MasteryLevel::Learning
    } else if interval < 21 {
        MasteryLevel::Reviewing
    } else if interval < 60 {
        MasteryLevel::Familiar
    } else {
        MasteryLevel::Mastered
    }
}

/// Calculate the next review interval and ease factor
///
/// # Arguments
/// * `interval` - Current interval in days
/// * `ease_factor` - Current ease factor
/// * `quality` - Rating of this recall attempt
pub fn compute_next_review(
    interval: i32,
    ease_factor: f32,
    quality: ReviewQuality,
) -> ReviewOutcome {
    // The floor is applied on the way in as well as after the adjustment, so
    // one low rating can never push the factor below 1.3 even transiently.
    let mut ease_factor = ease_factor.max(MIN_EASE_FACTOR);
    let interval = interval.max(0);

    let was_correct = quality == ReviewQuality::Good;

    let next_interval;
    if was_correct {
        next_interval = match interval {
            0 => 1,
            1 => 3,
            _ => (interval as f32 * ease_factor).round() as i32,
        };
        ease_factor += 0.1 - (2.0 - quality.as_f32()) * 0.08;
    } else {
        next_interval = 1;
        ease_factor -= 0.2;
    }

    let ease_factor = ease_factor.max(MIN_EASE_FACTOR);

    ReviewOutcome {
        interval: next_interval,
        ease_factor,
        mastery_level: mastery_level_for_interval(next_interval),
        next_review_at: Utc::now() + Duration::days(next_interval as i64),
        was_correct,
    }
}

/// The would-be interval for each rating, for showing on review buttons
pub fn preview_intervals(interval: i32, ease_factor: f32) -> [i32; 3] {
    [
        compute_next_review(interval, ease_factor, ReviewQuality::Forgot).interval,
        compute_next_review(interval, ease_factor, ReviewQuality::Hard).interval,
        compute_next_review(interval, ease_factor, ReviewQuality::Good).interval,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_first_review_good() {
        let outcome = compute_next_review(0, 2.5, ReviewQuality::Good);
        assert_eq!(outcome.interval, 1);
        assert!(close(outcome.ease_factor, 2.6));
        assert_eq!(outcome.mastery_level, MasteryLevel::Learning);
        assert!(outcome.was_correct);
    }

    #[test]
    fn test_second_review_good() {
        let outcome = compute_next_review(1, 2.6, ReviewQuality::Good);
        assert_eq!(outcome.interval, 3);
        assert!(close(outcome.ease_factor, 2.7));
        assert_eq!(outcome.mastery_level, MasteryLevel::Learning);
    }

    #[test]
    fn test_third_review_good_multiplies() {
        // round(3 * 2.7) = 8
        let outcome = compute_next_review(3, 2.7, ReviewQuality::Good);
        assert_eq!(outcome.interval, 8);
        assert!(close(outcome.ease_factor, 2.8));
        assert_eq!(outcome.mastery_level, MasteryLevel::Reviewing);
    }

    #[test]
    fn test_forgot_resets_interval() {
        let outcome = compute_next_review(30, 2.5, ReviewQuality::Forgot);
        assert_eq!(outcome.interval, 1);
        assert!(close(outcome.ease_factor, 2.3));
        assert_eq!(outcome.mastery_level, MasteryLevel::Learning);
        assert!(!outcome.was_correct);
    }

    #[test]
    fn test_hard_is_not_correct() {
        let outcome = compute_next_review(8, 2.5, ReviewQuality::Hard);
        assert!(!outcome.was_correct);
        assert_eq!(outcome.interval, 1);
        assert!(close(outcome.ease_factor, 2.3));
    }

    #[test]
    fn test_ease_factor_floor_holds_for_every_quality() {
        for quality in [ReviewQuality::Forgot, ReviewQuality::Hard, ReviewQuality::Good] {
            for ef in [0.5_f32, 1.3, 1.35, 1.4, 2.5, 3.0] {
                let outcome = compute_next_review(10, ef, quality);
                assert!(
                    outcome.ease_factor >= MIN_EASE_FACTOR,
                    "ease factor {} fell below floor (input ef {}, {:?})",
                    outcome.ease_factor,
                    ef,
                    quality
                );
            }
        }
    }

    #[test]
    fn test_incoming_ease_factor_clamped_before_use() {
        // An out-of-invariant input must behave as if it were 1.3, not
        // propagate a smaller multiplier into the interval.
        let outcome = compute_next_review(10, 1.0, ReviewQuality::Good);
        assert_eq!(outcome.interval, 13); // round(10 * 1.3)
    }

    #[test]
    fn test_mastery_thresholds() {
        assert_eq!(mastery_level_for_interval(0), MasteryLevel::New);
        assert_eq!(mastery_level_for_interval(1), MasteryLevel::Learning);
        assert_eq!(mastery_level_for_interval(6), MasteryLevel::Learning);
        assert_eq!(mastery_level_for_interval(7), MasteryLevel::Reviewing);
        assert_eq!(mastery_level_for_interval(20), MasteryLevel::Reviewing);
        assert_eq!(mastery_level_for_interval(21), MasteryLevel::Familiar);
        assert_eq!(mastery_level_for_interval(59), MasteryLevel::Familiar);
        assert_eq!(mastery_level_for_interval(60), MasteryLevel::Mastered);
    }

    #[test]
    fn test_next_review_date_matches_interval() {
        let before = Utc::now();
        let outcome = compute_next_review(1, 2.5, ReviewQuality::Good);
        let expected = before + Duration::days(3);
        let delta = outcome.next_review_at - expected;
        assert!(delta.num_seconds().abs() < 5);
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(0, 2.5), [1, 1, 1]);
        assert_eq!(preview_intervals(1, 2.5), [1, 1, 3]);
        assert_eq!(preview_intervals(10, 2.5), [1, 1, 25]);
    }
}
