//! SM-2 review scheduling.
//!
//! Pure schedule arithmetic: given an item's current ease factor and
//! interval plus a recall-quality rating, compute the next ease factor,
//! interval and review date. Persistence and session flow live elsewhere;
//! nothing here touches state.

use chrono::{DateTime, Duration, Utc};

use crate::models::QualityRating;

/// Ease factor hard floor. No run of bad ratings drops an item below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval (days) at which an easy recall promotes a word to mastered.
pub const MASTERY_INTERVAL: u32 = 21;

/// Next schedule state for an item, as computed by [`compute_next_schedule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextSchedule {
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review_at: DateTime<Utc>,
}

/// Compute the schedule following one review.
///
/// Deterministic in its inputs; `now` is passed in rather than read from the
/// wall clock so the formula stays trivially unit-testable.
pub fn compute_next_schedule(
    ease_factor: f64,
    interval: u32,
    quality: QualityRating,
    now: DateTime<Utc>,
) -> NextSchedule {
    let miss = f64::from(5 - quality.score());

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3.
    let new_ease = (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

    // Branch order matters: a failing rating forces a same-day relearn no
    // matter how long the current interval is, and the second successful
    // review is a fixed six days regardless of the ease factor.
    let new_interval = if quality.score() < 3 {
        1
    } else if interval == 0 {
        1
    } else if interval == 1 {
        6
    } else {
        (interval as f64 * new_ease).floor() as u32
    };

    NextSchedule {
        ease_factor: new_ease,
        interval: new_interval,
        next_review_at: now + Duration::days(i64::from(new_interval)),
    }
}

/// Mastery promotion rule, applied by the session after scheduling: an easy
/// recall whose interval has grown to [`MASTERY_INTERVAL`] days retires the
/// word from the review rotation. The check uses the newly computed interval,
/// not the one the review started from.
pub fn reaches_mastery(quality: QualityRating, new_interval: u32) -> bool {
    quality == QualityRating::Easy && new_interval >= MASTERY_INTERVAL
}

/// Would-be interval for each rating, for labelling rating controls.
pub fn preview_intervals(
    ease_factor: f64,
    interval: u32,
    now: DateTime<Utc>,
) -> [(QualityRating, u32); 4] {
    QualityRating::ALL
        .map(|q| (q, compute_next_schedule(ease_factor, interval, q, now).interval))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ease(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "ease factor {} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn good_on_mature_card_scales_by_ease() {
        // EF 2.5, interval 6, GOOD: (5-4)=1 makes the EF delta exactly zero.
        let next = compute_next_schedule(2.5, 6, QualityRating::Good, Utc::now());
        assert_ease(next.ease_factor, 2.5);
        assert_eq!(next.interval, 15); // floor(6 * 2.5)
    }

    #[test]
    fn forgot_forces_same_day_relearn() {
        let next = compute_next_schedule(2.5, 0, QualityRating::Forgot, Utc::now());
        assert_ease(next.ease_factor, 1.7); // 2.5 + (0.1 - 5 * 0.18)
        assert_eq!(next.interval, 1);
    }

    #[test]
    fn forgot_ignores_current_interval() {
        for interval in [0, 1, 6, 40, 400] {
            let next = compute_next_schedule(2.5, interval, QualityRating::Forgot, Utc::now());
            assert_eq!(next.interval, 1);
        }
    }

    #[test]
    fn first_successful_review_is_one_day() {
        for q in [QualityRating::Hard, QualityRating::Good, QualityRating::Easy] {
            let next = compute_next_schedule(2.5, 0, q, Utc::now());
            assert_eq!(next.interval, 1);
        }
    }

    #[test]
    fn second_successful_review_is_six_days() {
        // Fixed step, independent of the ease factor.
        for ef in [1.3, 2.5, 3.2] {
            for q in [QualityRating::Hard, QualityRating::Good, QualityRating::Easy] {
                let next = compute_next_schedule(ef, 1, q, Utc::now());
                assert_eq!(next.interval, 6);
            }
        }
    }

    #[test]
    fn easy_on_second_review_stays_six_days() {
        // The interval==1 branch wins over EF scaling; 6 < 21 so no mastery.
        let next = compute_next_schedule(2.5, 1, QualityRating::Easy, Utc::now());
        assert_ease(next.ease_factor, 2.6);
        assert_eq!(next.interval, 6);
        assert!(!reaches_mastery(QualityRating::Easy, next.interval));
    }

    #[test]
    fn easy_on_mature_card_promotes_to_mastered() {
        let next = compute_next_schedule(2.5, 10, QualityRating::Easy, Utc::now());
        assert_ease(next.ease_factor, 2.6);
        assert_eq!(next.interval, 26); // floor(10 * 2.6)
        assert!(reaches_mastery(QualityRating::Easy, next.interval));
    }

    #[test]
    fn interval_scaling_truncates() {
        // EF drops to 2.36 on HARD; floor(6 * 2.36) = 14, not 15.
        let next = compute_next_schedule(2.5, 6, QualityRating::Hard, Utc::now());
        assert_ease(next.ease_factor, 2.36);
        assert_eq!(next.interval, 14);
    }

    #[test]
    fn ease_factor_never_drops_below_floor() {
        let mut ef = 2.5;
        for _ in 0..20 {
            let next = compute_next_schedule(ef, 5, QualityRating::Forgot, Utc::now());
            assert!(next.ease_factor >= MIN_EASE_FACTOR);
            ef = next.ease_factor;
        }
        assert_ease(ef, MIN_EASE_FACTOR);
    }

    #[test]
    fn next_review_is_interval_days_out() {
        let now = Utc::now();
        let next = compute_next_schedule(2.5, 6, QualityRating::Good, now);
        assert_eq!(next.next_review_at, now + Duration::days(15));
    }

    #[test]
    fn mastery_requires_easy() {
        assert!(reaches_mastery(QualityRating::Easy, 21));
        assert!(!reaches_mastery(QualityRating::Easy, 20));
        assert!(!reaches_mastery(QualityRating::Good, 100));
        assert!(!reaches_mastery(QualityRating::Hard, 100));
        assert!(!reaches_mastery(QualityRating::Forgot, 100));
    }

    #[test]
    fn preview_matches_individual_computation() {
        let now = Utc::now();
        let previews = preview_intervals(2.5, 6, now);
        assert_eq!(previews[0], (QualityRating::Forgot, 1));
        assert_eq!(previews[1], (QualityRating::Hard, 14));
        assert_eq!(previews[2], (QualityRating::Good, 15));
        assert_eq!(previews[3], (QualityRating::Easy, 15)); // floor(6 * 2.6)
    }
}
