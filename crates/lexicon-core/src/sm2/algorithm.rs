//! SM-2 Core Formulas
//!
//! Free functions behind [`Sm2Scheduler`](super::Sm2Scheduler). They carry no
//! state and take every tunable as an argument.

use chrono::{Days, NaiveDate};

use super::quality::{QualityRating, MAX_QUALITY};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease factor assigned to items that have never been reviewed
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Floor for the ease factor; keeps intervals from collapsing
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval after the first successful review
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second consecutive successful review
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Interval after a failed review
pub const FAILURE_INTERVAL_DAYS: u32 = 1;

// ============================================================================
// FORMULAS
// ============================================================================

/// Ease adjustment for a rating: `0.1 - (5-q) * (0.08 + (5-q) * 0.02)`
///
/// +0.10 for q=5, 0.00 for q=4, -0.14 for q=3.
pub fn ease_delta(quality: QualityRating) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

/// Ease factor after a successful review, clamped from below only
pub fn next_ease_factor(current: f64, quality: QualityRating, min_ease_factor: f64) -> f64 {
    (current + ease_delta(quality)).max(min_ease_factor)
}

/// Interval in days after a successful review.
///
/// `prior_repetitions` is the count *before* this review. The result is
/// never below one day, so a same-day or backdated third review still moves
/// the item into the future.
pub fn next_interval(prior_repetitions: u32, previous_interval: i64, ease_factor: f64) -> u32 {
    match prior_repetitions {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => {
            // f64::round rounds half away from zero: 7.5 -> 8
            let scaled = (previous_interval as f64 * ease_factor).round();
            if scaled.is_nan() {
                FIRST_INTERVAL_DAYS
            } else {
                scaled.clamp(1.0, f64::from(u32::MAX)) as u32
            }
        }
    }
}

/// Whole calendar days between the last review and today, 0 if never reviewed
pub fn elapsed_days(last_review: Option<NaiveDate>, today: NaiveDate) -> i64 {
    last_review
        .map(|last| today.signed_duration_since(last).num_days())
        .unwrap_or(0)
}

/// `date + days`, saturating at the last representable date
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
