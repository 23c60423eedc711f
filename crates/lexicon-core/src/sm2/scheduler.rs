//! SM-2 Scheduler
//!
//! Turns (current scheduling state, quality rating, today) into the next
//! scheduling state. Total over every input: ratings are clamped, missing
//! fields are defaulted and corrupted ease factors are raised to the floor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::algorithm::{
    add_days, elapsed_days, next_ease_factor, next_interval, DEFAULT_EASE_FACTOR,
    FAILURE_INTERVAL_DAYS, MIN_EASE_FACTOR,
};
use super::quality::QualityRating;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Where the "previous interval" of the third-and-later review comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalBasis {
    /// Calendar days between the last review and today. Drifts from
    /// canonical SM-2 when reviews happen late or early.
    #[default]
    Elapsed,
    /// The interval stored by the previous update, falling back to elapsed
    /// days for states written before intervals were stored.
    Scheduled,
}

/// Tunables bound into a scheduler at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Ease factor for never-reviewed items
    pub default_ease_factor: f64,
    /// Lower bound for every ease factor the scheduler returns
    pub min_ease_factor: f64,
    /// Source of the previous interval
    pub interval_basis: IntervalBasis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_ease_factor: DEFAULT_EASE_FACTOR,
            min_ease_factor: MIN_EASE_FACTOR,
            interval_basis: IntervalBasis::Elapsed,
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

/// Per-item scheduling state, owned by the vocabulary store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    /// Consecutive passing reviews since the last failure; unset for new items
    pub repetitions: Option<u32>,
    /// Interval multiplier; unset for new items
    pub ease_factor: Option<f64>,
    /// Day of the most recent review; unset if never reviewed
    pub last_review_date: Option<NaiveDate>,
    /// Day on or after which the item is due
    pub next_review_date: NaiveDate,
    /// Interval that produced `next_review_date`
    #[serde(default)]
    pub interval_days: Option<u32>,
}

impl SchedulingState {
    /// State of an item that has never been reviewed, due on `due`
    pub fn new(due: NaiveDate) -> Self {
        Self {
            repetitions: None,
            ease_factor: None,
            last_review_date: None,
            next_review_date: due,
            interval_days: None,
        }
    }

    pub fn phase(&self) -> LearningPhase {
        match self.repetitions.unwrap_or(0) {
            0 => LearningPhase::Learning,
            _ => LearningPhase::Retained,
        }
    }

    /// Due on or after `next_review_date`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }
}

/// Two-state view of an item's progress; items cycle with no terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningPhase {
    /// New, or the last review failed
    Learning,
    /// At least one passing review since the last failure
    Retained,
}

impl std::fmt::Display for LearningPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningPhase::Learning => write!(f, "learning"),
            LearningPhase::Retained => write!(f, "retained"),
        }
    }
}

/// Repetitions and ease factor with defaults and the ease floor applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedState {
    pub repetitions: u32,
    pub ease_factor: f64,
}

/// Emitted for the review recorder after each scheduling update
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEvent {
    pub item_id: String,
    pub review_date: NaiveDate,
    pub quality: QualityRating,
    pub state: SchedulingState,
}

/// What every rating would produce for an item today
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewResults {
    outcomes: Vec<SchedulingState>,
}

impl PreviewResults {
    /// State produced by `quality`
    pub fn for_quality(&self, quality: QualityRating) -> &SchedulingState {
        &self.outcomes[usize::from(quality.value())]
    }

    /// (rating, resulting state) pairs, lowest rating first
    pub fn iter(&self) -> impl Iterator<Item = (QualityRating, &SchedulingState)> {
        QualityRating::all().zip(self.outcomes.iter())
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// SM-2 scheduler. Stateless apart from its configuration; share freely.
#[derive(Debug, Clone, Default)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply defaults and the tolerant-reader ease floor
    pub fn normalize(&self, state: &SchedulingState) -> NormalizedState {
        let repetitions = state.repetitions.unwrap_or(0);

        let ease_factor = match state.ease_factor {
            None => self.config.default_ease_factor,
            Some(ef) if !ef.is_finite() => {
                warn!(ease_factor = ef, "Non-finite ease factor, using default");
                self.config.default_ease_factor
            }
            Some(ef) if ef < self.config.min_ease_factor => {
                warn!(
                    ease_factor = ef,
                    min = self.config.min_ease_factor,
                    "Ease factor below minimum, raising to floor"
                );
                self.config.min_ease_factor
            }
            Some(ef) => ef,
        };

        NormalizedState {
            repetitions,
            ease_factor,
        }
    }

    /// Previous interval in days according to the configured basis
    pub fn previous_interval(&self, state: &SchedulingState, today: NaiveDate) -> i64 {
        match self.config.interval_basis {
            IntervalBasis::Elapsed => elapsed_days(state.last_review_date, today),
            IntervalBasis::Scheduled => state
                .interval_days
                .map(i64::from)
                .unwrap_or_else(|| elapsed_days(state.last_review_date, today)),
        }
    }

    /// Compute the state after reviewing an item today.
    ///
    /// `quality` may be any integer; it is clamped into `0..=5`.
    pub fn process_review(
        &self,
        state: &SchedulingState,
        quality: i32,
        today: NaiveDate,
    ) -> SchedulingState {
        self.schedule(state, QualityRating::clamped(quality), today)
    }

    /// [`process_review`](Self::process_review) for an already-validated rating
    pub fn schedule(
        &self,
        state: &SchedulingState,
        quality: QualityRating,
        today: NaiveDate,
    ) -> SchedulingState {
        let current = self.normalize(state);

        let (repetitions, ease_factor, interval) = if quality.is_passing() {
            let ease_factor =
                next_ease_factor(current.ease_factor, quality, self.config.min_ease_factor);
            let previous = self.previous_interval(state, today);
            let interval = next_interval(current.repetitions, previous, ease_factor);
            (current.repetitions.saturating_add(1), ease_factor, interval)
        } else {
            (0, current.ease_factor, FAILURE_INTERVAL_DAYS)
        };

        let next_review_date = add_days(today, interval);

        debug!(
            quality = quality.value(),
            repetitions,
            ease_factor,
            interval,
            %next_review_date,
            "Scheduled review"
        );

        SchedulingState {
            repetitions: Some(repetitions),
            ease_factor: Some(ease_factor),
            last_review_date: Some(today),
            next_review_date,
            interval_days: Some(interval),
        }
    }

    /// Outcome of every rating for `state` reviewed today
    pub fn preview(&self, state: &SchedulingState, today: NaiveDate) -> PreviewResults {
        PreviewResults {
            outcomes: QualityRating::all()
                .map(|q| self.schedule(state, q, today))
                .collect(),
        }
    }
}
