//! SM-2 (SuperMemo 2) Scheduling Module
//!
//! Decides, after every recall attempt, how easy a vocabulary item is for the
//! learner and on which calendar day it should be shown again.
//!
//! ## Core Formulas:
//! - Ease update: EF' = max(MIN_EF, EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))
//! - Intervals: 1 day, then 6 days, then round(previous_interval * EF')
//! - Any rating below 3 resets the repetition count and schedules tomorrow
//!
//! The scheduler is a pure function of (state, rating, today). "Today" is
//! always supplied by the caller so replays and backfills are deterministic.

mod algorithm;
mod quality;
mod scheduler;

pub use algorithm::{
    add_days,
    ease_delta,
    elapsed_days,
    next_ease_factor,
    next_interval,
    // Constants
    DEFAULT_EASE_FACTOR,
    FAILURE_INTERVAL_DAYS,
    FIRST_INTERVAL_DAYS,
    MIN_EASE_FACTOR,
    SECOND_INTERVAL_DAYS,
};

pub use quality::{InvalidQuality, QualityRating, MAX_QUALITY, PASSING_QUALITY};

pub use scheduler::{
    IntervalBasis, LearningPhase, NormalizedState, PreviewResults, ReviewEvent, SchedulerConfig,
    SchedulingState, Sm2Scheduler,
};
