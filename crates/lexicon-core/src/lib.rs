//! # Lexicon Core
//!
//! Vocabulary scheduling engine. Decides when a learner should next see a
//! word, based on how well they recalled it:
//!
//! - **SM-2**: canonical SuperMemo-2 ease/interval update, total over its inputs
//! - **Vocabulary Store**: SQLite persistence of entries and their scheduling state
//! - **Review History**: append-only record of every rating and its outcome
//! - **Review Sessions**: snapshot of due entries worked through in one sitting
//!
//! The scheduler is a pure function of `(state, quality, today)`. It never
//! reads the wall clock and never touches storage; [`ReviewService`] wires it
//! to a [`ReviewStore`] (state plus history, committed together) and a
//! [`Clock`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexicon_core::{NewEntry, ReviewService, Sm2Scheduler, Storage, SystemClock};
//!
//! // Create storage (uses default platform-specific location)
//! let storage = Arc::new(Storage::new(None)?);
//!
//! let service = ReviewService::new(storage, Sm2Scheduler::default(), Arc::new(SystemClock));
//!
//! // First due today, by the service's clock
//! let entry = service.add_entry(NewEntry::new("falar", "sprechen", "Eu falo português."))?;
//! let outcome = service.record_review(&entry.id, 4, None)?;
//! println!("next review on {}", outcome.state.next_review_date);
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): statically linked SQLite
//! - `encryption`: SQLCipher, keyed by `LEXICON_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod clock;
pub mod config;
pub mod review;
pub mod sm2;
pub mod storage;
pub mod vocabulary;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use clock::{Clock, FixedClock, SystemClock};

pub use config::{Config, ConfigError, StorageConfig};

pub use sm2::{
    IntervalBasis, InvalidQuality, LearningPhase, PreviewResults, QualityRating, ReviewEvent,
    SchedulerConfig, SchedulingState, Sm2Scheduler, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR,
};

pub use storage::{
    InMemoryStore, ReviewRecorder, ReviewStore, Storage, StorageError, VocabularyStore,
};

pub use review::{ReviewError, ReviewOutcome, ReviewPolicy, ReviewService};

pub use vocabulary::{
    Category, EntryUpdate, NewEntry, ReviewRecord, ReviewSession, SearchField, SessionEntry,
    SessionStatus, VocabularyEntry,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Category, Clock, Config, NewEntry, QualityRating, ReviewError, ReviewService,
        SchedulingState, Sm2Scheduler, Storage, StorageError, SystemClock, VocabularyEntry,
    };
}
