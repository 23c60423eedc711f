//! Collaborator contracts of the scheduler
//!
//! The scheduler itself is pure. Anything that wants to persist its output
//! implements these traits; [`ReviewService`](crate::review::ReviewService)
//! wires them together.

use crate::sm2::{ReviewEvent, SchedulingState};
use crate::vocabulary::ReviewRecord;

use super::Result;

/// Loads and persists scheduling state keyed by item id
pub trait VocabularyStore: Send + Sync {
    /// Current state of an item. Never-reviewed items come back with unset
    /// repetitions/ease/last-review fields; unknown ids are `NotFound`.
    fn load(&self, item_id: &str) -> Result<SchedulingState>;

    /// Replace the stored state of an item
    fn store(&self, item_id: &str, state: &SchedulingState) -> Result<()>;
}

/// Appends immutable review history
pub trait ReviewRecorder: Send + Sync {
    fn record(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord>;
}

/// Commits a review's new state and its history row as one unit
///
/// Either both become visible or neither does. Unknown ids are `NotFound`
/// and leave history untouched.
pub trait ReviewStore: VocabularyStore + ReviewRecorder {
    fn commit_review(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord>;
}
