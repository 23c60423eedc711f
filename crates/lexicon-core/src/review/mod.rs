//! Review Module
//!
//! Orchestrates one review: load the item's state, run the scheduler, store
//! the new state and append history. Also drives review sessions.

mod entries;
mod service;
mod sessions;

use serde::{Deserialize, Serialize};

use crate::sm2::InvalidQuality;
use crate::storage::StorageError;

pub use service::{ReviewOutcome, ReviewService};

/// How ratings from callers are accepted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewPolicy {
    /// Reject ratings outside 0..=5 instead of clamping them
    pub strict_quality: bool,
}

/// Review service error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    InvalidQuality(#[from] InvalidQuality),
    /// End of a date or time range lies before its start
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },
    /// Session is completed or abandoned
    #[error("Session {id} is {status}")]
    SessionClosed {
        id: String,
        status: crate::vocabulary::SessionStatus,
    },
    /// Entry is not part of the session
    #[error("Entry {entry_id} is not part of session {session_id}")]
    NotInSession {
        session_id: String,
        entry_id: String,
    },
}

impl From<StorageError> for ReviewError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::SessionClosed { id, status } => ReviewError::SessionClosed { id, status },
            other => ReviewError::Storage(other),
        }
    }
}

/// Review result type
pub type Result<T> = std::result::Result<T, ReviewError>;
