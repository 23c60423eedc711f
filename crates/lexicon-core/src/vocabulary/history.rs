//! Review history
//!
//! Append-only records written after every scheduling update. Used for
//! reporting only; the scheduler never reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sm2::{ReviewEvent, DEFAULT_EASE_FACTOR};

/// One recorded review with the state it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: String,
    pub entry_id: String,
    pub review_date: NaiveDate,
    /// Rating after clamping into 0..=5
    pub quality_rating: u8,
    pub notes: Option<String>,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// History row for `event`, stamped now
    pub fn from_event(event: &ReviewEvent, notes: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            entry_id: event.item_id.clone(),
            review_date: event.review_date,
            quality_rating: event.quality.value(),
            notes: notes.map(str::to_string),
            repetitions: event.state.repetitions.unwrap_or(0),
            ease_factor: event.state.ease_factor.unwrap_or(DEFAULT_EASE_FACTOR),
            next_review_date: event.state.next_review_date,
            created_at: Utc::now(),
        }
    }
}
