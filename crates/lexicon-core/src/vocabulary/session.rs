//! Review sessions
//!
//! A session is a snapshot of the entries due when it was started, plus the
//! rating given to each one as the learner works through them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "abandoned" => Ok(SessionStatus::Abandoned),
            _ => Err(format!(
                "Invalid status: {}. Valid values are in_progress, completed, abandoned",
                s
            )),
        }
    }
}

/// An entry's slot within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub entry_id: String,
    pub reviewed: bool,
    pub quality_rating: Option<u8>,
    pub review_time: Option<DateTime<Utc>>,
}

/// A review session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_entries: u32,
    pub completed_entries: u32,
    pub status: SessionStatus,
    pub entries: Vec<SessionEntry>,
    pub created_at: DateTime<Utc>,
}

impl ReviewSession {
    /// Entries not yet rated in this session
    pub fn remaining(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter().filter(|e| !e.reviewed)
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.entries.iter().any(|e| e.entry_id == entry_id)
    }
}
