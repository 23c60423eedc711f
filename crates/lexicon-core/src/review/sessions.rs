//! Review sessions over the SQLite store

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::storage::{Storage, StorageError};
use crate::vocabulary::{Category, ReviewRecord, ReviewSession, SessionStatus};

use super::{Result, ReviewError, ReviewService};

impl ReviewService<Storage> {
    /// Snapshot the entries due today into a new session.
    ///
    /// An empty session is valid when nothing is due.
    pub fn start_session(
        &self,
        limit: Option<u32>,
        category: Option<Category>,
    ) -> Result<ReviewSession> {
        let due = self.store().get_due_entries(self.today(), None)?;
        let ids: Vec<String> = due
            .into_iter()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .map(|e| e.id)
            .collect();

        let session = self.store().save_session(&ids)?;
        info!(session_id = %session.id, entries = session.total_entries, "Started review session");
        Ok(session)
    }

    pub fn get_session(&self, session_id: &str) -> Result<ReviewSession> {
        self.store()
            .get_session(session_id)?
            .ok_or_else(|| StorageError::NotFound(session_id.to_string()).into())
    }

    fn open_session(&self, session_id: &str) -> Result<ReviewSession> {
        let session = self.get_session(session_id)?;
        if session.status != SessionStatus::InProgress {
            return Err(ReviewError::SessionClosed {
                id: session.id,
                status: session.status,
            });
        }
        Ok(session)
    }

    /// Rate one entry of an open session. The review, its history row and the
    /// session mark are committed together.
    pub fn rate_in_session(
        &self,
        session_id: &str,
        entry_id: &str,
        quality: i32,
    ) -> Result<ReviewSession> {
        let session = self.open_session(session_id)?;
        if !session.contains(entry_id) {
            return Err(ReviewError::NotInSession {
                session_id: session_id.to_string(),
                entry_id: entry_id.to_string(),
            });
        }

        let quality = self.accept_quality(quality)?;
        let (_, _, (_, session)) = self.apply(entry_id, quality, |store, event| {
            store.commit_session_review(session_id, event, None, Utc::now())
        })?;
        Ok(session)
    }

    pub fn complete_session(&self, session_id: &str) -> Result<ReviewSession> {
        self.close_session(session_id, SessionStatus::Completed)
    }

    pub fn abandon_session(&self, session_id: &str) -> Result<ReviewSession> {
        self.close_session(session_id, SessionStatus::Abandoned)
    }

    fn close_session(&self, session_id: &str, status: SessionStatus) -> Result<ReviewSession> {
        let session = self
            .store()
            .set_session_status(session_id, status, Some(Utc::now()))?;
        info!(
            session_id = %session.id,
            %status,
            completed = session.completed_entries,
            total = session.total_entries,
            "Closed review session"
        );
        Ok(session)
    }

    pub fn sessions_by_status(&self, status: SessionStatus) -> Result<Vec<ReviewSession>> {
        Ok(self.store().list_sessions_by_status(status)?)
    }

    /// Sessions started within `[start, end]`
    pub fn sessions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReviewSession>> {
        if end < start {
            return Err(ReviewError::InvalidRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(self.store().list_sessions_between(start, end)?)
    }

    /// Review history with `start <= review_date <= end`
    pub fn history_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ReviewRecord>> {
        if end < start {
            return Err(ReviewError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(self.store().get_review_history_between(start, end)?)
    }
}
