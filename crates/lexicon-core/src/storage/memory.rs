//! In-memory store
//!
//! Keeps scheduling state and history in process memory. Used by tests and
//! by callers that replay reviews without touching disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::sm2::{ReviewEvent, SchedulingState};
use crate::vocabulary::ReviewRecord;

use super::store::{ReviewRecorder, ReviewStore, VocabularyStore};
use super::{Result, StorageError};

#[derive(Debug, Default)]
struct Inner {
    states: HashMap<String, SchedulingState>,
    history: Vec<ReviewRecord>,
}

/// `HashMap`-backed [`ReviewStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Init("Store lock poisoned".into()))
    }

    /// Register an item (or overwrite its state)
    pub fn insert(&self, item_id: impl Into<String>, state: SchedulingState) -> Result<()> {
        self.lock()?.states.insert(item_id.into(), state);
        Ok(())
    }

    /// Recorded history for one item, in recording order
    pub fn history(&self, item_id: &str) -> Result<Vec<ReviewRecord>> {
        Ok(self
            .lock()?
            .history
            .iter()
            .filter(|r| r.entry_id == item_id)
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VocabularyStore for InMemoryStore {
    fn load(&self, item_id: &str) -> Result<SchedulingState> {
        self.lock()?
            .states
            .get(item_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))
    }

    fn store(&self, item_id: &str, state: &SchedulingState) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.states.get_mut(item_id) {
            Some(slot) => {
                *slot = state.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(item_id.to_string())),
        }
    }
}

impl ReviewRecorder for InMemoryStore {
    fn record(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord> {
        let record = ReviewRecord::from_event(event, notes);
        self.lock()?.history.push(record.clone());
        Ok(record)
    }
}

impl ReviewStore for InMemoryStore {
    fn commit_review(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord> {
        let mut inner = self.lock()?;
        let slot = inner
            .states
            .get_mut(&event.item_id)
            .ok_or_else(|| StorageError::NotFound(event.item_id.clone()))?;
        *slot = event.state.clone();

        let record = ReviewRecord::from_event(event, notes);
        inner.history.push(record.clone());
        Ok(record)
    }
}
