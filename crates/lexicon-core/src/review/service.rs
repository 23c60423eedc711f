//! Review service
//!
//! One read-modify-write per item id is in flight at a time; concurrent
//! reviews of different items proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::Config;
use crate::sm2::{PreviewResults, QualityRating, ReviewEvent, SchedulingState, Sm2Scheduler};
use crate::storage::{Result as StorageResult, ReviewStore, StorageError};
use crate::vocabulary::ReviewRecord;

use super::{Result, ReviewPolicy};

/// Everything produced by one review
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub entry_id: String,
    /// Rating actually applied (after clamping)
    pub quality: QualityRating,
    /// State before the review
    pub previous: SchedulingState,
    /// State after the review, as stored
    pub state: SchedulingState,
    /// History row appended for the review
    pub record: ReviewRecord,
}

/// Wires the scheduler to a store and a clock
pub struct ReviewService<S> {
    store: Arc<S>,
    scheduler: Sm2Scheduler,
    clock: Arc<dyn Clock>,
    policy: ReviewPolicy,
    item_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S> ReviewService<S> {
    pub fn new(store: Arc<S>, scheduler: Sm2Scheduler, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            scheduler,
            clock,
            policy: ReviewPolicy::default(),
            item_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build from loaded configuration
    pub fn from_config(store: Arc<S>, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self::new(store, Sm2Scheduler::new(config.scheduler), clock)
            .with_policy(config.review.clone())
    }

    pub fn with_policy(mut self, policy: ReviewPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &Sm2Scheduler {
        &self.scheduler
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Today according to the injected clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Apply the rating policy at the boundary
    pub(crate) fn accept_quality(&self, quality: i32) -> Result<QualityRating> {
        if self.policy.strict_quality {
            Ok(QualityRating::try_from(quality)?)
        } else {
            Ok(QualityRating::clamped(quality))
        }
    }

    fn lock_table(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>>> {
        self.item_locks
            .lock()
            .map_err(|_| StorageError::Init("Item lock table poisoned".into()).into())
    }

    /// Run `f` while holding the lock for `item_id`.
    ///
    /// The table entry is dropped by the last holder, so ids never seen again
    /// (including unknown ones) do not accumulate.
    fn with_item_lock<T>(&self, item_id: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self
            .lock_table()?
            .entry(item_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(StorageError::Init(format!("Lock for {} poisoned", item_id)).into()),
        };

        let mut locks = self.lock_table()?;
        // Clones are only handed out under the table lock: one for the
        // table plus ours means nobody else is waiting
        if Arc::strong_count(&lock) == 2 {
            locks.remove(item_id);
        }
        drop(lock);
        drop(locks);

        result
    }
}

impl<S: ReviewStore> ReviewService<S> {
    /// Review one item today: load, schedule, then commit state and history
    /// together
    pub fn record_review(
        &self,
        item_id: &str,
        quality: i32,
        notes: Option<&str>,
    ) -> Result<ReviewOutcome> {
        let quality = self.accept_quality(quality)?;
        let (previous, event, record) =
            self.apply(item_id, quality, |store, event| store.commit_review(event, notes))?;
        Ok(ReviewOutcome {
            entry_id: event.item_id,
            quality,
            previous,
            state: event.state,
            record,
        })
    }

    /// Schedule one review under the item's lock and hand the result to
    /// `commit`, which must persist it atomically
    pub(crate) fn apply<T>(
        &self,
        item_id: &str,
        quality: QualityRating,
        commit: impl FnOnce(&S, &ReviewEvent) -> StorageResult<T>,
    ) -> Result<(SchedulingState, ReviewEvent, T)> {
        self.with_item_lock(item_id, || {
            let today = self.today();
            let previous = self.store.load(item_id)?;
            let event = ReviewEvent {
                item_id: item_id.to_string(),
                review_date: today,
                quality,
                state: self.scheduler.schedule(&previous, quality, today),
            };
            let committed = commit(self.store(), &event)?;

            info!(
                entry_id = %item_id,
                quality = quality.value(),
                next_review = %event.state.next_review_date,
                "Recorded review"
            );
            Ok((previous, event, committed))
        })
    }

    /// What each rating would do to an item today, without storing anything
    pub fn preview(&self, item_id: &str) -> Result<PreviewResults> {
        let state = self.store.load(item_id)?;
        debug!(entry_id = %item_id, "Previewing review outcomes");
        Ok(self.scheduler.preview(&state, self.today()))
    }
}
