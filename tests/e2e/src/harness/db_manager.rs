//! Test Database Manager
//!
//! Provides isolated database instances for testing:
//! - Temporary databases that are automatically cleaned up
//! - A review service bound to a manual clock
//! - Reopening the same file to check persistence

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use lexicon_core::{Config, ReviewService, Storage, VocabularyEntry};
use tempfile::TempDir;

use super::ManualClock;

/// Manager for test databases
///
/// Creates isolated database instances for each test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp(start);
///
/// let entry = db.service.add_entry(NewEntry::new("falar", "sprechen", ""))?;
/// db.service.record_review(&entry.id, 4, None)?;
/// db.clock.advance(1);
///
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// Review service over the test database
    pub service: ReviewService<Storage>,
    /// Clock the service reads "today" from
    pub clock: Arc<ManualClock>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory, starting the clock at `start`
    pub fn new_temp(start: NaiveDate) -> Self {
        Self::new_temp_with_config(start, &Config::default())
    }

    /// Like [`new_temp`](Self::new_temp) with scheduler and policy settings
    pub fn new_temp_with_config(start: NaiveDate, config: &Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_lexicon.db");
        let mut manager = Self::new_at_path(db_path, start, config);
        manager._temp_dir = Some(temp_dir);
        manager
    }

    /// Create a test database at a specific path
    ///
    /// The database is NOT automatically deleted.
    pub fn new_at_path(path: PathBuf, start: NaiveDate, config: &Config) -> Self {
        let storage = Storage::new(Some(path.clone())).expect("Failed to create test storage");
        let clock = Arc::new(ManualClock::new(start));
        let service = ReviewService::from_config(Arc::new(storage), config, clock.clone());

        Self {
            service,
            clock,
            _temp_dir: None,
            db_path: path,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn storage(&self) -> &Storage {
        self.service.store()
    }

    /// Open a second, independent connection to the same file
    pub fn reopen(&self) -> Storage {
        Storage::new(Some(self.db_path.clone())).expect("Failed to reopen test storage")
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Get the number of entries in the database
    pub fn entry_count(&self) -> i64 {
        self.storage().count_entries().unwrap_or(0)
    }

    /// Fetch an entry that must exist
    pub fn entry(&self, id: &str) -> VocabularyEntry {
        self.storage()
            .get_entry(id)
            .expect("Failed to read entry")
            .expect("Entry missing")
    }

    /// Advance the clock to an entry's next review date
    pub fn jump_to_due(&self, id: &str) -> NaiveDate {
        let due = self.entry(id).scheduling.next_review_date;
        self.clock.set(due);
        due
    }
}
