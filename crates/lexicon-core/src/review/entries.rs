//! Entry creation on the service's clock

use tracing::info;

use crate::storage::Storage;
use crate::vocabulary::{NewEntry, VocabularyEntry};

use super::{Result, ReviewService};

impl ReviewService<Storage> {
    /// Add an entry; without an explicit due date it is first due today
    pub fn add_entry(&self, input: NewEntry) -> Result<VocabularyEntry> {
        let due = input.due.unwrap_or_else(|| self.today());
        let entry = self.store().add_entry(input.due_on(due))?;
        info!(entry_id = %entry.id, due = %due, "Added vocabulary entry");
        Ok(entry)
    }
}
