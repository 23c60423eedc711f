//! Vocabulary module - domain records around the scheduler
//!
//! - Entries with their SM-2 scheduling state
//! - Immutable review history
//! - Review sessions

mod entry;
mod history;
mod session;

pub use entry::{Category, EntryUpdate, NewEntry, SearchField, VocabularyEntry};
pub use history::ReviewRecord;
pub use session::{ReviewSession, SessionEntry, SessionStatus};
