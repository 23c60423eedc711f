//! Storage Module
//!
//! Persistence behind the scheduler:
//! - [`VocabularyStore`] / [`ReviewRecorder`] / [`ReviewStore`] contracts
//! - SQLite implementation with migrations, history and sessions
//! - In-memory implementation for tests and replays

mod memory;
mod migrations;
mod sqlite;
mod store;

pub use memory::InMemoryStore;
pub use migrations::MIGRATIONS;
pub use sqlite::{Result, Storage, StorageError};
pub use store::{ReviewRecorder, ReviewStore, VocabularyStore};

#[cfg(feature = "encryption")]
pub use sqlite::ENCRYPTION_KEY_ENV;
