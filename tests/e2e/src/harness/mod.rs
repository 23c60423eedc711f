//! Test harness

mod clock;
mod db_manager;

pub use clock::ManualClock;
pub use db_manager::TestDatabaseManager;
