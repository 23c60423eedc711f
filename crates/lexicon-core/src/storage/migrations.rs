//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: vocabulary entries with SM-2 state, review history",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Review sessions",
        up: MIGRATION_V2_UP,
    },
    Migration {
        version: 3,
        description: "Store the scheduled interval alongside SM-2 state",
        up: MIGRATION_V3_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS vocabulary_entries (
    id TEXT PRIMARY KEY,
    word_pt TEXT NOT NULL,
    word_de TEXT NOT NULL,
    example TEXT NOT NULL DEFAULT '',
    level INTEGER NOT NULL DEFAULT 1,
    category TEXT NOT NULL DEFAULT 'verbs',
    notes TEXT,
    pronunciation TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,

    -- SM-2 state (NULL until the first review)
    repetitions INTEGER,
    ease_factor REAL,
    last_review_date TEXT,
    next_review_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_next_review ON vocabulary_entries(next_review_date);
CREATE INDEX IF NOT EXISTS idx_entries_category ON vocabulary_entries(category);

-- Append-only review history with the resulting state snapshot
CREATE TABLE IF NOT EXISTS review_history (
    id TEXT PRIMARY KEY,
    entry_id TEXT NOT NULL REFERENCES vocabulary_entries(id) ON DELETE CASCADE,
    review_date TEXT NOT NULL,
    quality_rating INTEGER NOT NULL,
    notes TEXT,
    repetitions INTEGER NOT NULL,
    ease_factor REAL NOT NULL,
    next_review_date TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_entry ON review_history(entry_id);
CREATE INDEX IF NOT EXISTS idx_history_date ON review_history(review_date);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Review sessions
const MIGRATION_V2_UP: &str = r#"
CREATE TABLE IF NOT EXISTS review_sessions (
    id TEXT PRIMARY KEY,
    start_time TEXT NOT NULL,
    end_time TEXT,
    total_entries INTEGER NOT NULL DEFAULT 0,
    completed_entries INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'in_progress',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_status ON review_sessions(status);
CREATE INDEX IF NOT EXISTS idx_sessions_start ON review_sessions(start_time);

CREATE TABLE IF NOT EXISTS review_session_entries (
    session_id TEXT NOT NULL REFERENCES review_sessions(id) ON DELETE CASCADE,
    entry_id TEXT NOT NULL REFERENCES vocabulary_entries(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    reviewed INTEGER NOT NULL DEFAULT 0,
    quality_rating INTEGER,
    review_time TEXT,
    PRIMARY KEY (session_id, entry_id)
);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// V3: Scheduled interval
///
/// Lets the scheduler use the literal previous interval instead of the
/// elapsed-days approximation when configured to.
const MIGRATION_V3_UP: &str = r#"
ALTER TABLE vocabulary_entries ADD COLUMN interval_days INTEGER;

UPDATE schema_version SET version = 3, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
