//! SQLite Storage Implementation
//!
//! Vocabulary store, review recorder and session persistence on one database.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::sm2::{ReviewEvent, SchedulingState};
use crate::vocabulary::{
    Category, EntryUpdate, NewEntry, ReviewRecord, ReviewSession, SearchField, SessionEntry,
    SessionStatus, VocabularyEntry,
};

use super::store::{ReviewRecorder, ReviewStore, VocabularyStore};

/// Environment variable holding the SQLCipher key
#[cfg(feature = "encryption")]
pub const ENCRYPTION_KEY_ENV: &str = "LEXICON_ENCRYPTION_KEY";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Entry or session not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored value could not be encoded or decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// Session is no longer in progress
    #[error("Session {id} is {status}")]
    SessionClosed { id: String, status: SessionStatus },
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::InvalidData(e.to_string())
    }
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// STORAGE
// ============================================================================

/// SQLite-backed vocabulary store
///
/// Uses separate reader/writer connections. All methods take `&self`, so a
/// `Storage` can be shared behind an `Arc` without an outer mutex.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl Storage {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var(ENCRYPTION_KEY_ENV) {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        // SQLite's lower() only folds ASCII
        conn.create_scalar_function(
            "lexicon_fold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: Option<String> = ctx.get(0)?;
                Ok(text.map(|t| t.to_lowercase()))
            },
        )?;

        Ok(())
    }

    /// Default database location in the platform data directory
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "lexicon", "lexicon").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("lexicon.db"))
    }

    /// Open (or create) a database; `None` uses the platform data directory
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let path = Self::default_db_path()?;
                if let Some(data_dir) = path.parent() {
                    std::fs::create_dir_all(data_dir)?;
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        let perms = std::fs::Permissions::from_mode(0o700);
                        let _ = std::fs::set_permissions(data_dir, perms);
                    }
                }
                path
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        let applied = super::migrations::apply_migrations(&writer_conn)?;
        if applied > 0 {
            tracing::info!("Applied {} migration(s) to {}", applied, path.display());
        }

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    fn timestamp(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn invalid(field: &str, message: String) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid {}: {}", field, message),
            )),
        )
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Self::invalid(field_name, format!("'{}': {}", value, e)))
    }

    fn parse_optional_timestamp(
        value: Option<String>,
        field_name: &str,
    ) -> rusqlite::Result<Option<DateTime<Utc>>> {
        value
            .map(|s| Self::parse_timestamp(&s, field_name))
            .transpose()
    }

    fn row_to_state(row: &rusqlite::Row) -> rusqlite::Result<SchedulingState> {
        Ok(SchedulingState {
            repetitions: row.get("repetitions")?,
            ease_factor: row.get("ease_factor")?,
            last_review_date: row.get("last_review_date")?,
            next_review_date: row.get("next_review_date")?,
            interval_days: row.get("interval_days")?,
        })
    }

    /// Convert a row to VocabularyEntry
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<VocabularyEntry> {
        let tags_json: String = row.get("tags")?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| Self::invalid("tags", format!("'{}': {}", tags_json, e)))?;

        let category: String = row.get("category")?;
        let category = category
            .parse::<Category>()
            .map_err(|e| Self::invalid("category", e))?;

        let created_at: String = row.get("created_at")?;

        Ok(VocabularyEntry {
            id: row.get("id")?,
            word_pt: row.get("word_pt")?,
            word_de: row.get("word_de")?,
            example: row.get("example")?,
            level: row.get("level")?,
            category,
            notes: row.get("notes")?,
            pronunciation: row.get("pronunciation")?,
            tags,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            scheduling: Self::row_to_state(row)?,
        })
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ReviewRecord> {
        let created_at: String = row.get("created_at")?;
        Ok(ReviewRecord {
            id: row.get("id")?,
            entry_id: row.get("entry_id")?,
            review_date: row.get("review_date")?,
            quality_rating: row.get("quality_rating")?,
            notes: row.get("notes")?,
            repetitions: row.get("repetitions")?,
            ease_factor: row.get("ease_factor")?,
            next_review_date: row.get("next_review_date")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    fn collect<T>(
        rows: impl Iterator<Item = rusqlite::Result<T>>,
    ) -> Result<Vec<T>> {
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // ========================================================================
    // ENTRIES
    // ========================================================================

    /// Insert a new, never-reviewed entry.
    ///
    /// `input.due` is required here; [`ReviewService::add_entry`] fills it
    /// from its clock.
    ///
    /// [`ReviewService::add_entry`]: crate::review::ReviewService::add_entry
    pub fn add_entry(&self, input: NewEntry) -> Result<VocabularyEntry> {
        let due = input.due.ok_or_else(|| {
            StorageError::InvalidData(format!("entry '{}' has no first review date", input.word_pt))
        })?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let tags_json = serde_json::to_string(&input.tags)?;

        {
            let writer = self.writer()?;
            writer.execute(
                "INSERT INTO vocabulary_entries (
                    id, word_pt, word_de, example, level, category,
                    notes, pronunciation, tags, created_at, next_review_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    input.word_pt,
                    input.word_de,
                    input.example,
                    input.level,
                    input.category.as_str(),
                    input.notes,
                    input.pronunciation,
                    tags_json,
                    Self::timestamp(&now),
                    due,
                ],
            )?;
        }

        tracing::debug!(entry_id = %id, word = %input.word_pt, "Added vocabulary entry");

        self.get_entry(&id)?
            .ok_or_else(|| StorageError::NotFound(id))
    }

    /// Get an entry by ID
    pub fn get_entry(&self, id: &str) -> Result<Option<VocabularyEntry>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare("SELECT * FROM vocabulary_entries WHERE id = ?1")?;
        let entry = stmt
            .query_row(params![id], |row| Self::row_to_entry(row))
            .optional()?;
        Ok(entry)
    }

    /// All entries, oldest first
    pub fn list_entries(&self, limit: u32, offset: u32) -> Result<Vec<VocabularyEntry>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM vocabulary_entries
             ORDER BY created_at ASC, id ASC
             LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, offset], |row| Self::row_to_entry(row))?;
        Self::collect(rows)
    }

    /// Entries in one category, oldest first
    pub fn list_by_category(
        &self,
        category: Category,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<VocabularyEntry>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM vocabulary_entries
             WHERE category = ?1
             ORDER BY created_at ASC, id ASC
             LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![category.as_str(), limit, offset], |row| {
            Self::row_to_entry(row)
        })?;
        Self::collect(rows)
    }

    /// Case-insensitive substring search, oldest first
    pub fn search(&self, query: &str, field: SearchField, limit: u32) -> Result<Vec<VocabularyEntry>> {
        let needle = query.trim().to_lowercase();
        let clause = field
            .columns()
            .iter()
            .map(|column| format!("instr(lexicon_fold({}), ?1) > 0", column))
            .collect::<Vec<_>>()
            .join(" OR ");

        let reader = self.reader()?;
        let mut stmt = reader.prepare(&format!(
            "SELECT * FROM vocabulary_entries
             WHERE {}
             ORDER BY created_at ASC, id ASC
             LIMIT ?2",
            clause
        ))?;
        let rows = stmt.query_map(params![needle, limit], |row| Self::row_to_entry(row))?;
        Self::collect(rows)
    }

    /// Edit an entry's content; scheduling state and creation time are kept
    pub fn update_entry(&self, id: &str, update: EntryUpdate) -> Result<VocabularyEntry> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;

        let current = tx
            .query_row(
                "SELECT * FROM vocabulary_entries WHERE id = ?1",
                params![id],
                |row| Self::row_to_entry(row),
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let entry = update.apply_to(current);

        tx.execute(
            "UPDATE vocabulary_entries SET
                word_pt = ?1,
                word_de = ?2,
                example = ?3,
                level = ?4,
                category = ?5,
                notes = ?6,
                pronunciation = ?7,
                tags = ?8
            WHERE id = ?9",
            params![
                entry.word_pt,
                entry.word_de,
                entry.example,
                entry.level,
                entry.category.as_str(),
                entry.notes,
                entry.pronunciation,
                serde_json::to_string(&entry.tags)?,
                id,
            ],
        )?;
        tx.commit()?;

        tracing::debug!(entry_id = %id, "Updated vocabulary entry");
        Ok(entry)
    }

    /// Entries due on or before `today`, most overdue first
    pub fn get_due_entries(&self, today: NaiveDate, limit: Option<u32>) -> Result<Vec<VocabularyEntry>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(i64::from).unwrap_or(-1);

        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM vocabulary_entries
             WHERE next_review_date <= ?1
             ORDER BY next_review_date ASC, created_at ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![today, limit], |row| Self::row_to_entry(row))?;
        Self::collect(rows)
    }

    /// Number of stored entries
    pub fn count_entries(&self) -> Result<i64> {
        let reader = self.reader()?;
        let count = reader.query_row("SELECT COUNT(*) FROM vocabulary_entries", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// Delete an entry and its history; false if it did not exist
    pub fn delete_entry(&self, id: &str) -> Result<bool> {
        let writer = self.writer()?;
        let rows = writer.execute("DELETE FROM vocabulary_entries WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ========================================================================
    // REVIEW HISTORY
    // ========================================================================

    /// History of one entry, oldest first
    pub fn get_review_history(&self, entry_id: &str) -> Result<Vec<ReviewRecord>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM review_history
             WHERE entry_id = ?1
             ORDER BY review_date ASC, created_at ASC",
        )?;
        let rows = stmt.query_map(params![entry_id], |row| Self::row_to_record(row))?;
        Self::collect(rows)
    }

    /// History across all entries with `start <= review_date <= end`
    pub fn get_review_history_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ReviewRecord>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM review_history
             WHERE review_date BETWEEN ?1 AND ?2
             ORDER BY review_date ASC, created_at ASC",
        )?;
        let rows = stmt.query_map(params![start, end], |row| Self::row_to_record(row))?;
        Self::collect(rows)
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Persist a new in-progress session over `entry_ids`
    pub fn save_session(&self, entry_ids: &[String]) -> Result<ReviewSession> {
        let id = Uuid::new_v4().to_string();
        let now = Self::timestamp(&Utc::now());

        {
            let mut writer = self.writer()?;
            let tx = writer.transaction()?;
            tx.execute(
                "INSERT INTO review_sessions (
                    id, start_time, total_entries, completed_entries, status, created_at
                ) VALUES (?1, ?2, ?3, 0, ?4, ?2)",
                params![
                    id,
                    now,
                    entry_ids.len() as i64,
                    SessionStatus::InProgress.as_str()
                ],
            )?;
            for (position, entry_id) in entry_ids.iter().enumerate() {
                tx.execute(
                    "INSERT INTO review_session_entries (session_id, entry_id, position)
                     VALUES (?1, ?2, ?3)",
                    params![id, entry_id, position as i64],
                )?;
            }
            tx.commit()?;
        }

        self.get_session(&id)?
            .ok_or_else(|| StorageError::NotFound(id))
    }

    /// Load a session with its entries in presentation order
    pub fn get_session(&self, id: &str) -> Result<Option<ReviewSession>> {
        let reader = self.reader()?;
        Self::load_session(&reader, id)
    }

    fn load_session(conn: &Connection, id: &str) -> Result<Option<ReviewSession>> {
        let header = conn
            .query_row(
                "SELECT id, start_time, end_time, total_entries, completed_entries, status, created_at
                 FROM review_sessions WHERE id = ?1",
                params![id],
                |row| {
                    let status: String = row.get("status")?;
                    let status = status
                        .parse::<SessionStatus>()
                        .map_err(|e| Self::invalid("status", e))?;
                    let start_time: String = row.get("start_time")?;
                    let created_at: String = row.get("created_at")?;
                    Ok(ReviewSession {
                        id: row.get("id")?,
                        start_time: Self::parse_timestamp(&start_time, "start_time")?,
                        end_time: Self::parse_optional_timestamp(row.get("end_time")?, "end_time")?,
                        total_entries: row.get("total_entries")?,
                        completed_entries: row.get("completed_entries")?,
                        status,
                        entries: Vec::new(),
                        created_at: Self::parse_timestamp(&created_at, "created_at")?,
                    })
                },
            )
            .optional()?;

        let Some(mut session) = header else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT entry_id, reviewed, quality_rating, review_time
             FROM review_session_entries
             WHERE session_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(SessionEntry {
                entry_id: row.get("entry_id")?,
                reviewed: row.get("reviewed")?,
                quality_rating: row.get("quality_rating")?,
                review_time: Self::parse_optional_timestamp(row.get("review_time")?, "review_time")?,
            })
        })?;
        session.entries = Self::collect(rows)?;

        Ok(Some(session))
    }

    fn session_status(conn: &Connection, session_id: &str) -> Result<Option<SessionStatus>> {
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM review_sessions WHERE id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        status
            .map(|s| s.parse::<SessionStatus>().map_err(StorageError::InvalidData))
            .transpose()
    }

    /// Why a write guarded on `status = 'in_progress'` touched no rows
    fn session_not_open(conn: &Connection, session_id: &str, entry_id: Option<&str>) -> StorageError {
        match Self::session_status(conn, session_id) {
            Ok(Some(SessionStatus::InProgress)) => StorageError::NotFound(format!(
                "entry {} in session {}",
                entry_id.unwrap_or_default(),
                session_id
            )),
            Ok(Some(status)) => StorageError::SessionClosed {
                id: session_id.to_string(),
                status,
            },
            Ok(None) => StorageError::NotFound(session_id.to_string()),
            Err(e) => e,
        }
    }

    fn mark_entry(
        conn: &Connection,
        session_id: &str,
        entry_id: &str,
        quality: u8,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let rows = conn.execute(
            "UPDATE review_session_entries
             SET reviewed = 1, quality_rating = ?1, review_time = ?2
             WHERE session_id = ?3 AND entry_id = ?4
               AND EXISTS (SELECT 1 FROM review_sessions WHERE id = ?3 AND status = ?5)",
            params![
                quality,
                Self::timestamp(&at),
                session_id,
                entry_id,
                SessionStatus::InProgress.as_str()
            ],
        )?;
        if rows == 0 {
            return Err(Self::session_not_open(conn, session_id, Some(entry_id)));
        }

        conn.execute(
            "UPDATE review_sessions
             SET completed_entries = (
                 SELECT COUNT(*) FROM review_session_entries
                 WHERE session_id = ?1 AND reviewed = 1
             )
             WHERE id = ?1",
            params![session_id],
        )?;
        Ok(())
    }

    /// Record the rating for one entry of an open session and refresh the
    /// completed count
    pub fn mark_session_entry(
        &self,
        session_id: &str,
        entry_id: &str,
        quality: u8,
        at: DateTime<Utc>,
    ) -> Result<ReviewSession> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        Self::mark_entry(&tx, session_id, entry_id, quality, at)?;
        let session = Self::load_session(&tx, session_id)?
            .ok_or_else(|| StorageError::NotFound(session_id.to_string()))?;
        tx.commit()?;
        Ok(session)
    }

    /// Apply a review inside an open session: new state, history row and
    /// session mark land in one transaction or not at all
    pub fn commit_session_review(
        &self,
        session_id: &str,
        event: &ReviewEvent,
        notes: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(ReviewRecord, ReviewSession)> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        Self::mark_entry(&tx, session_id, &event.item_id, event.quality.value(), at)?;
        let record = Self::write_review(&tx, event, notes)?;
        let session = Self::load_session(&tx, session_id)?
            .ok_or_else(|| StorageError::NotFound(session_id.to_string()))?;
        tx.commit()?;
        Ok((record, session))
    }

    /// Close an in-progress session, stamping `end_time`.
    ///
    /// Only the first close of a session succeeds; later ones get
    /// `SessionClosed`.
    pub fn set_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<ReviewSession> {
        let writer = self.writer()?;
        let rows = writer.execute(
            "UPDATE review_sessions SET status = ?1, end_time = ?2
             WHERE id = ?3 AND status = ?4",
            params![
                status.as_str(),
                end_time.as_ref().map(Self::timestamp),
                session_id,
                SessionStatus::InProgress.as_str()
            ],
        )?;
        if rows == 0 {
            return Err(Self::session_not_open(&writer, session_id, None));
        }

        Self::load_session(&writer, session_id)?
            .ok_or_else(|| StorageError::NotFound(session_id.to_string()))
    }

    fn sessions_where(&self, clause: &str, args: impl rusqlite::Params) -> Result<Vec<ReviewSession>> {
        let reader = self.reader()?;
        let ids: Vec<String> = {
            let mut stmt = reader.prepare(&format!(
                "SELECT id FROM review_sessions WHERE {} ORDER BY start_time ASC",
                clause
            ))?;
            let rows = stmt.query_map(args, |row| row.get(0))?;
            Self::collect(rows)?
        };

        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(session) = Self::load_session(&reader, &id)? {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    /// Sessions in one status, oldest first
    pub fn list_sessions_by_status(&self, status: SessionStatus) -> Result<Vec<ReviewSession>> {
        self.sessions_where("status = ?1", params![status.as_str()])
    }

    /// Sessions started within `[start, end]`
    pub fn list_sessions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ReviewSession>> {
        self.sessions_where(
            "start_time BETWEEN ?1 AND ?2",
            params![Self::timestamp(&start), Self::timestamp(&end)],
        )
    }
}

// ============================================================================
// COLLABORATOR CONTRACTS
// ============================================================================

impl Storage {
    fn write_state(conn: &Connection, item_id: &str, state: &SchedulingState) -> Result<()> {
        let rows = conn.execute(
            "UPDATE vocabulary_entries SET
                repetitions = ?1,
                ease_factor = ?2,
                last_review_date = ?3,
                next_review_date = ?4,
                interval_days = ?5
            WHERE id = ?6",
            params![
                state.repetitions,
                state.ease_factor,
                state.last_review_date,
                state.next_review_date,
                state.interval_days,
                item_id,
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::NotFound(item_id.to_string()));
        }
        Ok(())
    }

    fn insert_record(conn: &Connection, record: &ReviewRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO review_history (
                id, entry_id, review_date, quality_rating, notes,
                repetitions, ease_factor, next_review_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.entry_id,
                record.review_date,
                record.quality_rating,
                record.notes,
                record.repetitions,
                record.ease_factor,
                record.next_review_date,
                Self::timestamp(&record.created_at),
            ],
        )?;
        Ok(())
    }

    fn write_review(conn: &Connection, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord> {
        Self::write_state(conn, &event.item_id, &event.state)?;
        let record = ReviewRecord::from_event(event, notes);
        Self::insert_record(conn, &record)?;
        Ok(record)
    }
}

impl VocabularyStore for Storage {
    fn load(&self, item_id: &str) -> Result<SchedulingState> {
        let reader = self.reader()?;
        reader
            .query_row(
                "SELECT repetitions, ease_factor, last_review_date, next_review_date, interval_days
                 FROM vocabulary_entries WHERE id = ?1",
                params![item_id],
                |row| Self::row_to_state(row),
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(item_id.to_string()))
    }

    fn store(&self, item_id: &str, state: &SchedulingState) -> Result<()> {
        let writer = self.writer()?;
        Self::write_state(&writer, item_id, state)
    }
}

impl ReviewRecorder for Storage {
    fn record(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord> {
        let record = ReviewRecord::from_event(event, notes);
        let writer = self.writer()?;
        Self::insert_record(&writer, &record)?;
        Ok(record)
    }
}

impl ReviewStore for Storage {
    fn commit_review(&self, event: &ReviewEvent, notes: Option<&str>) -> Result<ReviewRecord> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        let record = Self::write_review(&tx, event, notes)?;
        tx.commit()?;
        Ok(record)
    }
}
