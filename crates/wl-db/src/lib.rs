//! Storage layer for the work log.
//!
//! Provides persistence for work entries using `rusqlite`.
//!
//! # Concurrency
//!
//! The [`Database`] type wraps a single `rusqlite::Connection` and is meant to
//! be opened once per process run. Separate processes touching the same file
//! are serialized by SQLite's own file locking; a lock that cannot be acquired
//! surfaces as an error and is not retried here.
//!
//! # Schema
//!
//! One table, `entries`:
//!
//! | column       | type                                |
//! |--------------|-------------------------------------|
//! | `id`         | `INTEGER PRIMARY KEY AUTOINCREMENT` |
//! | `started_at` | `TEXT NOT NULL`                     |
//! | `ended_at`   | `TEXT`, null while running          |
//! | `comment`    | `TEXT NOT NULL`                     |
//!
//! `AUTOINCREMENT` keeps ids from being reused after the last entry is reset.
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with second precision and
//! a `Z` suffix (e.g., `2025-01-15T10:30:00Z`), so lexicographic ordering
//! matches chronological ordering.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use wl_core::{Entry, SubjectFilter, TimedEntry};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or initialized.
    #[error("cannot open store at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The operation needs at least one entry.
    #[error("no entries recorded yet")]
    EmptyStore,
    /// No entry has the requested id.
    #[error("no entry with id {0}")]
    EntryNotFound(i64),
    /// A stored timestamp could not be parsed.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Result of [`Database::reset_last`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The entry with this id was deleted.
    Reset(i64),
    /// The store was empty; nothing was deleted.
    Empty,
}

/// Result of [`Database::update_last`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The comment of the entry with this id was rewritten.
    Updated(i64),
    /// The store was empty; nothing was changed.
    Empty,
}

/// Entries returned by [`Database::entries_since`], in id order.
///
/// Derived fields were computed once when the query ran. The iterator is
/// consumed as it is read.
#[derive(Debug)]
pub struct Entries {
    inner: std::vec::IntoIter<TimedEntry>,
}

impl Iterator for Entries {
    type Item = TimedEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries {}

/// Database connection wrapper.
///
/// See the [module documentation](self) for concurrency considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is created on first open. Failures here are reported as
    /// [`DbError::Unavailable`].
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let unavailable = |source| DbError::Unavailable {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        let db = Self { conn };
        db.init().map_err(unavailable)?;
        tracing::info!(path = %path.display(), "opened entry store");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at TEXT NOT NULL,
                ended_at TEXT,
                comment TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_entries_started_at ON entries(started_at);
            ",
        )
    }

    /// Starts a new running entry now. Returns its id.
    ///
    /// Entries that are already running are left alone; call
    /// [`Database::close_existing`] first to keep a single running entry.
    pub fn create(&mut self, comment: &str) -> Result<i64, DbError> {
        self.create_at(comment, Utc::now())
    }

    /// Like [`Database::create`] with an explicit clock.
    pub fn create_at(&mut self, comment: &str, now: DateTime<Utc>) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO entries (started_at, ended_at, comment) VALUES (?, NULL, ?)",
            params![format_timestamp(now), comment],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, comment, "created entry");
        Ok(id)
    }

    /// Ends every running entry now. Returns how many were closed.
    pub fn close_existing(&mut self) -> Result<usize, DbError> {
        self.close_existing_at(Utc::now())
    }

    /// Like [`Database::close_existing`] with an explicit clock.
    pub fn close_existing_at(&mut self, now: DateTime<Utc>) -> Result<usize, DbError> {
        let closed = self.conn.execute(
            "UPDATE entries SET ended_at = ? WHERE ended_at IS NULL",
            [format_timestamp(now)],
        )?;
        tracing::debug!(closed, "closed running entries");
        Ok(closed)
    }

    /// Starts a new running entry with the comment of entry `id`, or of the
    /// latest entry when `id` is `None`. Returns that comment.
    pub fn resume(&mut self, id: Option<i64>) -> Result<String, DbError> {
        self.resume_at(id, Utc::now())
    }

    /// Like [`Database::resume`] with an explicit clock.
    pub fn resume_at(&mut self, id: Option<i64>, now: DateTime<Utc>) -> Result<String, DbError> {
        let tx = self.conn.transaction()?;
        let comment: Option<String> = match id {
            Some(id) => tx
                .query_row("SELECT comment FROM entries WHERE id = ?", [id], |row| {
                    row.get(0)
                })
                .optional()?,
            None => tx
                .query_row(
                    "SELECT comment FROM entries ORDER BY id DESC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?,
        };
        let Some(comment) = comment else {
            return Err(id.map_or(DbError::EmptyStore, DbError::EntryNotFound));
        };
        tx.execute(
            "INSERT INTO entries (started_at, ended_at, comment) VALUES (?, NULL, ?)",
            params![format_timestamp(now), comment],
        )?;
        let new_id = tx.last_insert_rowid();
        tx.commit()?;
        tracing::debug!(from = ?id, id = new_id, comment = %comment, "resumed entry");
        Ok(comment)
    }

    /// Returns the highest entry id.
    pub fn last_entry_id(&self) -> Result<i64, DbError> {
        let id: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM entries", [], |row| row.get(0))?;
        id.ok_or(DbError::EmptyStore)
    }

    /// Deletes the entry with the highest id.
    pub fn reset_last(&mut self) -> Result<ResetOutcome, DbError> {
        let tx = self.conn.transaction()?;
        let Some(id) = max_id(&tx)? else {
            return Ok(ResetOutcome::Empty);
        };
        tx.execute("DELETE FROM entries WHERE id = ?", [id])?;
        tx.commit()?;
        tracing::debug!(id, "reset last entry");
        Ok(ResetOutcome::Reset(id))
    }

    /// Rewrites the comment of the entry with the highest id.
    pub fn update_last(&mut self, comment: &str) -> Result<UpdateOutcome, DbError> {
        let tx = self.conn.transaction()?;
        let Some(id) = max_id(&tx)? else {
            return Ok(UpdateOutcome::Empty);
        };
        tx.execute(
            "UPDATE entries SET comment = ? WHERE id = ?",
            params![comment, id],
        )?;
        tx.commit()?;
        tracing::debug!(id, comment, "updated last entry");
        Ok(UpdateOutcome::Updated(id))
    }

    /// Lists entries that started strictly after `since` and whose comment
    /// matches `filter`, in id order.
    pub fn entries_since(
        &self,
        since: DateTime<Utc>,
        filter: &SubjectFilter,
    ) -> Result<Entries, DbError> {
        self.entries_since_at(since, filter, Utc::now())
    }

    /// Like [`Database::entries_since`], measuring running entries up to `now`.
    pub fn entries_since_at(
        &self,
        since: DateTime<Utc>,
        filter: &SubjectFilter,
        now: DateTime<Utc>,
    ) -> Result<Entries, DbError> {
        let now = now.trunc_subsecs(0);
        let mut stmt = self.conn.prepare(
            "
            SELECT id, started_at, ended_at, comment
            FROM entries
            WHERE started_at > ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([format_timestamp(since)], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                comment: row.get(3)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            let row = row?;
            if !filter.matches(&row.comment) {
                continue;
            }
            entries.push(row.into_entry()?.measure(now));
        }
        tracing::debug!(%since, count = entries.len(), "queried entries");
        Ok(Entries {
            inner: entries.into_iter(),
        })
    }
}

#[derive(Debug)]
struct EntryRow {
    id: i64,
    started_at: String,
    ended_at: Option<String>,
    comment: String,
}

impl EntryRow {
    fn into_entry(self) -> Result<Entry, DbError> {
        let start = parse_timestamp(&self.started_at, self.id)?;
        let end = self
            .ended_at
            .as_deref()
            .map(|ts| parse_timestamp(ts, self.id))
            .transpose()?;
        Ok(Entry {
            id: self.id,
            start,
            end,
            comment: self.comment,
        })
    }
}

fn max_id(conn: &Connection) -> Result<Option<i64>, rusqlite::Error> {
    conn.query_row("SELECT MAX(id) FROM entries", [], |row| row.get(0))
}

fn parse_timestamp(timestamp: &str, entry_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
