//! Storage layer for the timesheet.
//!
//! Provides persistence for timesheet entries using `rusqlite`, implementing
//! [`ts_core::EntryStore`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! This means a `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond precision
//! and a `Z` suffix (e.g., `2024-01-15T10:30:00.000Z`). Every value has the same
//! width, so lexicographic ordering matches chronological ordering.
//!
//! ## Running vs. completed
//!
//! `end_time` and `duration_seconds` are NULL together while an entry is
//! running. A table CHECK constraint rejects rows where only one is set.
//!
//! ## Search
//!
//! Category and status predicates are evaluated in SQL. The case-insensitive
//! text predicate is applied in process with [`EntryFilter::matches_term`],
//! since SQLite's `LIKE` only folds ASCII and treats `%`/`_` in the term as
//! wildcards.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Params, params, params_from_iter};
use thiserror::Error;

use ts_core::{
    Category, EntryChanges, EntryFilter, EntryId, EntryStatus, EntryStore, NewEntry, SortOrder,
    TimesheetEntry,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row does not describe a valid entry.
    #[error("invalid data for entry {entry_id}: {message}")]
    InvalidRow { entry_id: i64, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Entry totals for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCounts {
    pub total: i64,
    pub running: i64,
}

const ENTRY_COLUMNS: &str = "id, name, start_time, end_time, category, ticket_activity_number, \
                             number_of_line_items, duration_seconds, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
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
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- start_time, end_time, created_at: RFC 3339 with milliseconds
            -- end_time, duration_seconds: NULL while the timer is running
            CREATE TABLE IF NOT EXISTS timesheet_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                category TEXT NOT NULL,
                ticket_activity_number TEXT,
                number_of_line_items INTEGER NOT NULL CHECK (number_of_line_items >= 0),
                duration_seconds INTEGER CHECK (duration_seconds >= 0),
                created_at TEXT NOT NULL,
                CHECK ((end_time IS NULL) = (duration_seconds IS NULL))
            );

            CREATE INDEX IF NOT EXISTS idx_entries_created ON timesheet_entries(created_at);
            CREATE INDEX IF NOT EXISTS idx_entries_end_time ON timesheet_entries(end_time);
            CREATE INDEX IF NOT EXISTS idx_entries_category ON timesheet_entries(category);
            ",
        )?;
        Ok(())
    }

    /// Counts all entries and the running ones.
    pub fn count_entries(&self) -> Result<EntryCounts, DbError> {
        let counts = self.conn.query_row(
            "
            SELECT COUNT(*), COALESCE(SUM(end_time IS NULL), 0)
            FROM timesheet_entries
            ",
            [],
            |row| {
                Ok(EntryCounts {
                    total: row.get(0)?,
                    running: row.get(1)?,
                })
            },
        )?;
        Ok(counts)
    }
}

impl EntryStore for Database {
    type Error = DbError;

    fn insert_entry(&mut self, entry: &NewEntry) -> Result<TimesheetEntry, DbError> {
        self.conn.execute(
            "
            INSERT INTO timesheet_entries
            (name, start_time, end_time, category, ticket_activity_number,
             number_of_line_items, duration_seconds, created_at)
            VALUES (?, ?, NULL, ?, ?, ?, NULL, ?)
            ",
            params![
                entry.name,
                format_timestamp(entry.start_time),
                entry.category.as_str(),
                entry.ticket_activity_number,
                entry.number_of_line_items,
                format_timestamp(entry.created_at),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "inserted timesheet entry");

        Ok(TimesheetEntry {
            id: EntryId::new(id),
            name: entry.name.clone(),
            start_time: entry.start_time,
            end_time: None,
            category: entry.category,
            ticket_activity_number: entry.ticket_activity_number.clone(),
            number_of_line_items: entry.number_of_line_items,
            duration_seconds: None,
            created_at: entry.created_at,
        })
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<TimesheetEntry>, DbError> {
        fetch_entry(&self.conn, id)
    }

    fn list_entries(&self, order: SortOrder) -> Result<Vec<TimesheetEntry>, DbError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM timesheet_entries {}",
            order_clause(order)
        );
        query_entries(&self.conn, &sql, [])
    }

    fn find_entries(
        &self,
        filter: &EntryFilter,
        order: SortOrder,
    ) -> Result<Vec<TimesheetEntry>, DbError> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();
        if let Some(category) = filter.category {
            clauses.push("category = ?");
            values.push(Value::Text(category.as_str().to_string()));
        }
        match filter.status {
            Some(EntryStatus::Running) => clauses.push("end_time IS NULL"),
            Some(EntryStatus::Completed) => clauses.push("end_time IS NOT NULL"),
            None => {}
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM timesheet_entries {where_clause} {}",
            order_clause(order)
        );
        let entries = query_entries(&self.conn, &sql, params_from_iter(values.iter()))?;
        Ok(entries
            .into_iter()
            .filter(|entry| filter.matches_term(entry))
            .collect())
    }

    fn complete_entry(
        &mut self,
        id: EntryId,
        end_time: DateTime<Utc>,
        duration_seconds: i64,
    ) -> Result<Option<TimesheetEntry>, DbError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "
            UPDATE timesheet_entries
            SET end_time = ?, duration_seconds = ?
            WHERE id = ? AND end_time IS NULL
            ",
            params![format_timestamp(end_time), duration_seconds, id.get()],
        )?;
        let entry = if changed == 0 {
            None
        } else {
            fetch_entry(&tx, id)?
        };
        tx.commit()?;
        Ok(entry)
    }

    fn update_entry(
        &mut self,
        id: EntryId,
        changes: &EntryChanges,
    ) -> Result<Option<TimesheetEntry>, DbError> {
        let mut assignments = Vec::new();
        let mut values = Vec::new();
        if let Some(name) = &changes.name {
            assignments.push("name = ?");
            values.push(Value::Text(name.clone()));
        }
        if let Some(category) = changes.category {
            assignments.push("category = ?");
            values.push(Value::Text(category.as_str().to_string()));
        }
        if let Some(ticket) = &changes.ticket_activity_number {
            assignments.push("ticket_activity_number = ?");
            values.push(ticket.clone().map_or(Value::Null, Value::Text));
        }
        if let Some(count) = changes.number_of_line_items {
            assignments.push("number_of_line_items = ?");
            values.push(Value::Integer(i64::from(count)));
        }

        if assignments.is_empty() {
            return Ok(fetch_entry(&self.conn, id)?.filter(|entry| !entry.is_running()));
        }

        values.push(Value::Integer(id.get()));
        let sql = format!(
            "UPDATE timesheet_entries SET {} WHERE id = ? AND end_time IS NOT NULL",
            assignments.join(", ")
        );

        let tx = self.conn.transaction()?;
        let changed = tx.execute(&sql, params_from_iter(values.iter()))?;
        let entry = if changed == 0 {
            None
        } else {
            fetch_entry(&tx, id)?
        };
        tx.commit()?;
        Ok(entry)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM timesheet_entries WHERE id = ?",
            params![id.get()],
        )?;
        Ok(deleted > 0)
    }
}

/// Raw column values, converted to a [`TimesheetEntry`] outside the row callback.
#[derive(Debug)]
struct EntryRow {
    id: i64,
    name: String,
    start_time: String,
    end_time: Option<String>,
    category: String,
    ticket_activity_number: Option<String>,
    number_of_line_items: i64,
    duration_seconds: Option<i64>,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            category: row.get(4)?,
            ticket_activity_number: row.get(5)?,
            number_of_line_items: row.get(6)?,
            duration_seconds: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_entry(self) -> Result<TimesheetEntry, DbError> {
        let id = self.id;
        let category: Category = self.category.parse().map_err(|err| DbError::InvalidRow {
            entry_id: id,
            message: format!("{err}"),
        })?;
        let number_of_line_items =
            u32::try_from(self.number_of_line_items).map_err(|_| DbError::InvalidRow {
                entry_id: id,
                message: format!("invalid line item count {}", self.number_of_line_items),
            })?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|ts| parse_timestamp(ts, id))
            .transpose()?;

        Ok(TimesheetEntry {
            id: EntryId::new(id),
            name: self.name,
            start_time: parse_timestamp(&self.start_time, id)?,
            end_time,
            category,
            ticket_activity_number: self.ticket_activity_number,
            number_of_line_items,
            duration_seconds: self.duration_seconds,
            created_at: parse_timestamp(&self.created_at, id)?,
        })
    }
}

fn fetch_entry(conn: &Connection, id: EntryId) -> Result<Option<TimesheetEntry>, DbError> {
    let row = conn
        .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM timesheet_entries WHERE id = ?"),
            [id.get()],
            EntryRow::from_row,
        )
        .optional()?;
    row.map(EntryRow::into_entry).transpose()
}

fn query_entries<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<TimesheetEntry>, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, EntryRow::from_row)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.into_entry()?);
    }
    Ok(entries)
}

const fn order_clause(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => "ORDER BY created_at ASC, id ASC",
        SortOrder::Descending => "ORDER BY created_at DESC, id DESC",
    }
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
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
