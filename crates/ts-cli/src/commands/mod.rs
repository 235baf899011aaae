//! CLI subcommand implementations.
//!
//! Every command takes the output writer and the engine, so tests can run
//! them against an in-memory database and a fixed clock.

pub mod active;
pub mod categories;
pub mod delete;
pub mod export;
pub mod list;
pub mod search;
pub mod start;
pub mod status;
pub mod stop;
pub mod update;

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_core::{EntryStatus, TimesheetEntry, format_duration};

const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 22;

/// An entry with its derived status, as printed by `--json`.
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    entry: &'a TimesheetEntry,
    status: EntryStatus,
}

/// Writes `entries` as a pretty-printed JSON array.
pub(crate) fn write_entries_json<W: Write>(
    writer: &mut W,
    entries: &[TimesheetEntry],
) -> Result<()> {
    let rows: Vec<JsonEntry<'_>> = entries
        .iter()
        .map(|entry| JsonEntry {
            entry,
            status: entry.status(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &rows)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `entries` as an aligned table. Running entries show their elapsed time.
pub(crate) fn write_entries_table<W: Write>(
    writer: &mut W,
    entries: &[TimesheetEntry],
    now: DateTime<Utc>,
) -> Result<()> {
    writeln!(
        writer,
        "{:<4}  {:<NAME_WIDTH$}  {:<CATEGORY_WIDTH$}  {:<12}  {:<16}  {:>9}",
        "ID", "Name", "Category", "Ticket", "Started (UTC)", "Duration"
    )?;
    for entry in entries {
        let duration = entry.duration_seconds.map_or_else(
            || format!("{}*", format_duration(entry.elapsed_seconds(now))),
            format_duration,
        );
        writeln!(
            writer,
            "{:<4}  {:<NAME_WIDTH$}  {:<CATEGORY_WIDTH$}  {:<12}  {:<16}  {:>9}",
            entry.id.to_string(),
            truncate(&entry.name, NAME_WIDTH),
            truncate(entry.category.as_str(), CATEGORY_WIDTH),
            truncate(entry.ticket_activity_number.as_deref().unwrap_or("-"), 12),
            entry.start_time.format("%Y-%m-%d %H:%M").to_string(),
            duration,
        )?;
    }
    if entries.iter().any(TimesheetEntry::is_running) {
        writeln!(writer)?;
        writeln!(writer, "* still running")?;
    }
    Ok(())
}

/// One-line description used by the mutating commands.
pub(crate) fn describe(entry: &TimesheetEntry) -> String {
    let mut line = format!("{}: {} [{}]", entry.id, entry.name, entry.category);
    if let Some(ticket) = &entry.ticket_activity_number {
        line.push_str(&format!(" ({ticket})"));
    }
    line
}

/// Truncates by characters, not bytes, so multi-byte names cannot split.
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        format!("{}...", value.chars().take(width - 3).collect::<String>())
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use ts_core::{FixedClock, Timesheet};
    use ts_db::Database;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    pub fn timesheet() -> Timesheet<Database, FixedClock> {
        Timesheet::with_clock(Database::open_in_memory().unwrap(), FixedClock::new(t0()))
    }

    pub fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Überprüfung der Daten", 10), "Überprü...");
    }
}
