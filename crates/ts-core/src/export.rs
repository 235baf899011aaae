//! CSV export of the full timesheet.
//!
//! Rows are ordered oldest first. Timestamps are RFC 3339 in UTC with
//! millisecond precision; a running entry has an empty end time and the
//! duration marker `N/A`. The document has no trailing newline.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::entry::TimesheetEntry;
use crate::error::EntryError;
use crate::lifecycle::Timesheet;
use crate::store::{EntryStore, SortOrder};

/// Column headers, in output order.
pub const HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Start Time",
    "End Time",
    "Category",
    "Ticket/Activity Number",
    "Number of Line Items",
    "Duration",
];

/// Duration cell for an entry that has not been stopped.
pub const NO_DURATION: &str = "N/A";

const FILENAME_PREFIX: &str = "timesheet_export_";
const FILENAME_EXTENSION: &str = "csv";

/// A rendered export and the name to save it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    pub document_text: String,
    pub filename: String,
}

/// Formats whole seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats a timestamp the way it appears in the export.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Quotes a field if it contains a comma, a quote or a line break.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// `timesheet_export_YYYY-MM-DD.csv` for the UTC date of `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!(
        "{FILENAME_PREFIX}{}.{FILENAME_EXTENSION}",
        now.format("%Y-%m-%d")
    )
}

fn entry_row(entry: &TimesheetEntry) -> String {
    let fields = [
        entry.id.to_string(),
        entry.name.clone(),
        format_timestamp(entry.start_time),
        entry.end_time.map(format_timestamp).unwrap_or_default(),
        entry.category.to_string(),
        entry.ticket_activity_number.clone().unwrap_or_default(),
        entry.number_of_line_items.to_string(),
        entry
            .duration_seconds
            .map_or_else(|| NO_DURATION.to_string(), format_duration),
    ];
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders `entries` in the order given, header first.
pub fn render_csv(entries: &[TimesheetEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(HEADERS.join(","));
    lines.extend(entries.iter().map(entry_row));
    lines.join("\n")
}

impl<S: EntryStore, C: Clock> Timesheet<S, C> {
    /// Renders every entry, oldest first, with a filename dated by this engine's clock.
    pub fn export(&self) -> Result<Export, EntryError> {
        let entries = self
            .store()
            .list_entries(SortOrder::Ascending)
            .map_err(EntryError::store)?;
        let filename = export_filename(self.now());
        tracing::info!(rows = entries.len(), %filename, "exported timesheet");
        Ok(Export {
            document_text: render_csv(&entries),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::entry::Category;
    use crate::lifecycle::{EntryUpdate, StartTimer};
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use insta::assert_snapshot;

    fn timesheet() -> Timesheet<MemoryStore, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
        Timesheet::with_clock(MemoryStore::new(), clock)
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let ts = timesheet();
        let export = ts.export().unwrap();
        assert_snapshot!(
            &export.document_text,
            @"ID,Name,Start Time,End Time,Category,Ticket/Activity Number,Number of Line Items,Duration"
        );
        assert_eq!(export.document_text.lines().count(), 1);
        assert_eq!(export.filename, "timesheet_export_2024-01-15.csv");
    }

    #[test]
    fn test_completed_and_running_rows() {
        let mut ts = timesheet();
        let done = ts
            .start(
                StartTimer::new("Test Task", Category::DevelopmentTesting)
                    .ticket("TICKET-123")
                    .line_items(5),
            )
            .unwrap();
        ts.clock().advance(Duration::hours(8));
        ts.stop(done.id).unwrap();
        ts.clock().advance(Duration::minutes(1));
        ts.start(StartTimer::new("Second Task", Category::Koordinasi))
            .unwrap();

        let export = ts.export().unwrap();
        let lines: Vec<&str> = export.document_text.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_snapshot!(
            lines[1],
            @"1,Test Task,2024-01-15T09:00:00.000Z,2024-01-15T17:00:00.000Z,Development & Testing,TICKET-123,5,08:00:00"
        );
        assert_snapshot!(
            lines[2],
            @"2,Second Task,2024-01-15T17:01:00.000Z,,Koordinasi & kegiatan pendukung lainnya,,0,N/A"
        );
    }

    #[test]
    fn test_rows_are_oldest_first() {
        let mut ts = timesheet();
        for name in ["first", "second", "third"] {
            ts.start(StartTimer::new(name, Category::Other)).unwrap();
            ts.clock().advance(Duration::seconds(1));
        }
        let export = ts.export().unwrap();
        let names: Vec<&str> = export
            .document_text
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_comma_in_name_is_quoted() {
        let mut ts = timesheet();
        let entry = ts
            .start(StartTimer::new("Task with, comma", Category::Other))
            .unwrap();
        ts.stop(entry.id).unwrap();
        let export = ts.export().unwrap();
        let row = export.document_text.lines().nth(1).unwrap();
        assert!(row.starts_with("1,\"Task with, comma\","));
    }

    #[test]
    fn test_quotes_and_line_breaks_are_escaped() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field("cr\rhere"), "\"cr\rhere\"");
        assert_eq!(escape_field("Adhoc/project"), "Adhoc/project");
        assert!(matches!(escape_field("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_updated_fields_are_exported() {
        let mut ts = timesheet();
        let entry = ts
            .start(StartTimer::new("Draft", Category::Ticket).ticket("T-1"))
            .unwrap();
        ts.clock().advance(Duration::seconds(59));
        ts.stop(entry.id).unwrap();
        ts.update(
            EntryUpdate::new(entry.id)
                .name("Quote \"this\"")
                .ticket(None),
        )
        .unwrap();

        let export = ts.export().unwrap();
        assert_snapshot!(
            export.document_text.lines().nth(1).unwrap(),
            @r#"1,"Quote ""this""",2024-01-15T09:00:00.000Z,2024-01-15T09:00:59.000Z,Ticket,,0,00:00:59"#
        );
    }

    #[test]
    fn test_duration_format_pads_and_does_not_wrap_hours() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(8 * 3600), "08:00:00");
        assert_eq!(format_duration(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_filename_uses_utc_date_of_clock() {
        let late = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(export_filename(late), "timesheet_export_2025-12-31.csv");

        let ts = timesheet();
        ts.clock().set(late + Duration::seconds(1));
        assert_eq!(ts.export().unwrap().filename, "timesheet_export_2026-01-01.csv");
    }

    #[test]
    fn test_timestamps_keep_millisecond_precision() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap() + Duration::milliseconds(42);
        assert_eq!(format_timestamp(at), "2024-01-15T09:00:00.042Z");
    }
}
