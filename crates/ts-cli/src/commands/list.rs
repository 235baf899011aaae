//! List command for showing every entry, newest first.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ts_core::{Clock, EntryStore, Timesheet};

use super::{write_entries_json, write_entries_table};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &Timesheet<S, C>,
    args: &ListArgs,
) -> Result<()> {
    let entries = timesheet.list_all()?;

    if args.json {
        return write_entries_json(writer, &entries);
    }
    if entries.is_empty() {
        writeln!(writer, "No timesheet entries.")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Hint: Run 'ts start <name> --category <category>' to start a timer."
        )?;
        return Ok(());
    }
    write_entries_table(writer, &entries, timesheet.clock().now())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use insta::assert_snapshot;
    use ts_core::{Category, FixedClock, StartTimer};
    use ts_db::Database;

    use crate::commands::test_support::{output, timesheet};

    fn populated() -> Timesheet<Database, FixedClock> {
        let mut ts = timesheet();
        let done = ts
            .start(StartTimer::new("Fix login bug", Category::Ticket).ticket("TCK-100"))
            .unwrap();
        ts.clock().advance(Duration::minutes(45));
        ts.stop(done.id).unwrap();
        ts.clock().advance(Duration::minutes(15));
        ts.start(StartTimer::new("Koordinasi sprint", Category::Koordinasi).line_items(3))
            .unwrap();
        ts.clock().advance(Duration::minutes(20));
        ts
    }

    #[test]
    fn test_list_table_is_newest_first() {
        let ts = populated();
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &ListArgs { json: false }).unwrap();
        assert_snapshot!(output(buffer), @r"
        ID    Name                          Category                Ticket        Started (UTC)      Duration
        2     Koordinasi sprint             Koordinasi & kegiat...  -             2025-03-10 10:00  00:20:00*
        1     Fix login bug                 Ticket                  TCK-100       2025-03-10 09:00   00:45:00

        * still running
        ");
    }

    #[test]
    fn test_list_json_includes_status() {
        let ts = populated();
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &ListArgs { json: true }).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(buffer)).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], 2);
        assert_eq!(rows[0]["status"], "running");
        assert_eq!(rows[0]["end_time"], serde_json::Value::Null);
        assert_eq!(rows[0]["category"], "Koordinasi & kegiatan pendukung lainnya");
        assert_eq!(rows[0]["number_of_line_items"], 3);
        assert_eq!(rows[1]["status"], "completed");
        assert_eq!(rows[1]["duration_seconds"], 2700);
        assert_eq!(rows[1]["ticket_activity_number"], "TCK-100");
    }

    #[test]
    fn test_list_empty_prints_hint() {
        let ts = timesheet();
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &ListArgs { json: false }).unwrap();
        assert_snapshot!(output(buffer), @r"
        No timesheet entries.

        Hint: Run 'ts start <name> --category <category>' to start a timer.
        ");
    }

    #[test]
    fn test_list_empty_json_is_empty_array() {
        let ts = timesheet();
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &ListArgs { json: true }).unwrap();
        assert_eq!(output(buffer).trim(), "[]");
    }
}
