//! Active command for showing the running timer.

use std::io::Write;

use anyhow::Result;
use chrono::SecondsFormat;

use ts_core::{Clock, EntryStore, Timesheet, format_duration};

use super::describe;

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &Timesheet<S, C>,
) -> Result<()> {
    let Some(entry) = timesheet.active()? else {
        writeln!(writer, "No timer is running.")?;
        return Ok(());
    };

    writeln!(writer, "Running {}", describe(&entry))?;
    writeln!(
        writer,
        "Started: {}",
        entry.start_time.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(
        writer,
        "Elapsed: {}",
        format_duration(timesheet.elapsed_seconds(&entry))
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use insta::assert_snapshot;
    use ts_core::{Category, StartTimer};

    use crate::commands::test_support::{output, timesheet};

    #[test]
    fn test_active_shows_elapsed_time() {
        let mut ts = timesheet();
        ts.start(StartTimer::new("Deploy", Category::AdhocProject).ticket("OPS-3"))
            .unwrap();
        ts.clock().advance(Duration::hours(2) + Duration::seconds(5));

        let mut buffer = Vec::new();
        run(&mut buffer, &ts).unwrap();
        assert_snapshot!(output(buffer), @r"
        Running 1: Deploy [Adhoc/project] (OPS-3)
        Started: 2025-03-10T09:00:00Z
        Elapsed: 02:00:05
        ");
    }

    #[test]
    fn test_active_without_timer() {
        let ts = timesheet();
        let mut buffer = Vec::new();
        run(&mut buffer, &ts).unwrap();
        assert_snapshot!(output(buffer), @"No timer is running.");
    }
}
