//! Status command for checking the database and the running timer.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use ts_core::{Clock, Timesheet, format_duration};
use ts_db::Database;

use super::describe;

pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    timesheet: &Timesheet<Database, C>,
    database_path: &Path,
) -> Result<()> {
    let counts = timesheet.store().count_entries()?;

    writeln!(writer, "Timesheet status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(
        writer,
        "Entries: {} ({} running)",
        counts.total, counts.running
    )?;

    match timesheet.active()? {
        Some(entry) => writeln!(
            writer,
            "Active: {} for {}",
            describe(&entry),
            format_duration(timesheet.elapsed_seconds(&entry))
        )?,
        None => writeln!(writer, "Active: none")?,
    }

    Ok(())
}
