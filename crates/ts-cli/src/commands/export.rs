//! Export command for writing the timesheet as CSV.
//!
//! The file is named after the current UTC date and written into the
//! directory given by `--output`, the configured `export_dir`, or the
//! current directory, in that order of preference.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ts_core::{Clock, EntryStore, Timesheet};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to write the CSV file into.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the CSV to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &Timesheet<S, C>,
    args: &ExportArgs,
    export_dir: Option<&Path>,
) -> Result<()> {
    let export = timesheet.export()?;

    if args.stdout {
        writeln!(writer, "{}", export.document_text)?;
        return Ok(());
    }

    let dir = args
        .output
        .as_deref()
        .or(export_dir)
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(&export.filename);
    fs::write(&path, &export.document_text)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let rows = export.document_text.lines().count().saturating_sub(1);
    tracing::debug!(path = %path.display(), rows, "wrote export file");
    let noun = if rows == 1 { "entry" } else { "entries" };
    writeln!(writer, "Exported {rows} {noun} to {}", path.display())?;
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
    fn test_export_writes_dated_file() {
        let mut ts = timesheet();
        let entry = ts
            .start(StartTimer::new("Report, draft", Category::Other).line_items(1))
            .unwrap();
        ts.clock().advance(Duration::minutes(90));
        ts.stop(entry.id).unwrap();

        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("exports");
        let args = ExportArgs {
            output: Some(dir.clone()),
            stdout: false,
        };
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &args, None).unwrap();

        let path = dir.join("timesheet_export_2025-03-10.csv");
        let output = output(buffer).replace(&temp.path().display().to_string(), "[TEMP]");
        assert_snapshot!(output, @"Exported 1 entry to [TEMP]/exports/timesheet_export_2025-03-10.csv");

        let contents = fs::read_to_string(path).unwrap();
        assert_snapshot!(&contents, @r#"
        ID,Name,Start Time,End Time,Category,Ticket/Activity Number,Number of Line Items,Duration
        1,"Report, draft",2025-03-10T09:00:00.000Z,2025-03-10T10:30:00.000Z,Other,,1,01:30:00
        "#);
        assert!(!contents.ends_with('\n'));
    }

    #[test]
    fn test_export_falls_back_to_configured_dir() {
        let ts = timesheet();
        let temp = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            output: None,
            stdout: false,
        };
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &args, Some(temp.path())).unwrap();

        let output = output(buffer).replace(&temp.path().display().to_string(), "[TEMP]");
        assert_snapshot!(output, @"Exported 0 entries to [TEMP]/timesheet_export_2025-03-10.csv");

        let contents =
            fs::read_to_string(temp.path().join("timesheet_export_2025-03-10.csv")).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_export_counts_several_entries() {
        let mut ts = timesheet();
        for name in ["First", "Second"] {
            let entry = ts.start(StartTimer::new(name, Category::Other)).unwrap();
            ts.clock().advance(Duration::minutes(5));
            ts.stop(entry.id).unwrap();
        }

        let temp = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            output: Some(temp.path().to_path_buf()),
            stdout: false,
        };
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &args, None).unwrap();

        let output = output(buffer).replace(&temp.path().display().to_string(), "[TEMP]");
        assert_snapshot!(output, @"Exported 2 entries to [TEMP]/timesheet_export_2025-03-10.csv");
    }

    #[test]
    fn test_export_to_stdout_marks_running_entries() {
        let mut ts = timesheet();
        ts.start(StartTimer::new("Ongoing", Category::Meeting))
            .unwrap();
        let args = ExportArgs {
            output: None,
            stdout: true,
        };
        let mut buffer = Vec::new();
        run(&mut buffer, &ts, &args, None).unwrap();
        assert_snapshot!(output(buffer), @r"
        ID,Name,Start Time,End Time,Category,Ticket/Activity Number,Number of Line Items,Duration
        1,Ongoing,2025-03-10T09:00:00.000Z,,Meeting,,0,N/A
        ");
    }
}
