//! Stop command for closing a running timer.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;

use ts_core::{Clock, EntryId, EntryStore, Timesheet, format_duration};

use super::describe;

#[derive(Debug, Args)]
pub struct StopArgs {
    /// Entry to stop. Defaults to the running timer.
    pub id: Option<i64>,
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &mut Timesheet<S, C>,
    args: &StopArgs,
) -> Result<()> {
    let id = match args.id {
        Some(id) => EntryId::new(id),
        None => match timesheet.active()? {
            Some(entry) => entry.id,
            None => bail!("No timer is running"),
        },
    };

    let entry = timesheet.stop(id)?;
    let duration = entry.duration_seconds.unwrap_or_default();
    writeln!(
        writer,
        "Stopped timer {} after {}",
        describe(&entry),
        format_duration(duration)
    )?;
    Ok(())
}
