//! Delete command. A missing entry is reported, not treated as a failure.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ts_core::{Clock, EntryId, EntryStore, Timesheet};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Entry to delete.
    pub id: i64,
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &mut Timesheet<S, C>,
    args: &DeleteArgs,
) -> Result<()> {
    let outcome = timesheet.delete(EntryId::new(args.id))?;
    writeln!(writer, "{}", outcome.message)?;
    Ok(())
}
