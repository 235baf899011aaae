//! Start command for opening a new timer.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ts_core::{Category, Clock, EntryStore, StartTimer, Timesheet};

use super::describe;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// What is being worked on.
    pub name: String,

    /// Category label or slug (see `ts categories`).
    #[arg(short = 'C', long)]
    pub category: Category,

    /// Ticket or activity number.
    #[arg(short, long)]
    pub ticket: Option<String>,

    /// Number of line items covered by this entry.
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub line_items: i64,
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &mut Timesheet<S, C>,
    args: &StartArgs,
) -> Result<()> {
    let mut input = StartTimer::new(&args.name, args.category).line_items(args.line_items);
    if let Some(ticket) = &args.ticket {
        input = input.ticket(ticket);
    }

    let entry = timesheet.start(input)?;
    writeln!(writer, "Started timer {}", describe(&entry))?;
    Ok(())
}
