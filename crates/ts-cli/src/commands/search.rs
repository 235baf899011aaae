//! Search command for filtering entries, oldest first.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ts_core::{Category, Clock, EntryFilter, EntryStatus, EntryStore, Timesheet};

use super::{write_entries_json, write_entries_table};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive text matched against names and ticket numbers.
    pub term: Option<String>,

    /// Only entries in this category (label or slug).
    #[arg(short = 'C', long)]
    pub category: Option<Category>,

    /// Only running entries.
    #[arg(long, conflicts_with = "completed")]
    pub running: bool,

    /// Only completed entries.
    #[arg(long)]
    pub completed: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn filter(&self) -> EntryFilter {
        let mut filter = EntryFilter::default();
        if let Some(term) = &self.term {
            filter = filter.search_term(term);
        }
        if let Some(category) = self.category {
            filter = filter.category(category);
        }
        if self.running {
            filter = filter.status(EntryStatus::Running);
        } else if self.completed {
            filter = filter.status(EntryStatus::Completed);
        }
        filter
    }
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &Timesheet<S, C>,
    args: &SearchArgs,
) -> Result<()> {
    let entries = timesheet.search(&args.filter())?;

    if args.json {
        return write_entries_json(writer, &entries);
    }
    if entries.is_empty() {
        writeln!(writer, "No matching entries.")?;
        return Ok(());
    }
    write_entries_table(writer, &entries, timesheet.clock().now())
}
