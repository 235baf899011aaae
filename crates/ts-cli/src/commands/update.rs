//! Update command for correcting a completed entry.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ts_core::{Category, Clock, EntryId, EntryStore, EntryUpdate, Timesheet};

use super::describe;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Entry to update.
    pub id: i64,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New category (label or slug).
    #[arg(short = 'C', long)]
    pub category: Option<Category>,

    /// New ticket or activity number.
    #[arg(short, long, conflicts_with = "clear_ticket")]
    pub ticket: Option<String>,

    /// Remove the ticket or activity number.
    #[arg(long)]
    pub clear_ticket: bool,

    /// New number of line items.
    #[arg(short, long, allow_negative_numbers = true)]
    pub line_items: Option<i64>,
}

impl UpdateArgs {
    fn to_update(&self) -> EntryUpdate {
        let mut update = EntryUpdate::new(EntryId::new(self.id));
        if let Some(name) = &self.name {
            update = update.name(name);
        }
        if let Some(category) = self.category {
            update = update.category(category);
        }
        if self.clear_ticket {
            update = update.ticket(None);
        } else if let Some(ticket) = &self.ticket {
            update = update.ticket(Some(ticket.clone()));
        }
        if let Some(count) = self.line_items {
            update = update.line_items(count);
        }
        update
    }
}

pub fn run<W: Write, S: EntryStore, C: Clock>(
    writer: &mut W,
    timesheet: &mut Timesheet<S, C>,
    args: &UpdateArgs,
) -> Result<()> {
    let entry = timesheet.update(args.to_update())?;
    writeln!(writer, "Updated entry {}", describe(&entry))?;
    writeln!(writer, "Line items: {}", entry.number_of_line_items)?;
    Ok(())
}
