//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::delete::DeleteArgs;
use crate::commands::export::ExportArgs;
use crate::commands::list::ListArgs;
use crate::commands::search::SearchArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::update::UpdateArgs;

/// Timesheet timer.
///
/// Start and stop timers for units of work, correct finished entries,
/// search them and export the whole timesheet as CSV.
#[derive(Debug, Parser)]
#[command(name = "ts", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new timer.
    Start(StartArgs),

    /// Stop a running timer.
    Stop(StopArgs),

    /// Show the running timer.
    Active,

    /// List every entry, newest first.
    List(ListArgs),

    /// Search entries by text, category and status, oldest first.
    Search(SearchArgs),

    /// Correct a completed entry.
    Update(UpdateArgs),

    /// Delete an entry.
    Delete(DeleteArgs),

    /// Export the timesheet as CSV.
    Export(ExportArgs),

    /// Show database and timer status.
    Status,

    /// List the categories an entry can have.
    Categories,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;
    use ts_core::Category;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_start_accepts_label_or_slug() {
        let cli = Cli::try_parse_from([
            "ts",
            "start",
            "Fix login bug",
            "--category",
            "development-testing",
            "--ticket",
            "TCK-1",
        ])
        .unwrap();
        let Some(Commands::Start(args)) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.category, Category::DevelopmentTesting);
        assert_eq!(args.ticket.as_deref(), Some("TCK-1"));

        let cli = Cli::try_parse_from(["ts", "start", "Sync", "-C", "Meeting"]).unwrap();
        let Some(Commands::Start(args)) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.category, Category::Meeting);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Cli::try_parse_from(["ts", "start", "x", "--category", "lunch"]).unwrap_err();
        assert!(err.to_string().contains("unknown category: lunch"));
    }

    #[test]
    fn test_update_ticket_and_clear_ticket_conflict() {
        let result = Cli::try_parse_from(["ts", "update", "3", "--ticket", "T", "--clear-ticket"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_line_items_reach_validation() {
        let cli = Cli::try_parse_from(["ts", "update", "3", "--line-items", "-2"]).unwrap();
        let Some(Commands::Update(args)) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.line_items, Some(-2));
    }

    #[test]
    fn test_search_status_flags_conflict() {
        let result = Cli::try_parse_from(["ts", "search", "--running", "--completed"]);
        assert!(result.is_err());
    }
}
