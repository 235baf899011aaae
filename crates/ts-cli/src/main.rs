use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ts_cli::commands::{
    active, categories, delete, export, list, search, start, status, stop, update,
};
use ts_cli::{Cli, Commands, Config};
use ts_core::Timesheet;
use ts_db::Database;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((db, config))
}

/// Opens the database and wraps it in a wall-clock timesheet engine.
fn open_timesheet(config_path: Option<&Path>) -> Result<(Timesheet<Database>, Config)> {
    let (db, config) = open_database(config_path)?;
    Ok((Timesheet::new(db), config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let config_path = cli.config.as_deref();

    match command {
        Commands::Start(args) => {
            let (mut timesheet, _config) = open_timesheet(config_path)?;
            start::run(&mut out, &mut timesheet, args)?;
        }
        Commands::Stop(args) => {
            let (mut timesheet, _config) = open_timesheet(config_path)?;
            stop::run(&mut out, &mut timesheet, args)?;
        }
        Commands::Active => {
            let (timesheet, _config) = open_timesheet(config_path)?;
            active::run(&mut out, &timesheet)?;
        }
        Commands::List(args) => {
            let (timesheet, _config) = open_timesheet(config_path)?;
            list::run(&mut out, &timesheet, args)?;
        }
        Commands::Search(args) => {
            let (timesheet, _config) = open_timesheet(config_path)?;
            search::run(&mut out, &timesheet, args)?;
        }
        Commands::Update(args) => {
            let (mut timesheet, _config) = open_timesheet(config_path)?;
            update::run(&mut out, &mut timesheet, args)?;
        }
        Commands::Delete(args) => {
            let (mut timesheet, _config) = open_timesheet(config_path)?;
            delete::run(&mut out, &mut timesheet, args)?;
        }
        Commands::Export(args) => {
            let (timesheet, config) = open_timesheet(config_path)?;
            export::run(&mut out, &timesheet, args, config.export_dir.as_deref())?;
        }
        Commands::Status => {
            let (timesheet, config) = open_timesheet(config_path)?;
            status::run(&mut out, &timesheet, &config.database_path)?;
        }
        Commands::Categories => {
            // Categories are fixed, so no database is opened.
            categories::run(&mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
