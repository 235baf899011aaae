//! Timesheet CLI library.
//!
//! This crate provides the `ts` command-line interface over the timesheet engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
