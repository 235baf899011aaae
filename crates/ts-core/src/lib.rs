//! Core domain logic for the timesheet.
//!
//! This crate contains:
//! - The timesheet entry model and its fixed category set
//! - The lifecycle engine: start, stop, update and delete entries
//! - Search over all entries by text, category and status
//! - CSV export of the whole timesheet
//!
//! Persistence sits behind the [`EntryStore`] trait; [`MemoryStore`] is an
//! in-process implementation.

pub mod clock;
pub mod entry;
mod error;
pub mod export;
mod lifecycle;
mod query;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{Category, EntryId, EntryStatus, NewEntry, TimesheetEntry, ValidationError};
pub use error::{EntryError, ErrorKind, StoreFault};
pub use export::{Export, format_duration};
pub use lifecycle::{DeleteOutcome, EntryUpdate, StartTimer, Timesheet};
pub use query::EntryFilter;
pub use store::{EntryChanges, EntryStore, MemoryStore, SortOrder};
