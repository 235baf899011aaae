//! Lifecycle engine: start, stop, update and delete timesheet entries.
//!
//! An entry is created running by [`Timesheet::start`], completed exactly once
//! by [`Timesheet::stop`], and afterwards only its descriptive fields may change
//! through [`Timesheet::update`]. [`Timesheet::delete`] removes an entry in
//! either state.
//!
//! # Concurrent timers
//!
//! Starting a timer does not check for one that is already running, so the
//! store may hold several running entries at once. [`Timesheet::active`]
//! resolves that by returning the most recently created one.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::entry::{
    Category, EntryId, EntryStatus, NewEntry, TimesheetEntry, normalize_ticket,
    validate_line_items, validate_name,
};
use crate::error::EntryError;
use crate::query::EntryFilter;
use crate::store::{EntryChanges, EntryStore, SortOrder};

/// Input for [`Timesheet::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTimer {
    pub name: String,
    pub category: Category,
    pub ticket_activity_number: Option<String>,
    pub number_of_line_items: i64,
}

impl StartTimer {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            ticket_activity_number: None,
            number_of_line_items: 0,
        }
    }

    #[must_use]
    pub fn ticket(mut self, ticket: impl Into<String>) -> Self {
        self.ticket_activity_number = Some(ticket.into());
        self
    }

    #[must_use]
    pub const fn line_items(mut self, count: i64) -> Self {
        self.number_of_line_items = count;
        self
    }
}

/// Input for [`Timesheet::update`].
///
/// Every field is independently present or absent. An absent field keeps the
/// stored value; `ticket_activity_number: Some(None)` clears the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpdate {
    pub id: EntryId,
    pub name: Option<String>,
    pub category: Option<Category>,
    pub ticket_activity_number: Option<Option<String>>,
    pub number_of_line_items: Option<i64>,
}

impl EntryUpdate {
    pub const fn new(id: EntryId) -> Self {
        Self {
            id,
            name: None,
            category: None,
            ticket_activity_number: None,
            number_of_line_items: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn ticket(mut self, ticket: Option<String>) -> Self {
        self.ticket_activity_number = Some(ticket);
        self
    }

    #[must_use]
    pub const fn line_items(mut self, count: i64) -> Self {
        self.number_of_line_items = Some(count);
        self
    }

    fn validate(&self) -> Result<EntryChanges, EntryError> {
        Ok(EntryChanges {
            name: self.name.as_deref().map(validate_name).transpose()?,
            category: self.category,
            ticket_activity_number: self.ticket_activity_number.clone().map(normalize_ticket),
            number_of_line_items: self
                .number_of_line_items
                .map(validate_line_items)
                .transpose()?,
        })
    }
}

/// Result of [`Timesheet::delete`]. Deleting a missing entry is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

/// The timesheet engine, owning its store and clock.
#[derive(Debug)]
pub struct Timesheet<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EntryStore> Timesheet<S> {
    /// Creates an engine that reads the wall clock.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: EntryStore, C: Clock> Timesheet<S, C> {
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current time at the precision the store keeps.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Starts a new running entry.
    pub fn start(&mut self, input: StartTimer) -> Result<TimesheetEntry, EntryError> {
        let name = validate_name(&input.name)?;
        let number_of_line_items = validate_line_items(input.number_of_line_items)?;

        let now = self.now();
        let new_entry = NewEntry {
            name,
            start_time: now,
            category: input.category,
            ticket_activity_number: normalize_ticket(input.ticket_activity_number),
            number_of_line_items,
            created_at: now,
        };

        let entry = self
            .store
            .insert_entry(&new_entry)
            .map_err(EntryError::store)?;
        tracing::info!(
            id = %entry.id,
            name = %entry.name,
            category = %entry.category,
            "timer started"
        );
        Ok(entry)
    }

    /// Stops a running entry, recording its end time and whole-second duration.
    pub fn stop(&mut self, id: EntryId) -> Result<TimesheetEntry, EntryError> {
        let now = self.now();
        let running = self
            .store
            .get_entry(id)
            .map_err(EntryError::store)?
            .filter(TimesheetEntry::is_running)
            .ok_or(EntryError::NoRunningTimer { id })?;

        let duration_seconds = stopped_duration(running.start_time, now);
        if duration_seconds == 0 && now < running.start_time {
            tracing::warn!(
                %id,
                start_time = %running.start_time,
                end_time = %now,
                "clock is behind the start time, recording zero duration"
            );
        }

        let entry = self
            .store
            .complete_entry(id, now, duration_seconds)
            .map_err(EntryError::store)?
            .ok_or(EntryError::NoRunningTimer { id })?;
        tracing::info!(%id, duration_seconds, "timer stopped");
        Ok(entry)
    }

    /// Changes descriptive fields of a completed entry.
    pub fn update(&mut self, update: EntryUpdate) -> Result<TimesheetEntry, EntryError> {
        let id = update.id;
        let changes = update.validate()?;

        let existing = self
            .store
            .get_entry(id)
            .map_err(EntryError::store)?
            .ok_or(EntryError::NotFound { id })?;
        if existing.is_running() {
            return Err(EntryError::StillRunning { id });
        }
        if changes.is_empty() {
            tracing::debug!(%id, "update carried no fields");
            return Ok(existing);
        }

        let entry = self
            .store
            .update_entry(id, &changes)
            .map_err(EntryError::store)?
            .ok_or(EntryError::NotFound { id })?;
        tracing::info!(%id, "entry updated");
        Ok(entry)
    }

    /// Deletes an entry in any state, reporting rather than failing when it is missing.
    pub fn delete(&mut self, id: EntryId) -> Result<DeleteOutcome, EntryError> {
        let deleted = self.store.delete_entry(id).map_err(EntryError::store)?;
        if deleted {
            tracing::info!(%id, "entry deleted");
            Ok(DeleteOutcome {
                success: true,
                message: format!("Timesheet entry with ID {id} has been deleted successfully."),
            })
        } else {
            tracing::debug!(%id, "delete found no entry");
            Ok(DeleteOutcome {
                success: false,
                message: format!("Timesheet entry with ID {id} not found."),
            })
        }
    }

    /// The running entry, or the most recently created one if several are running.
    pub fn active(&self) -> Result<Option<TimesheetEntry>, EntryError> {
        let running = self
            .store
            .find_entries(
                &EntryFilter::default().status(EntryStatus::Running),
                SortOrder::Descending,
            )
            .map_err(EntryError::store)?;
        Ok(running.into_iter().next())
    }

    /// Seconds the given entry has been running, by this engine's clock.
    pub fn elapsed_seconds(&self, entry: &TimesheetEntry) -> i64 {
        entry.elapsed_seconds(self.now())
    }
}

/// Whole seconds from `start` to `end`, floored and clamped at zero.
fn stopped_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = end.signed_duration_since(start).num_milliseconds();
    millis.div_euclid(1000).max(0)
}
