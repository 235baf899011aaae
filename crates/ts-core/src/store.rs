//! Persistence port for timesheet entries and an in-memory implementation.

use std::cmp::Ordering;
use std::convert::Infallible;

use chrono::{DateTime, Utc};

use crate::entry::{Category, EntryId, NewEntry, TimesheetEntry};
use crate::query::EntryFilter;

/// Direction of the canonical `created_at` ordering.
///
/// Entries created in the same instant are ordered by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A validated partial update to the descriptive fields of a completed entry.
///
/// `None` leaves the stored value alone. For the ticket number,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChanges {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub ticket_activity_number: Option<Option<String>>,
    pub number_of_line_items: Option<u32>,
}

impl EntryChanges {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.ticket_activity_number.is_none()
            && self.number_of_line_items.is_none()
    }

    /// Applies the present fields to `entry`.
    pub fn apply_to(&self, entry: &mut TimesheetEntry) {
        if let Some(name) = &self.name {
            entry.name.clone_from(name);
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(ticket) = &self.ticket_activity_number {
            entry.ticket_activity_number.clone_from(ticket);
        }
        if let Some(count) = self.number_of_line_items {
            entry.number_of_line_items = count;
        }
    }
}

/// Durable storage for timesheet entries.
///
/// Implementations hold no lifecycle rules beyond the guarded writes
/// documented on [`complete_entry`](Self::complete_entry) and
/// [`update_entry`](Self::update_entry).
pub trait EntryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists a new entry and returns it with its assigned id.
    fn insert_entry(&mut self, entry: &NewEntry) -> Result<TimesheetEntry, Self::Error>;

    fn get_entry(&self, id: EntryId) -> Result<Option<TimesheetEntry>, Self::Error>;

    /// All entries ordered by `created_at`.
    fn list_entries(&self, order: SortOrder) -> Result<Vec<TimesheetEntry>, Self::Error>;

    /// Entries matching `filter`, ordered by `created_at`.
    fn find_entries(
        &self,
        filter: &EntryFilter,
        order: SortOrder,
    ) -> Result<Vec<TimesheetEntry>, Self::Error>;

    /// Sets `end_time` and `duration_seconds` on a running entry.
    ///
    /// Returns `None` when there is no running entry with this id.
    fn complete_entry(
        &mut self,
        id: EntryId,
        end_time: DateTime<Utc>,
        duration_seconds: i64,
    ) -> Result<Option<TimesheetEntry>, Self::Error>;

    /// Applies `changes` to a completed entry.
    ///
    /// Returns `None` when there is no completed entry with this id.
    fn update_entry(
        &mut self,
        id: EntryId,
        changes: &EntryChanges,
    ) -> Result<Option<TimesheetEntry>, Self::Error>;

    /// Removes an entry in any state. Returns whether a row was deleted.
    fn delete_entry(&mut self, id: EntryId) -> Result<bool, Self::Error>;
}

/// Compares two entries by creation order, oldest first.
pub fn creation_order(a: &TimesheetEntry, b: &TimesheetEntry) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}

/// Sorts `entries` into creation order in the given direction.
pub fn sort_entries(entries: &mut [TimesheetEntry], order: SortOrder) {
    match order {
        SortOrder::Ascending => entries.sort_by(creation_order),
        SortOrder::Descending => entries.sort_by(|a, b| creation_order(b, a)),
    }
}

/// A `Vec`-backed store that never fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Vec<TimesheetEntry>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl EntryStore for MemoryStore {
    type Error = Infallible;

    fn insert_entry(&mut self, entry: &NewEntry) -> Result<TimesheetEntry, Self::Error> {
        self.last_id += 1;
        let stored = TimesheetEntry {
            id: EntryId::new(self.last_id),
            name: entry.name.clone(),
            start_time: entry.start_time,
            end_time: None,
            category: entry.category,
            ticket_activity_number: entry.ticket_activity_number.clone(),
            number_of_line_items: entry.number_of_line_items,
            duration_seconds: None,
            created_at: entry.created_at,
        };
        self.entries.push(stored.clone());
        Ok(stored)
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<TimesheetEntry>, Self::Error> {
        Ok(self.entries.iter().find(|entry| entry.id == id).cloned())
    }

    fn list_entries(&self, order: SortOrder) -> Result<Vec<TimesheetEntry>, Self::Error> {
        let mut entries = self.entries.clone();
        sort_entries(&mut entries, order);
        Ok(entries)
    }

    fn find_entries(
        &self,
        filter: &EntryFilter,
        order: SortOrder,
    ) -> Result<Vec<TimesheetEntry>, Self::Error> {
        let mut matching: Vec<TimesheetEntry> = self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        sort_entries(&mut matching, order);
        Ok(matching)
    }

    fn complete_entry(
        &mut self,
        id: EntryId,
        end_time: DateTime<Utc>,
        duration_seconds: i64,
    ) -> Result<Option<TimesheetEntry>, Self::Error> {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id && entry.is_running())
        else {
            return Ok(None);
        };
        entry.end_time = Some(end_time);
        entry.duration_seconds = Some(duration_seconds);
        Ok(Some(entry.clone()))
    }

    fn update_entry(
        &mut self,
        id: EntryId,
        changes: &EntryChanges,
    ) -> Result<Option<TimesheetEntry>, Self::Error> {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id && !entry.is_running())
        else {
            return Ok(None);
        };
        changes.apply_to(entry);
        Ok(Some(entry.clone()))
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, Self::Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.entries.remove(index);
        Ok(true)
    }
}
