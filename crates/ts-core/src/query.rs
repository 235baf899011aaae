//! Query engine: listing and filtered search over all entries.

use crate::clock::Clock;
use crate::entry::{Category, EntryStatus, TimesheetEntry};
use crate::error::EntryError;
use crate::lifecycle::Timesheet;
use crate::store::{EntryStore, SortOrder};

/// Predicates for [`Timesheet::search`]. Present predicates are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Case-insensitive substring of the name or the ticket/activity number.
    /// An empty term matches everything.
    pub search_term: Option<String>,
    pub category: Option<Category>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    #[must_use]
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The search term, if it is non-empty.
    pub fn term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }

    pub fn matches(&self, entry: &TimesheetEntry) -> bool {
        self.category.is_none_or(|category| entry.category == category)
            && self.status.is_none_or(|status| entry.status() == status)
            && self.matches_term(entry)
    }

    /// Applies only the text predicate.
    pub fn matches_term(&self, entry: &TimesheetEntry) -> bool {
        let Some(term) = self.term() else {
            return true;
        };
        let needle = term.to_lowercase();
        entry.name.to_lowercase().contains(&needle)
            || entry
                .ticket_activity_number
                .as_deref()
                .is_some_and(|ticket| ticket.to_lowercase().contains(&needle))
    }
}

impl<S: EntryStore, C: Clock> Timesheet<S, C> {
    /// Every entry, newest first.
    pub fn list_all(&self) -> Result<Vec<TimesheetEntry>, EntryError> {
        let entries = self
            .store()
            .list_entries(SortOrder::Descending)
            .map_err(EntryError::store)?;
        tracing::debug!(count = entries.len(), "listed entries");
        Ok(entries)
    }

    /// Entries matching `filter`, oldest first.
    pub fn search(&self, filter: &EntryFilter) -> Result<Vec<TimesheetEntry>, EntryError> {
        let entries = self
            .store()
            .find_entries(filter, SortOrder::Ascending)
            .map_err(EntryError::store)?;
        tracing::debug!(?filter, count = entries.len(), "searched entries");
        Ok(entries)
    }
}
