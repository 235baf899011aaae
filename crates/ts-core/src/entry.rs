//! Timesheet entry data model with validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for caller-supplied entry fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The category label is not one of the fixed set.
    #[error("unknown category: {value}")]
    UnknownCategory { value: String },

    /// The line item count was negative or too large.
    #[error("number of line items must be a non-negative integer, got {value}")]
    InvalidLineItems { value: i64 },
}

/// Identifier assigned by the store when an entry is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The fixed set of work categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ticket,
    Koordinasi,
    Meeting,
    AdhocProject,
    DevelopmentTesting,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Ticket,
        Self::Koordinasi,
        Self::Meeting,
        Self::AdhocProject,
        Self::DevelopmentTesting,
        Self::Other,
    ];

    /// The exact label, used for storage, export and serialization.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticket => "Ticket",
            Self::Koordinasi => "Koordinasi & kegiatan pendukung lainnya",
            Self::Meeting => "Meeting",
            Self::AdhocProject => "Adhoc/project",
            Self::DevelopmentTesting => "Development & Testing",
            Self::Other => "Other",
        }
    }

    /// Short shell-friendly alias accepted by [`FromStr`].
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::Koordinasi => "koordinasi",
            Self::Meeting => "meeting",
            Self::AdhocProject => "adhoc-project",
            Self::DevelopmentTesting => "development-testing",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s || category.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether an entry's timer is still going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Running,
    Completed,
}

/// A single timed unit of work.
///
/// `end_time` and `duration_seconds` are either both absent (running) or
/// both present (completed). They are written together, once, when the
/// timer is stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub id: EntryId,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: Category,
    pub ticket_activity_number: Option<String>,
    pub number_of_line_items: u32,
    pub duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TimesheetEntry {
    pub const fn status(&self) -> EntryStatus {
        if self.end_time.is_none() {
            EntryStatus::Running
        } else {
            EntryStatus::Completed
        }
    }

    pub const fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Whole seconds between the start and `now`, never negative.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.start_time)
            .num_seconds()
            .max(0)
    }
}

/// A validated entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub category: Category,
    pub ticket_activity_number: Option<String>,
    pub number_of_line_items: u32,
    pub created_at: DateTime<Utc>,
}

/// Trims a name and rejects it if nothing is left.
pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    Ok(name.to_string())
}

/// Blank ticket numbers are stored as absent.
pub(crate) fn normalize_ticket(ticket: Option<String>) -> Option<String> {
    ticket
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub(crate) fn validate_line_items(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::InvalidLineItems { value })
}
