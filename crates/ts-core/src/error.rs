//! Errors raised by the lifecycle and query operations.

use thiserror::Error;

use crate::entry::{EntryId, ValidationError};

/// Boxed store fault, passed through untouched.
pub type StoreFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a timesheet operation.
#[derive(Debug, Error)]
pub enum EntryError {
    /// Malformed input, rejected before the store is touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `stop` found no running entry with this id.
    #[error("No running timer found with id {id}")]
    NoRunningTimer { id: EntryId },

    /// No entry with this id exists.
    #[error("Timesheet entry with id {id} not found")]
    NotFound { id: EntryId },

    /// The entry is running and its fields are locked.
    #[error(
        "Cannot update timesheet entry {id} because it is currently running. Stop the timer first."
    )]
    StillRunning { id: EntryId },

    /// The store failed.
    #[error(transparent)]
    Store(StoreFault),
}

/// Coarse classification of an [`EntryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidState,
    Store,
}

impl EntryError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NoRunningTimer { .. } | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StillRunning { .. } => ErrorKind::InvalidState,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}
