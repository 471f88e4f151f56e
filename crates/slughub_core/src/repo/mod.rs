//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the schedule-store and feed-store contracts the core reads from.
//! - Isolate SQLite query details from service/sync orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use crate::db::DbError;
use crate::model::event::{EventId, EventValidationError};
use crate::model::feed::FeedValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_repo;
pub mod feed_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by schedule and feed stores.
#[derive(Debug)]
pub enum RepoError {
    InvalidEvent(EventValidationError),
    InvalidFeedEntry(FeedValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEvent(err) => write!(f, "{err}"),
            Self::InvalidFeedEntry(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEvent(err) => Some(err),
            Self::InvalidFeedEntry(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::InvalidEvent(value)
    }
}

impl From<FeedValidationError> for RepoError {
    fn from(value: FeedValidationError) -> Self {
        Self::InvalidFeedEntry(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
