//! Schedule use-case service.
//!
//! # Responsibility
//! - Provide class CRUD entry points scoped to a session user.
//! - Feed stored events into the resolver and navigation cursor.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Every call is scoped to `session.user`; there is no ambient user.
//! - Cursors are rebuilt from fresh repository reads on every start.

use crate::model::event::{
    parse_weekday_list, EventId, EventValidationError, RecurringEvent, StartTime, WeekdayTag,
};
use crate::model::session::Session;
use crate::repo::event_repo::ScheduleRepository;
use crate::repo::RepoResult;
use crate::schedule::cursor::NavigationCursor;
use crate::schedule::resolver::{resolve_upcoming, Occurrence, Resolution};
use chrono::NaiveDateTime;
use log::info;
use std::collections::BTreeSet;

/// Request model for adding a class or event to a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEventRequest {
    pub name: String,
    pub location: String,
    pub weekdays: BTreeSet<WeekdayTag>,
    pub start_time: StartTime,
}

impl NewEventRequest {
    /// Builds a request from raw form input (`"M,W,F"`, `"1:20 PM"`).
    pub fn parse(
        name: &str,
        location: &str,
        days: &str,
        start_time: &str,
    ) -> Result<Self, EventValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventValidationError::BlankName);
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(EventValidationError::BlankLocation);
        }
        let weekdays = parse_weekday_list(days)?;
        if weekdays.is_empty() {
            return Err(EventValidationError::EmptyWeekdays);
        }

        Ok(Self {
            name: name.to_string(),
            location: location.to_string(),
            weekdays,
            start_time: StartTime::parse(start_time)?,
        })
    }

    fn to_event(&self) -> RecurringEvent {
        RecurringEvent::new(
            self.name.trim(),
            self.location.trim(),
            self.weekdays.iter().copied(),
            self.start_time,
        )
    }
}

/// Use-case service wrapper for schedule operations.
pub struct ScheduleService<R: ScheduleRepository> {
    repo: R,
}

impl<R: ScheduleRepository> ScheduleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a recurring class for the session user.
    pub fn add_event(&self, session: &Session, request: &NewEventRequest) -> RepoResult<EventId> {
        let id = self.repo.create_event(&session.user, &request.to_event())?;
        info!("event=schedule_add module=service status=ok event_id={id} special=false");
        Ok(id)
    }

    /// Adds a one-off item (e.g. a campus event) flagged as special.
    pub fn add_special_event(
        &self,
        session: &Session,
        request: &NewEventRequest,
    ) -> RepoResult<EventId> {
        let id = self
            .repo
            .create_event(&session.user, &request.to_event().special())?;
        info!("event=schedule_add module=service status=ok event_id={id} special=true");
        Ok(id)
    }

    pub fn get_event(&self, session: &Session, id: EventId) -> RepoResult<Option<RecurringEvent>> {
        self.repo.get_event(&session.user, id)
    }

    /// Lists the session user's events in creation order.
    pub fn list_events(&self, session: &Session) -> RepoResult<Vec<RecurringEvent>> {
        self.repo.list_events(&session.user)
    }

    /// Deletes one of the session user's events.
    ///
    /// Cursors started before the delete keep their old sequence until
    /// restarted.
    pub fn delete_event(&self, session: &Session, id: EventId) -> RepoResult<()> {
        self.repo.delete_event(&session.user, id)?;
        info!("event=schedule_delete module=service status=ok event_id={id}");
        Ok(())
    }

    /// Resolves the session user's upcoming occurrences at `now`.
    pub fn upcoming(&self, session: &Session, now: NaiveDateTime) -> RepoResult<Resolution> {
        let events = self.repo.list_events(&session.user)?;
        Ok(resolve_upcoming(now, &events))
    }

    /// Restarts `cursor` from a fresh read of the session user's schedule.
    ///
    /// Returns the first occurrence, or `None` when nothing is upcoming.
    pub fn start_navigation(
        &self,
        session: &Session,
        now: NaiveDateTime,
        cursor: &mut NavigationCursor,
    ) -> RepoResult<Option<Occurrence>> {
        let events = self.repo.list_events(&session.user)?;
        Ok(cursor.start(now, &events).cloned())
    }
}
