//! Recurring event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store and read each user's recurring events.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `RecurringEvent::validate()` before SQL mutations.
//! - Every query is scoped to one owner; users never see each other's rows.
//! - `list_events` skips malformed rows with a warning; `get_event` rejects
//!   them.

use crate::db::require_table;
use crate::model::event::{
    format_weekday_list, parse_weekday_list, EventId, RecurringEvent, StartTime,
};
use crate::model::session::UserId;
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    location,
    weekdays,
    start_minute,
    is_special
FROM recurring_events";

/// Repository interface for schedule CRUD.
pub trait ScheduleRepository {
    fn create_event(&self, owner: &UserId, event: &RecurringEvent) -> RepoResult<EventId>;
    fn get_event(&self, owner: &UserId, id: EventId) -> RepoResult<Option<RecurringEvent>>;
    /// Lists the owner's events in creation order.
    fn list_events(&self, owner: &UserId) -> RepoResult<Vec<RecurringEvent>>;
    fn delete_event(&self, owner: &UserId, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed schedule repository.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        require_table(conn, "recurring_events")?;
        Ok(Self { conn })
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn create_event(&self, owner: &UserId, event: &RecurringEvent) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO recurring_events (
                uuid,
                owner,
                name,
                location,
                weekdays,
                start_minute,
                is_special
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.id.to_string(),
                owner.as_str(),
                event.name.trim(),
                event.location.trim(),
                format_weekday_list(&event.weekdays, ","),
                event.start_time.minute_of_day(),
                bool_to_int(event.is_special),
            ],
        )?;

        Ok(event.id)
    }

    fn get_event(&self, owner: &UserId, id: EventId) -> RepoResult<Option<RecurringEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE owner = ?1 AND uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![owner.as_str(), id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_events(&self, owner: &UserId) -> RepoResult<Vec<RecurringEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([owner.as_str()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            match parse_event_row(row) {
                Ok(event) => events.push(event),
                Err(err @ (RepoError::InvalidData(_) | RepoError::InvalidEvent(_))) => {
                    let uuid: String = row.get("uuid")?;
                    warn!(
                        "event=schedule_row_skipped module=repo status=skip event_id={uuid} reason={err}"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(events)
    }

    fn delete_event(&self, owner: &UserId, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM recurring_events WHERE owner = ?1 AND uuid = ?2;",
            params![owner.as_str(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<RecurringEvent> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in recurring_events.uuid"
        ))
    })?;

    let weekdays_text: String = row.get("weekdays")?;
    let weekdays = parse_weekday_list(&weekdays_text)?;

    let start_minute: i64 = row.get("start_minute")?;
    let start_time = u16::try_from(start_minute)
        .ok()
        .and_then(|minute| StartTime::from_minute_of_day(minute).ok())
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid start_minute `{start_minute}` in recurring_events.start_minute"
            ))
        })?;

    let is_special = match row.get::<_, i64>("is_special")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_special value `{other}` in recurring_events.is_special"
            )));
        }
    };

    let mut event = RecurringEvent::with_id(
        id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("location")?,
        weekdays,
        start_time,
    );
    event.is_special = is_special;
    event.validate()?;
    Ok(event)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
