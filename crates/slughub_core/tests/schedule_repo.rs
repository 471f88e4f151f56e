use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::params;
use slughub_core::db::open_db_in_memory;
use slughub_core::{
    EventValidationError, NavigationCursor, NewEventRequest, RecurringEvent, RepoError,
    Resolution, ScheduleRepository, ScheduleService, Session, SqliteScheduleRepository, StartTime,
    UserId, WeekdayTag,
};
use uuid::Uuid;

// Monday 2024-09-09.
fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 9)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn request(name: &str, days: &str, time: &str) -> NewEventRequest {
    NewEventRequest::parse(name, "Baskin Engineering", days, time).unwrap()
}

#[test]
fn create_list_get_delete_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&conn).unwrap());
    let session = Session::for_user("sammy").unwrap();

    let first = service
        .add_event(&session, &request("CSE101", "M,W,F", "1:20 PM"))
        .unwrap();
    let second = service
        .add_special_event(&session, &request("Career Fair", "Th", "11:00"))
        .unwrap();

    let events = service.list_events(&session).unwrap();
    assert_eq!(
        events.iter().map(|event| event.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert!(!events[0].is_special);
    assert!(events[1].is_special);
    assert_eq!(
        events[0].to_string(),
        "CSE101 @ Baskin Engineering on M, W, F at 1:20 PM"
    );

    let loaded = service.get_event(&session, second).unwrap().unwrap();
    assert_eq!(loaded.start_time, StartTime::from_hm(11, 0).unwrap());
    assert_eq!(
        loaded.weekdays.iter().copied().collect::<Vec<_>>(),
        vec![WeekdayTag::Thu]
    );

    service.delete_event(&session, first).unwrap();
    assert!(service.get_event(&session, first).unwrap().is_none());
    assert!(matches!(
        service.delete_event(&session, first),
        Err(RepoError::NotFound(id)) if id == first
    ));
}

#[test]
fn events_are_scoped_to_their_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&conn).unwrap());
    let sammy = Session::for_user("sammy").unwrap();
    let alex = Session::for_user("alex").unwrap();

    let id = service
        .add_event(&sammy, &request("CSE101", "M", "9:20 AM"))
        .unwrap();

    assert!(service.list_events(&alex).unwrap().is_empty());
    assert!(service.get_event(&alex, id).unwrap().is_none());
    assert!(matches!(
        service.delete_event(&alex, id),
        Err(RepoError::NotFound(_))
    ));
    assert_eq!(service.list_events(&sammy).unwrap().len(), 1);
}

#[test]
fn invalid_events_are_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteScheduleRepository::try_new(&conn).unwrap();
    let owner = UserId::new("sammy").unwrap();

    let no_days = RecurringEvent::new(
        "CSE101",
        "Baskin Engineering",
        Vec::<WeekdayTag>::new(),
        StartTime::from_hm(9, 20).unwrap(),
    );
    assert!(matches!(
        repo.create_event(&owner, &no_days),
        Err(RepoError::InvalidEvent(EventValidationError::EmptyWeekdays))
    ));
    assert!(repo.list_events(&owner).unwrap().is_empty());
}

#[test]
fn request_parsing_reports_field_errors() {
    assert_eq!(
        NewEventRequest::parse(" ", "Porter", "M", "8:00 AM").unwrap_err(),
        EventValidationError::BlankName
    );
    assert_eq!(
        NewEventRequest::parse("CSE101", "Porter", "", "8:00 AM").unwrap_err(),
        EventValidationError::EmptyWeekdays
    );
    assert_eq!(
        NewEventRequest::parse("CSE101", "Porter", "M,Sa", "8:00 AM").unwrap_err(),
        EventValidationError::UnknownWeekday("Sa".to_string())
    );
    assert_eq!(
        NewEventRequest::parse("CSE101", "Porter", "M", "25:00").unwrap_err(),
        EventValidationError::InvalidStartTime("25:00".to_string())
    );
}

#[test]
fn malformed_rows_are_skipped_on_list() {
    let conn = open_db_in_memory().unwrap();
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&conn).unwrap());
    let session = Session::for_user("sammy").unwrap();

    let rows = [
        ("not-a-uuid".to_string(), "M", 500),
        (Uuid::new_v4().to_string(), "", 500),
        (Uuid::new_v4().to_string(), "M,Su", 500),
        (Uuid::new_v4().to_string(), "M", 9000),
    ];
    for (uuid, weekdays, start_minute) in rows {
        conn.execute(
            "INSERT INTO recurring_events (uuid, owner, name, location, weekdays, start_minute)
             VALUES (?1, 'sammy', 'BROKEN', 'Nowhere', ?2, ?3);",
            params![uuid, weekdays, start_minute],
        )
        .unwrap();
    }
    let valid = service
        .add_event(&session, &request("CSE101", "M", "1:20 PM"))
        .unwrap();

    let events = service.list_events(&session).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, valid);

    let upcoming = service.upcoming(&session, monday_at(9, 0)).unwrap();
    assert_eq!(upcoming.next().unwrap().event.id, valid);
}

#[test]
fn start_navigation_reflects_latest_schedule() {
    let conn = open_db_in_memory().unwrap();
    let service = ScheduleService::new(SqliteScheduleRepository::try_new(&conn).unwrap());
    let session = Session::for_user("sammy").unwrap();
    let mut cursor = NavigationCursor::new();

    assert!(service
        .start_navigation(&session, monday_at(9, 0), &mut cursor)
        .unwrap()
        .is_none());
    assert!(cursor.has_no_upcoming());
    assert_eq!(
        service.upcoming(&session, monday_at(9, 0)).unwrap(),
        Resolution::NoUpcoming
    );

    let later = service
        .add_event(&session, &request("CSE101", "M,W", "1:20 PM"))
        .unwrap();
    let earlier = service
        .add_event(&session, &request("MATH19A", "M", "10:40 AM"))
        .unwrap();

    let first = service
        .start_navigation(&session, monday_at(9, 0), &mut cursor)
        .unwrap()
        .unwrap();
    assert_eq!(first.event.id, earlier);
    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.advance().occurrence().unwrap().event.id, later);

    service.delete_event(&session, earlier).unwrap();
    // Started cursors keep their sequence until restarted.
    assert_eq!(cursor.len(), 2);

    let restarted = service
        .start_navigation(&session, monday_at(9, 0), &mut cursor)
        .unwrap()
        .unwrap();
    assert_eq!(restarted.event.id, later);
    assert_eq!(cursor.len(), 1);
}
