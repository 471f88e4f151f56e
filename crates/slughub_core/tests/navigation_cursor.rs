use chrono::{NaiveDate, NaiveDateTime};
use slughub_core::{NavigationCursor, RecurringEvent, StartTime, Step, WeekdayTag};

// Thursday morning.
fn thursday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 12)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap()
}

fn thursday_classes() -> Vec<RecurringEvent> {
    ["8:00 AM", "9:50 AM", "1:30 PM"]
        .iter()
        .enumerate()
        .map(|(i, time)| {
            RecurringEvent::new(
                format!("CLASS{i}"),
                format!("Room {i}"),
                [WeekdayTag::Tue, WeekdayTag::Thu],
                StartTime::parse(time).unwrap(),
            )
        })
        .collect()
}

fn current_name(cursor: &NavigationCursor) -> String {
    cursor.current().unwrap().event.name.clone()
}

#[test]
fn steps_report_boundaries_without_moving() {
    let mut cursor = NavigationCursor::new();
    let first = cursor.start(thursday_morning(), &thursday_classes()).cloned();
    assert_eq!(first.unwrap().event.name, "CLASS0");
    assert_eq!(cursor.len(), 3);
    assert_eq!(cursor.index(), Some(0));

    assert_eq!(cursor.retreat(), Step::AlreadyAtFirst);
    assert_eq!(cursor.index(), Some(0));

    assert_eq!(
        cursor.advance().occurrence().unwrap().event.name,
        "CLASS1"
    );
    assert_eq!(
        cursor.advance().occurrence().unwrap().event.name,
        "CLASS2"
    );
    assert_eq!(cursor.index(), Some(2));

    assert_eq!(cursor.advance(), Step::NoFurther);
    assert_eq!(cursor.index(), Some(2));
    assert_eq!(current_name(&cursor), "CLASS2");
}

#[test]
fn advance_then_retreat_round_trips() {
    let mut cursor = NavigationCursor::new();
    cursor.start(thursday_morning(), &thursday_classes());

    for start in 0..2 {
        cursor.rewind();
        for _ in 0..start {
            cursor.advance();
        }
        let before = current_name(&cursor);
        assert!(cursor.advance().occurrence().is_some());
        assert!(cursor.retreat().occurrence().is_some());
        assert_eq!(current_name(&cursor), before);
    }
}

#[test]
fn empty_resolution_makes_every_step_a_no_op() {
    let mut cursor = NavigationCursor::new();
    assert!(cursor.start(thursday_morning(), &[]).is_none());

    assert!(cursor.is_started());
    assert!(cursor.has_no_upcoming());
    assert!(cursor.is_empty());
    assert_eq!(cursor.index(), None);
    assert_eq!(cursor.advance(), Step::NothingToNavigate);
    assert_eq!(cursor.retreat(), Step::NothingToNavigate);
    assert!(cursor.current().is_none());
}

#[test]
fn restart_discards_previous_sequence_and_index() {
    let mut classes = thursday_classes();
    let mut cursor = NavigationCursor::new();
    cursor.start(thursday_morning(), &classes);
    cursor.advance();
    cursor.advance();

    // Schedule edits are only seen after an explicit restart.
    classes.remove(0);
    assert_eq!(cursor.len(), 3);

    cursor.start(thursday_morning(), &classes);
    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.index(), Some(0));
    assert_eq!(current_name(&cursor), "CLASS1");
}
