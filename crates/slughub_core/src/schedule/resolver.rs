//! Occurrence resolution for weekly-recurring events.
//!
//! # Responsibility
//! - Turn "now" plus a set of recurring events into the concrete upcoming
//!   occurrences of the first day that has any.
//!
//! # Invariants
//! - Scans at most `LOOKAHEAD_DAYS` calendar days (offsets `0..7`).
//! - Offset 0 keeps only events starting strictly after now's minute.
//! - Scanning stops at the first offset that yields a match.
//! - Output is sorted by `(day_offset, start_time)`; ties keep input order.

use crate::model::event::{RecurringEvent, StartTime, WeekdayTag};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use log::{debug, warn};

/// Look-ahead window in calendar days.
pub const LOOKAHEAD_DAYS: u32 = 7;

/// One concrete instance of a recurring event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Days after the resolution date; 0 means today.
    pub day_offset: u32,
    pub event: RecurringEvent,
}

impl Occurrence {
    /// Calendar date of this occurrence relative to `today`.
    ///
    /// `None` when the offset runs past the last representable date.
    pub fn date(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(u64::from(self.day_offset)))
    }

    /// Local start timestamp of this occurrence relative to `today`.
    pub fn starts_at(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        self.date(today)
            .map(|date| date.and_time(self.event.start_time.to_time()))
    }

    pub fn start_time(&self) -> StartTime {
        self.event.start_time
    }

    pub fn location(&self) -> &str {
        &self.event.location
    }
}

/// Result of one resolver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Sorted, non-empty occurrences of the first matching day.
    Upcoming(Vec<Occurrence>),
    /// Nothing scheduled within the look-ahead window.
    NoUpcoming,
}

impl Resolution {
    pub fn occurrences(&self) -> &[Occurrence] {
        match self {
            Self::Upcoming(occurrences) => occurrences,
            Self::NoUpcoming => &[],
        }
    }

    pub fn into_occurrences(self) -> Vec<Occurrence> {
        match self {
            Self::Upcoming(occurrences) => occurrences,
            Self::NoUpcoming => Vec::new(),
        }
    }

    /// Earliest upcoming occurrence, if any.
    pub fn next(&self) -> Option<&Occurrence> {
        self.occurrences().first()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoUpcoming)
    }
}

/// Resolves the upcoming occurrences of `events` relative to `now`.
///
/// Events failing `RecurringEvent::validate()` are skipped with a warning;
/// they never abort resolution for the remaining events.
pub fn resolve_upcoming(now: NaiveDateTime, events: &[RecurringEvent]) -> Resolution {
    let today = now.date();
    let now_minute = StartTime::from_time(now.time());

    let valid: Vec<&RecurringEvent> = events
        .iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=resolve_skip module=schedule status=skip event_id={} reason={}",
                    event.id, err
                );
                false
            }
        })
        .collect();

    let mut recorded: Vec<Occurrence> = Vec::new();
    for offset in 0..LOOKAHEAD_DAYS {
        let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let Some(tag) = WeekdayTag::from_weekday(date.weekday()) else {
            continue;
        };

        for event in valid.iter().filter(|event| event.occurs_on(tag)) {
            if offset == 0 && event.start_time <= now_minute {
                continue;
            }
            recorded.push(Occurrence {
                day_offset: offset,
                event: (*event).clone(),
            });
        }

        if !recorded.is_empty() {
            break;
        }
    }

    // Stable sort keeps input order among equal start times.
    recorded.sort_by_key(|occurrence| (occurrence.day_offset, occurrence.event.start_time));

    debug!(
        "event=resolve module=schedule status=ok events={} skipped={} occurrences={}",
        events.len(),
        events.len() - valid.len(),
        recorded.len()
    );

    if recorded.is_empty() {
        Resolution::NoUpcoming
    } else {
        Resolution::Upcoming(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_upcoming, Occurrence, Resolution};
    use crate::model::event::{RecurringEvent, StartTime, WeekdayTag};
    use chrono::NaiveDate;

    #[test]
    fn no_events_resolves_to_no_upcoming() {
        let now = NaiveDate::from_ymd_opt(2025, 1, 8)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");
        assert_eq!(resolve_upcoming(now, &[]), Resolution::NoUpcoming);
    }

    #[test]
    fn seconds_past_the_minute_still_exclude_that_minute() {
        // 2025-01-08 is a Wednesday.
        let now = NaiveDate::from_ymd_opt(2025, 1, 8)
            .and_then(|d| d.and_hms_opt(13, 20, 59))
            .expect("valid timestamp");
        let event = RecurringEvent::new(
            "CSE101",
            "Baskin Auditorium",
            [WeekdayTag::Wed],
            StartTime::from_hm(13, 20).expect("valid time"),
        );
        // Next Wednesday is offset 7, outside the window.
        assert_eq!(resolve_upcoming(now, &[event]), Resolution::NoUpcoming);
    }

    #[test]
    fn occurrence_date_reports_calendar_overflow() {
        let event = RecurringEvent::new(
            "CSE101",
            "Baskin Auditorium",
            [WeekdayTag::Mon],
            StartTime::from_hm(9, 0).expect("valid time"),
        );
        let occurrence = Occurrence {
            day_offset: 2,
            event,
        };

        let last = NaiveDate::MAX;
        assert_eq!(occurrence.date(last), None);
        assert_eq!(occurrence.starts_at(last), None);

        let today = NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date");
        assert_eq!(
            occurrence.starts_at(today),
            NaiveDate::from_ymd_opt(2025, 1, 8).and_then(|d| d.and_hms_opt(9, 0, 0))
        );
    }
}
