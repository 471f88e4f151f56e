//! Recurring event domain model.
//!
//! # Responsibility
//! - Define the weekly-recurring commitment shape read by the resolver.
//! - Normalize wall-clock start times into minute-of-day values.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `weekdays` is non-empty and drawn from the Monday..Friday tag domain.
//! - `StartTime` always holds a value in `0..MINUTES_PER_DAY`.

use chrono::{NaiveTime, Timelike, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a recurring event.
pub type EventId = Uuid;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<meridiem>[AaPp][Mm])?$")
        .expect("clock time pattern is valid")
});

/// Weekday tag domain used by class schedules.
///
/// Saturday and Sunday have no tag: recurring events never occur on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeekdayTag {
    #[serde(rename = "M")]
    Mon,
    #[serde(rename = "T")]
    Tue,
    #[serde(rename = "W")]
    Wed,
    #[serde(rename = "Th")]
    Thu,
    #[serde(rename = "F")]
    Fri,
}

impl WeekdayTag {
    pub const ALL: [WeekdayTag; 5] = [
        WeekdayTag::Mon,
        WeekdayTag::Tue,
        WeekdayTag::Wed,
        WeekdayTag::Thu,
        WeekdayTag::Fri,
    ];

    /// Maps a calendar weekday into the tag domain.
    ///
    /// Returns `None` for Saturday and Sunday.
    pub fn from_weekday(day: Weekday) -> Option<Self> {
        match day {
            Weekday::Mon => Some(Self::Mon),
            Weekday::Tue => Some(Self::Tue),
            Weekday::Wed => Some(Self::Wed),
            Weekday::Thu => Some(Self::Thu),
            Weekday::Fri => Some(Self::Fri),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// Short schedule label (`M`, `T`, `W`, `Th`, `F`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Mon => "M",
            Self::Tue => "T",
            Self::Wed => "W",
            Self::Thu => "Th",
            Self::Fri => "F",
        }
    }

    /// Parses a label or weekday name, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "mon" | "monday" => Some(Self::Mon),
            "t" | "tu" | "tue" | "tuesday" => Some(Self::Tue),
            "w" | "wed" | "wednesday" => Some(Self::Wed),
            "th" | "thu" | "thursday" => Some(Self::Thu),
            "f" | "fri" | "friday" => Some(Self::Fri),
            _ => None,
        }
    }
}

impl Display for WeekdayTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a comma-separated tag list such as `M,W,F`.
///
/// Blank segments are ignored; any unknown segment fails the whole list.
pub fn parse_weekday_list(value: &str) -> Result<BTreeSet<WeekdayTag>, EventValidationError> {
    let mut tags = BTreeSet::new();
    for segment in value.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let tag = WeekdayTag::parse(segment)
            .ok_or_else(|| EventValidationError::UnknownWeekday(segment.to_string()))?;
        tags.insert(tag);
    }
    Ok(tags)
}

/// Formats tags in week order, joined by `sep`.
pub fn format_weekday_list(tags: &BTreeSet<WeekdayTag>, sep: &str) -> String {
    tags.iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Wall-clock start time stored as minute-of-day.
///
/// Ordering is numeric, so `9:20 AM < 12:00 PM < 1:20 PM` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct StartTime(u16);

impl StartTime {
    /// Builds a start time from 24-hour clock components.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, EventValidationError> {
        if hour > 23 || minute > 59 {
            return Err(EventValidationError::InvalidStartTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Builds a start time from a minute-of-day value.
    pub fn from_minute_of_day(minute: u16) -> Result<Self, EventValidationError> {
        if minute >= MINUTES_PER_DAY {
            return Err(EventValidationError::InvalidStartTime(minute.to_string()));
        }
        Ok(Self(minute))
    }

    /// Truncates a clock time to minute precision.
    pub fn from_time(time: NaiveTime) -> Self {
        // hour() <= 23 and minute() <= 59, so the value is always in range.
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Parses `h:mm AM/PM` or 24-hour `HH:MM`.
    pub fn parse(value: &str) -> Result<Self, EventValidationError> {
        let invalid = || EventValidationError::InvalidStartTime(value.trim().to_string());
        let captures = CLOCK_TIME_RE.captures(value.trim()).ok_or_else(invalid)?;
        let hour: u8 = captures["hour"].parse().map_err(|_| invalid())?;
        let minute: u8 = captures["minute"].parse().map_err(|_| invalid())?;

        let hour = match captures.name("meridiem") {
            Some(meridiem) => {
                if !(1..=12).contains(&hour) {
                    return Err(invalid());
                }
                let is_pm = meridiem.as_str().eq_ignore_ascii_case("pm");
                match (hour, is_pm) {
                    (12, false) => 0,
                    (12, true) => 12,
                    (h, false) => h,
                    (h, true) => h + 12,
                }
            }
            None => hour,
        };

        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Converts back to a clock time at second zero.
    pub fn to_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl Display for StartTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hour = self.hour();
        let meridiem = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{display_hour}:{:02} {meridiem}", self.minute())
    }
}

impl FromStr for StartTime {
    type Err = EventValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u16> for StartTime {
    type Error = EventValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_minute_of_day(value)
    }
}

impl From<StartTime> for u16 {
    fn from(value: StartTime) -> Self {
        value.0
    }
}

/// Validation errors for recurring event records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    NilId,
    BlankName,
    BlankLocation,
    EmptyWeekdays,
    UnknownWeekday(String),
    InvalidStartTime(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "event id must not be nil"),
            Self::BlankName => write!(f, "event name must not be blank"),
            Self::BlankLocation => write!(f, "event location must not be blank"),
            Self::EmptyWeekdays => write!(f, "event must recur on at least one weekday"),
            Self::UnknownWeekday(value) => write!(f, "unknown weekday tag `{value}`"),
            Self::InvalidStartTime(value) => write!(f, "invalid start time `{value}`"),
        }
    }
}

impl Error for EventValidationError {}

/// One weekly-recurring class or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringEvent {
    pub id: EventId,
    /// Display label, e.g. a course code.
    pub name: String,
    /// Free-text routing destination.
    pub location: String,
    pub weekdays: BTreeSet<WeekdayTag>,
    pub start_time: StartTime,
    /// One-off item injected from an external feed. Display-only.
    #[serde(default)]
    pub is_special: bool,
}

impl RecurringEvent {
    /// Creates an event with a generated stable ID.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        weekdays: impl IntoIterator<Item = WeekdayTag>,
        start_time: StartTime,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, location, weekdays, start_time)
    }

    /// Creates an event with a caller-provided stable ID.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(
        id: EventId,
        name: impl Into<String>,
        location: impl Into<String>,
        weekdays: impl IntoIterator<Item = WeekdayTag>,
        start_time: StartTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            weekdays: weekdays.into_iter().collect(),
            start_time,
            is_special: false,
        }
    }

    /// Marks this event as a one-off special item.
    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }

    pub fn occurs_on(&self, tag: WeekdayTag) -> bool {
        self.weekdays.contains(&tag)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_nil() {
            return Err(EventValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(EventValidationError::BlankName);
        }
        if self.location.trim().is_empty() {
            return Err(EventValidationError::BlankLocation);
        }
        if self.weekdays.is_empty() {
            return Err(EventValidationError::EmptyWeekdays);
        }
        Ok(())
    }
}

impl Display for RecurringEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {} on {} at {}",
            self.name,
            self.location,
            format_weekday_list(&self.weekdays, ", "),
            self.start_time
        )
    }
}
