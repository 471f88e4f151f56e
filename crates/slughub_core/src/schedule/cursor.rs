//! Browsable cursor over one resolver result.
//!
//! # Responsibility
//! - Hold the resolved occurrence sequence and a current index.
//! - Report edge conditions as step results, never as faults.
//!
//! # Invariants
//! - `0 <= index < occurrences.len()` whenever the sequence is non-empty.
//! - The sequence is immutable between two `start()` calls.
//! - The cursor does not observe schedule mutations; callers re-`start()`.

use crate::model::event::RecurringEvent;
use crate::schedule::resolver::{resolve_upcoming, Occurrence, Resolution};
use chrono::NaiveDateTime;
use log::debug;

/// Result of one step operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Index moved; carries the occurrence now pointed to.
    Moved(&'a Occurrence),
    /// `advance()` at the last occurrence; index unchanged.
    NoFurther,
    /// `retreat()` at the first occurrence; index unchanged.
    AlreadyAtFirst,
    /// Cursor holds no occurrences (never started or nothing upcoming).
    NothingToNavigate,
}

impl<'a> Step<'a> {
    pub fn occurrence(self) -> Option<&'a Occurrence> {
        match self {
            Self::Moved(occurrence) => Some(occurrence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum CursorState {
    #[default]
    NotStarted,
    NoUpcoming,
    Browsing {
        occurrences: Vec<Occurrence>,
        index: usize,
    },
}

/// Stateful wrapper around the upcoming-occurrence sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    state: CursorState,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-runs the resolver, discarding any prior sequence and index.
    ///
    /// Returns the first occurrence, or `None` when nothing is upcoming.
    pub fn start(&mut self, now: NaiveDateTime, events: &[RecurringEvent]) -> Option<&Occurrence> {
        self.load(resolve_upcoming(now, events))
    }

    /// Installs an already computed resolution with index 0.
    pub fn load(&mut self, resolution: Resolution) -> Option<&Occurrence> {
        self.state = match resolution {
            Resolution::Upcoming(occurrences) if !occurrences.is_empty() => {
                CursorState::Browsing {
                    occurrences,
                    index: 0,
                }
            }
            _ => CursorState::NoUpcoming,
        };
        debug!(
            "event=cursor_start module=schedule status=ok occurrences={}",
            self.len()
        );
        self.current()
    }

    /// Whether `start()` or `load()` has run at least once.
    pub fn is_started(&self) -> bool {
        !matches!(self.state, CursorState::NotStarted)
    }

    /// Whether the last resolution found nothing upcoming.
    pub fn has_no_upcoming(&self) -> bool {
        matches!(self.state, CursorState::NoUpcoming)
    }

    pub fn current(&self) -> Option<&Occurrence> {
        match &self.state {
            CursorState::Browsing { occurrences, index } => occurrences.get(*index),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match &self.state {
            CursorState::Browsing { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.occurrences().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        match &self.state {
            CursorState::Browsing { occurrences, .. } => occurrences,
            _ => &[],
        }
    }

    /// Moves to the next occurrence.
    pub fn advance(&mut self) -> Step<'_> {
        match &mut self.state {
            CursorState::Browsing { occurrences, index } => {
                if *index + 1 >= occurrences.len() {
                    return Step::NoFurther;
                }
                *index += 1;
                Step::Moved(&occurrences[*index])
            }
            _ => Step::NothingToNavigate,
        }
    }

    /// Moves to the previous occurrence.
    pub fn retreat(&mut self) -> Step<'_> {
        match &mut self.state {
            CursorState::Browsing { occurrences, index } => {
                if *index == 0 {
                    return Step::AlreadyAtFirst;
                }
                *index -= 1;
                Step::Moved(&occurrences[*index])
            }
            _ => Step::NothingToNavigate,
        }
    }

    /// Jumps back to the first occurrence without re-resolving.
    pub fn rewind(&mut self) -> Option<&Occurrence> {
        if let CursorState::Browsing { index, .. } = &mut self.state {
            *index = 0;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationCursor, Step};

    #[test]
    fn fresh_cursor_has_nothing_to_navigate() {
        let mut cursor = NavigationCursor::new();
        assert!(!cursor.is_started());
        assert!(cursor.current().is_none());
        assert_eq!(cursor.advance(), Step::NothingToNavigate);
        assert_eq!(cursor.retreat(), Step::NothingToNavigate);
        assert!(cursor.rewind().is_none());
    }
}
