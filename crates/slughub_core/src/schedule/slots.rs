//! Campus start-time slot suggestions.
//!
//! Class blocks differ by meeting pattern: three-day MWF classes use 70-minute
//! blocks, two-day classes use longer blocks plus evening slots.

use crate::model::event::{StartTime, WeekdayTag};
use std::collections::BTreeSet;

const MWF_SLOTS: [(u8, u8); 7] = [
    (8, 0),
    (9, 20),
    (10, 40),
    (12, 0),
    (13, 20),
    (14, 40),
    (16, 0),
];
const TWO_DAY_SLOTS: [(u8, u8); 5] = [(8, 0), (9, 50), (11, 40), (13, 30), (15, 20)];
const EVENING_SLOTS: [(u8, u8); 2] = [(17, 20), (19, 10)];

/// Returns the valid start times for a set of meeting days.
///
/// - All of M, W, F selected: MWF slots.
/// - Exactly {M, W} or exactly {T, Th}: two-day slots, then evening slots.
/// - Any other non-empty selection: every slot, sorted and de-duplicated.
/// - Empty selection: nothing.
pub fn suggested_start_times(days: &BTreeSet<WeekdayTag>) -> Vec<StartTime> {
    let has_all = |tags: &[WeekdayTag]| tags.iter().all(|tag| days.contains(tag));
    let is_exactly = |tags: &[WeekdayTag]| days.len() == tags.len() && has_all(tags);

    if days.is_empty() {
        return Vec::new();
    }
    if has_all(&[WeekdayTag::Mon, WeekdayTag::Wed, WeekdayTag::Fri]) {
        return to_start_times(MWF_SLOTS.iter());
    }
    if is_exactly(&[WeekdayTag::Mon, WeekdayTag::Wed])
        || is_exactly(&[WeekdayTag::Tue, WeekdayTag::Thu])
    {
        return to_start_times(TWO_DAY_SLOTS.iter().chain(EVENING_SLOTS.iter()));
    }

    let all: BTreeSet<StartTime> = to_start_times(
        MWF_SLOTS
            .iter()
            .chain(TWO_DAY_SLOTS.iter())
            .chain(EVENING_SLOTS.iter()),
    )
    .into_iter()
    .collect();
    all.into_iter().collect()
}

fn to_start_times<'a>(slots: impl Iterator<Item = &'a (u8, u8)>) -> Vec<StartTime> {
    slots
        .filter_map(|(hour, minute)| StartTime::from_hm(*hour, *minute).ok())
        .collect()
}
