//! Recurring-schedule navigation.
//!
//! # Responsibility
//! - Resolve weekly-recurring events into concrete upcoming occurrences.
//! - Provide a step-through cursor over one resolution.
//! - Suggest valid start-time slots for class entry.

pub mod cursor;
pub mod resolver;
pub mod slots;
