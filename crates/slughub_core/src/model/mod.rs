//! Domain model for schedules, sessions and forum feeds.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they protect.
//!
//! # Invariants
//! - Every recurring event is identified by a stable `EventId`.
//! - Occurrences are derived at resolution time and never stored.

pub mod event;
pub mod feed;
pub mod session;
