//! Routing toward the external map surface.
//!
//! # Responsibility
//! - Model travel modes and surface commands.
//! - Gate command delivery on the surface's one-shot readiness signal.

pub mod bridge;
pub mod command;
