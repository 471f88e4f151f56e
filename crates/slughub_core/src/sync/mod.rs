//! Forum feed synchronization.
//!
//! # Responsibility
//! - Keep a local channel view current by watermark-based polling.
//! - Pace polls with a fixed-interval ticker.

pub mod feed_sync;
pub mod ticker;
