//! Fixed-interval poll ticker.
//!
//! Missed ticks are not replayed: after a long stall the next check fires
//! once and the schedule restarts from that moment.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PollTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` when a poll should run at `now`.
    ///
    /// The first check always fires.
    pub fn is_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Time left until the next tick; zero when due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }

    /// Makes the next check fire immediately.
    pub fn reset(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::PollTicker;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = PollTicker::new(Duration::from_secs(5));

        assert!(ticker.is_due(start));
        assert!(!ticker.is_due(start + Duration::from_secs(4)));
        assert!(ticker.is_due(start + Duration::from_secs(5)));
        assert_eq!(
            ticker.remaining(start + Duration::from_secs(6)),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn stall_does_not_replay_missed_ticks() {
        let start = Instant::now();
        let mut ticker = PollTicker::new(Duration::from_secs(5));
        assert!(ticker.is_due(start));

        let late = start + Duration::from_secs(30);
        assert!(ticker.is_due(late));
        assert!(!ticker.is_due(late + Duration::from_secs(1)));

        ticker.reset();
        assert!(ticker.is_due(late + Duration::from_secs(1)));
    }
}
