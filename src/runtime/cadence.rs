use std::time::{Duration, Instant};

/// A periodic deadline polled by the event loop.
///
/// Missed periods are not replayed: after a stall the next deadline is one
/// period after the moment the cadence fired.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    pub fn every(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: now + period,
        }
    }

    pub fn from_hz(hz: u32, now: Instant) -> Self {
        Self::every(Duration::from_secs(1) / hz.max(1), now)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` at most once per elapsed period.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}
