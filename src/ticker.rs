//! Fixed-period repeating timer polled from the UI thread.
//!
//! egui has no timer callbacks, so the dialog asks the ticker on every frame
//! whether a period has elapsed and schedules the next repaint with
//! [`Ticker::remaining`].

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// Arm a ticker whose first firing is one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true when a tick is due. Fires at most once per call; a late
    /// poll reschedules from `now` instead of replaying missed ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        let next = self.next_due + self.period;
        self.next_due = if next <= now { now + self.period } else { next };
        true
    }

    /// Time left until the next tick, zero if already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(300);

    #[test]
    fn does_not_fire_before_period() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(PERIOD, t0);
        assert!(!ticker.poll(t0));
        assert!(!ticker.poll(t0 + Duration::from_millis(299)));
        assert_eq!(ticker.remaining(t0 + Duration::from_millis(100)), Duration::from_millis(200));
    }

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(PERIOD, t0);
        assert!(ticker.poll(t0 + PERIOD));
        assert!(!ticker.poll(t0 + PERIOD));
        assert!(ticker.poll(t0 + PERIOD * 2));
    }

    #[test]
    fn late_poll_does_not_burst() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(PERIOD, t0);
        let late = t0 + PERIOD * 5;
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.remaining(late), PERIOD);
    }
}
