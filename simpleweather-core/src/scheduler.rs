use std::time::Duration;

use tokio::time::Instant;

/// Fixed-interval refresh timer. No backoff and no jitter: a failed refresh is
/// simply retried on the next tick.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    period: Duration,
    next_due: Instant,
}

impl RefreshScheduler {
    /// First tick is one full period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.next_due
    }

    /// Returns `true` when a tick is due at `now` and schedules the next one.
    ///
    /// Missed ticks are collapsed into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(600);

    #[test]
    fn ticks_on_fixed_interval() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(PERIOD, t0);

        assert!(!scheduler.poll(t0));
        assert!(!scheduler.poll(t0 + PERIOD - Duration::from_millis(1)));
        assert!(scheduler.poll(t0 + PERIOD));
        assert_eq!(scheduler.deadline(), t0 + PERIOD * 2);

        // Slightly late polling does not drift the schedule.
        assert!(scheduler.poll(t0 + PERIOD * 2 + Duration::from_secs(3)));
        assert_eq!(scheduler.deadline(), t0 + PERIOD * 3);
    }

    #[test]
    fn missed_ticks_collapse() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(PERIOD, t0);

        let late = t0 + PERIOD * 5 + Duration::from_secs(1);
        assert!(scheduler.poll(late));
        assert!(!scheduler.poll(late));
        assert_eq!(scheduler.deadline(), late + PERIOD);
    }
}
