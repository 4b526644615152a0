use std::time::{Duration, Instant};

/// A repeating tick owned by the component that schedules it.
///
/// The event loop calls [`Interval::poll`] with the current instant and gets
/// back how many periods have elapsed since the last call. Once cancelled an
/// interval never fires again until it is explicitly restarted.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Interval {
            period,
            next_due: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Arms the interval; the first firing is one period after `now`.
    /// Restarting an active interval resets its phase.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Idempotent.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left until the next firing, or None when cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Number of firings due at `now`. Advances the deadline by whole periods
    /// so a late poll catches up rather than drifting.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        if self.period.is_zero() {
            return 0;
        }
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}
