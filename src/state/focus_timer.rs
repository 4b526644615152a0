use crate::state::interval::Interval;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const MIN_FOCUS_MINUTES: u32 = 5;
pub const MAX_FOCUS_MINUTES: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    Completed,
}

/// Countdown behind the Focus/Stop button.
///
/// Idle while `interval` is cancelled. Each tick of the one-second interval
/// decrements `remaining_seconds`; hitting zero cancels the interval and
/// yields a single [`TimerEvent::Completed`].
#[derive(Debug, Clone)]
pub struct FocusTimer {
    configured_minutes: u32,
    remaining_seconds: u32,
    interval: Interval,
}

impl FocusTimer {
    pub fn new(configured_minutes: u32) -> Self {
        FocusTimer {
            configured_minutes: clamp_minutes(configured_minutes as i64),
            remaining_seconds: 0,
            interval: Interval::every_second(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_active()
    }

    pub fn configured_minutes(&self) -> u32 {
        self.configured_minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn start(&mut self, now: Instant) {
        self.remaining_seconds = self.configured_minutes * 60;
        self.interval.start(now);
        info!(minutes = self.configured_minutes, "focus session started");
    }

    /// Cancels the pending tick. Safe to call when idle.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!(remaining = self.remaining_seconds, "focus session stopped early");
        }
        self.interval.cancel();
        self.remaining_seconds = 0;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Shifts the configured duration by `delta` minutes, clamped to
    /// [MIN_FOCUS_MINUTES, MAX_FOCUS_MINUTES]. No-op while running.
    pub fn adjust(&mut self, delta: i32) {
        if self.is_running() {
            debug!(delta, "duration locked while running");
            return;
        }
        self.configured_minutes = clamp_minutes(self.configured_minutes as i64 + delta as i64);
        debug!(minutes = self.configured_minutes, "focus duration adjusted");
    }

    /// One decrement. Returns None when idle.
    pub fn on_tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running() {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.interval.cancel();
            info!(minutes = self.configured_minutes, "focus session completed");
            Some(TimerEvent::Completed)
        } else {
            Some(TimerEvent::Tick {
                remaining: self.remaining_seconds,
            })
        }
    }

    /// Time until the next decrement, or None when idle.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.interval.time_until_due(now)
    }

    /// Runs every tick due by `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let due = self.interval.poll(now);
        (0..due).filter_map(|_| self.on_tick()).collect()
    }

    /// "30 mins" when idle, "29m 59s" while counting down.
    pub fn display(&self) -> String {
        if self.is_running() {
            format!(
                "{}m {}s",
                self.remaining_seconds / 60,
                self.remaining_seconds % 60
            )
        } else {
            format!("{} mins", self.configured_minutes)
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running() {
            "⏸ Stop"
        } else {
            "▶ Focus"
        }
    }
}

pub(crate) fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(MIN_FOCUS_MINUTES as i64, MAX_FOCUS_MINUTES as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_new_clamps_configured_minutes() {
        assert_eq!(FocusTimer::new(0).configured_minutes(), 5);
        assert_eq!(FocusTimer::new(1000).configured_minutes(), 480);
        assert_eq!(FocusTimer::new(30).configured_minutes(), 30);
    }

    #[test]
    fn test_idle_display() {
        let timer = FocusTimer::new(30);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "30 mins");
        assert_eq!(timer.button_label(), "▶ Focus");
    }

    #[test]
    fn test_start_sets_remaining_and_runs() {
        let mut timer = FocusTimer::new(30);
        timer.start(Instant::now());
        assert!(timer.is_running());
        assert_eq!(timer.remaining_seconds(), 1800);
        assert_eq!(timer.display(), "30m 0s");
        assert_eq!(timer.button_label(), "⏸ Stop");
    }

    #[test]
    fn test_tick_updates_display() {
        let mut timer = FocusTimer::new(30);
        let t0 = Instant::now();
        timer.start(t0);
        let events = timer.poll(t0 + SEC);
        assert_eq!(events, vec![TimerEvent::Tick { remaining: 1799 }]);
        assert_eq!(timer.display(), "29m 59s");
    }

    #[test]
    fn test_five_minutes_runs_exactly_300_decrements() {
        let mut timer = FocusTimer::new(5);
        let t0 = Instant::now();
        timer.start(t0);
        let mut ticks = 0;
        let mut completions = 0;
        for s in 1..=400u32 {
            for event in timer.poll(t0 + s * SEC) {
                ticks += 1;
                if event == TimerEvent::Completed {
                    completions += 1;
                }
            }
        }
        assert_eq!(ticks, 300);
        assert_eq!(completions, 1);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "5 mins");
    }

    #[test]
    fn test_late_poll_completes_once() {
        let mut timer = FocusTimer::new(5);
        let t0 = Instant::now();
        timer.start(t0);
        let events = timer.poll(t0 + 1000 * SEC);
        assert_eq!(events.len(), 300);
        assert_eq!(events.last(), Some(&TimerEvent::Completed));
        assert_eq!(
            events.iter().filter(|e| **e == TimerEvent::Completed).count(),
            1
        );
        assert!(timer.poll(t0 + 2000 * SEC).is_empty());
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut timer = FocusTimer::new(30);
        let t0 = Instant::now();
        timer.start(t0);
        timer.poll(t0 + SEC);
        timer.stop();
        assert!(!timer.is_running());
        assert!(timer.poll(t0 + 10 * SEC).is_empty());
        assert_eq!(timer.on_tick(), None);
        assert_eq!(timer.display(), "30 mins");
        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_toggle_starts_and_stops() {
        let mut timer = FocusTimer::new(25);
        let t0 = Instant::now();
        timer.toggle(t0);
        assert!(timer.is_running());
        timer.toggle(t0 + SEC);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_restart_after_stop_uses_full_duration() {
        let mut timer = FocusTimer::new(10);
        let t0 = Instant::now();
        timer.start(t0);
        timer.poll(t0 + 5 * SEC);
        timer.stop();
        timer.start(t0 + 6 * SEC);
        assert_eq!(timer.remaining_seconds(), 600);
    }

    #[test]
    fn test_adjust_floor() {
        let mut timer = FocusTimer::new(10);
        for _ in 0..5 {
            timer.adjust(-5);
        }
        assert_eq!(timer.configured_minutes(), 5);
    }

    #[test]
    fn test_adjust_ceiling() {
        let mut timer = FocusTimer::new(478);
        for _ in 0..5 {
            timer.adjust(5);
        }
        assert_eq!(timer.configured_minutes(), 480);
    }

    #[test]
    fn test_adjust_ignored_while_running() {
        let mut timer = FocusTimer::new(30);
        timer.start(Instant::now());
        timer.adjust(5);
        assert_eq!(timer.configured_minutes(), 30);
        assert_eq!(timer.remaining_seconds(), 1800);
    }
}
