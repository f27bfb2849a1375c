//! Timer handles.
//!
//! A [`Timer`] is a disposable one-shot or repeating schedule owned by the
//! component that needs it. The owner polls it from its `tick` with the
//! current [`Timestamp`]; there is no global timer registry, so dropping the
//! owner (or calling [`Timer::stop`]) is all the cleanup a timer needs.
//!
//! Starting a timer that is already running replaces its schedule, so a
//! component can never accumulate duplicate intervals.

use std::time::Duration;

use crate::logging::targets;
use crate::time::Timestamp;

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// A one-shot or repeating timer driven by externally supplied time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    /// When this timer should next fire, if it is active.
    next_fire: Option<Timestamp>,
    /// The interval for repeating timers (or the delay of a one-shot).
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
}

impl Timer {
    /// Create an inactive timer.
    pub const fn new() -> Self {
        Self {
            next_fire: None,
            interval: Duration::ZERO,
            kind: TimerKind::OneShot,
        }
    }

    /// Start (or restart) as a one-shot timer that fires `delay` after `now`.
    pub fn start_one_shot(&mut self, now: Timestamp, delay: Duration) {
        self.kind = TimerKind::OneShot;
        self.interval = delay;
        self.next_fire = Some(now + delay);
    }

    /// Start (or restart) as a repeating timer.
    ///
    /// The first fire occurs `interval` after `now`.
    pub fn start_repeating(&mut self, now: Timestamp, interval: Duration) {
        self.kind = TimerKind::Repeating;
        self.interval = interval;
        self.next_fire = Some(now + interval);
    }

    /// Stop the timer. Stopping an inactive timer is a no-op.
    pub fn stop(&mut self) {
        self.next_fire = None;
    }

    /// Check if the timer is scheduled.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.next_fire.is_some()
    }

    /// The kind of the most recent schedule.
    #[inline]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// The configured interval (or one-shot delay).
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the timer will next fire, if active.
    #[inline]
    pub fn next_fire(&self) -> Option<Timestamp> {
        self.next_fire
    }

    /// Time remaining until the next fire, if active.
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        self.next_fire.map(|due| due.duration_since(now))
    }

    /// Check whether the timer fires at `now`.
    ///
    /// Returns `true` at most once per call. One-shot timers deactivate after
    /// firing; repeating timers reschedule themselves `interval` after `now`.
    /// A repeating timer that fell several intervals behind fires once, not
    /// once per missed interval.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let Some(due) = self.next_fire else {
            return false;
        };
        if now < due {
            return false;
        }

        tracing::trace!(target: targets::TIMER, kind = ?self.kind, %due, %now, "timer fired");

        match self.kind {
            TimerKind::OneShot => self.next_fire = None,
            TimerKind::Repeating => {
                // A zero interval would fire on every poll; treat it as one frame.
                let interval = if self.interval.is_zero() {
                    Duration::from_millis(1)
                } else {
                    self.interval
                };
                self.next_fire = Some(now + interval);
            }
        }
        true
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(Timer: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timer = Timer::new();
        assert!(!timer.is_active());

        timer.start_one_shot(ms(0.0), Duration::from_millis(300));
        assert!(timer.is_active());
        assert!(!timer.poll(ms(299.0)));
        assert!(timer.poll(ms(300.0)));
        assert!(!timer.is_active());
        assert!(!timer.poll(ms(1000.0)));
    }

    #[test]
    fn test_repeating_reschedules() {
        let mut timer = Timer::new();
        timer.start_repeating(ms(0.0), Duration::from_millis(1600));

        assert!(!timer.poll(ms(1000.0)));
        assert!(timer.poll(ms(1600.0)));
        assert_eq!(timer.next_fire(), Some(ms(3200.0)));
        assert!(!timer.poll(ms(3000.0)));
        assert!(timer.poll(ms(3250.0)));
        assert!(timer.is_active());
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let mut timer = Timer::new();
        timer.start_repeating(ms(0.0), Duration::from_millis(100));
        timer.start_repeating(ms(50.0), Duration::from_millis(100));
        assert!(!timer.poll(ms(100.0)));
        assert!(timer.poll(ms(150.0)));
    }

    #[test]
    fn test_late_repeating_fires_once() {
        let mut timer = Timer::new();
        timer.start_repeating(ms(0.0), Duration::from_millis(16));
        assert!(timer.poll(ms(1000.0)));
        assert!(!timer.poll(ms(1000.0)));
    }

    #[test]
    fn test_stop() {
        let mut timer = Timer::new();
        timer.start_one_shot(ms(0.0), Duration::from_millis(10));
        timer.stop();
        assert!(!timer.poll(ms(20.0)));
        assert_eq!(timer.remaining(ms(0.0)), None);
    }
}
