//! Value transitions over virtual time.

use std::time::Duration;

use enray_site_core::{Timestamp, duration_millis};

use super::easing::{Easing, ease};

/// Current state of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionState {
    /// No transition in progress.
    #[default]
    Idle,
    /// Transition is running.
    Running {
        /// Eased progress from 0.0 to 1.0.
        progress: f64,
        /// Interpolated value.
        value: f64,
    },
    /// The transition reached its end on this update.
    Finished {
        /// Final value.
        value: f64,
    },
}

impl TransitionState {
    /// Check if a transition is currently in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, TransitionState::Running { .. })
    }

    /// The value to apply for this frame, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            TransitionState::Running { value, .. } | TransitionState::Finished { value } => {
                Some(*value)
            }
            TransitionState::Idle => None,
        }
    }
}

/// A transition between two values over a fixed duration.
///
/// The transition never reads a clock; each [`update`](Self::update) is given
/// the current timestamp.
#[derive(Debug, Clone)]
pub struct Transition {
    easing: Easing,
    duration: Duration,
    start_time: Option<Timestamp>,
    from: f64,
    to: f64,
}

impl Transition {
    /// Create an idle transition with the given easing and duration.
    pub fn new(easing: Easing, duration: Duration) -> Self {
        Self {
            easing,
            duration,
            start_time: None,
            from: 0.0,
            to: 0.0,
        }
    }

    /// Get the easing function.
    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Get the transition duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Check if a transition is currently running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    /// Start (or restart) a transition from `from` to `to` at `now`.
    pub fn start(&mut self, now: Timestamp, from: f64, to: f64) {
        self.from = from;
        self.to = to;
        self.start_time = Some(now);
    }

    /// Stop the current transition immediately.
    pub fn stop(&mut self) {
        self.start_time = None;
    }

    /// Update the transition and get its current state.
    ///
    /// Should be called each frame while the transition is running. The frame
    /// that reaches the end reports [`TransitionState::Finished`] with the
    /// exact target value, after which the transition is idle.
    pub fn update(&mut self, now: Timestamp) -> TransitionState {
        let Some(start_time) = self.start_time else {
            return TransitionState::Idle;
        };

        let total = duration_millis(self.duration);
        let raw_progress = if total <= 0.0 {
            1.0
        } else {
            (now.millis_since(start_time) / total).min(1.0)
        };

        if raw_progress >= 1.0 {
            self.start_time = None;
            return TransitionState::Finished { value: self.to };
        }

        let progress = ease(self.easing, raw_progress);
        TransitionState::Running {
            progress,
            value: self.from + (self.to - self.from) * progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_idle_until_started() {
        let mut t = Transition::new(Easing::Linear, Duration::from_millis(100));
        assert!(!t.is_running());
        assert_eq!(t.update(ms(50.0)), TransitionState::Idle);
    }

    #[test]
    fn test_linear_progress() {
        let mut t = Transition::new(Easing::Linear, Duration::from_millis(200));
        t.start(ms(1000.0), 0.0, 50.0);

        let state = t.update(ms(1100.0));
        assert!(state.is_running());
        assert_eq!(state.value(), Some(25.0));

        assert_eq!(t.update(ms(1200.0)), TransitionState::Finished { value: 50.0 });
        assert!(!t.is_running());
        assert_eq!(t.update(ms(1300.0)), TransitionState::Idle);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut t = Transition::new(Easing::EaseOutCubic, Duration::ZERO);
        t.start(ms(0.0), 10.0, 20.0);
        assert_eq!(t.update(ms(0.0)), TransitionState::Finished { value: 20.0 });
    }

    #[test]
    fn test_restart_replaces() {
        let mut t = Transition::new(Easing::Linear, Duration::from_millis(100));
        t.start(ms(0.0), 0.0, 100.0);
        t.start(ms(50.0), 100.0, 0.0);
        assert_eq!(t.update(ms(100.0)).value(), Some(50.0));
    }
}
