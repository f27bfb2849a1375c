//! Drag-to-scroll with momentum.
//!
//! [`DragScroller`] turns pointer or touch movement over a horizontal track
//! into `scrollLeft` changes. On release with enough velocity it coasts: the
//! scroll position eases out over a fixed duration by a distance
//! proportional to the release velocity.
//!
//! A drag that travels further than the threshold arms *click suppression*:
//! the first click that follows is swallowed so that releasing a drag over a
//! card does not open it. The next press clears any unconsumed suppression.
//!
//! The pointer is only captured once a press becomes a drag. A press that
//! stays under the threshold leaves event targeting alone, so the click that
//! follows still reaches the card under the pointer.
//!
//! # State Machine
//!
//! ```text
//! Idle --press--> Pressed --move past threshold--> Dragging
//!   ^               |                                  |
//!   |            release                            release
//!   |               v                                  v
//!   +------------ Idle <---- coast finished ---- Coasting (fast release)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Signal, Timestamp};

use crate::animation::{Easing, Transition, TransitionState};

/// Scroll access for a draggable track.
pub trait DragSurface {
    /// Current horizontal scroll offset.
    fn scroll_left(&self) -> f64;

    /// Set the horizontal scroll offset immediately.
    fn set_scroll_left(&mut self, value: f64);

    /// Show or hide the dragging marker on the track.
    fn set_dragging(&mut self, dragging: bool);
}

/// Tuning for a [`DragScroller`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Horizontal travel (px) before a press becomes a drag.
    pub threshold: f64,
    /// Minimum release speed (px/ms) that starts a coast.
    pub min_velocity: f64,
    /// Coast distance per unit of release velocity.
    pub momentum_factor: f64,
    /// Coast duration in milliseconds.
    pub momentum_ms: u64,
    /// Time step assumed when two samples share a timestamp.
    pub fallback_dt_ms: f64,
}

impl DragConfig {
    /// Preset for the capability carousel.
    pub fn carousel() -> Self {
        Self {
            threshold: 12.0,
            min_velocity: 0.05,
            momentum_factor: 600.0,
            momentum_ms: 320,
            fallback_dt_ms: 16.0,
        }
    }

    /// Preset for product strips.
    pub fn strip() -> Self {
        Self {
            threshold: 4.0,
            min_velocity: 0.04,
            momentum_factor: 500.0,
            momentum_ms: 300,
            fallback_dt_ms: 16.0,
        }
    }

    pub fn momentum_duration(&self) -> Duration {
        Duration::from_millis(self.momentum_ms)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self::carousel()
    }
}

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer down, not yet past the threshold.
    Pressed,
    /// Following the pointer.
    Dragging,
    /// Momentum animation after release.
    Coasting,
}

/// Pointer drag-to-scroll controller for one track.
pub struct DragScroller {
    config: DragConfig,
    phase: DragPhase,
    start_x: f64,
    scroll_left_at_start: f64,
    last_x: f64,
    last_time: Timestamp,
    /// Pointer velocity in px/ms, positive when moving right.
    velocity: f64,
    drag_distance: f64,
    suppress_click: bool,
    capture_pending: bool,
    momentum: Transition,

    /// Emitted when a press crosses the drag threshold.
    pub drag_started: Signal<()>,
    /// Emitted when the pointer is released after a drag.
    pub drag_finished: Signal<()>,
}

impl DragScroller {
    pub fn new(config: DragConfig) -> Self {
        let momentum = Transition::new(Easing::EaseOutCubic, config.momentum_duration());
        Self {
            config,
            phase: DragPhase::Idle,
            start_x: 0.0,
            scroll_left_at_start: 0.0,
            last_x: 0.0,
            last_time: Timestamp::ZERO,
            velocity: 0.0,
            drag_distance: 0.0,
            suppress_click: false,
            capture_pending: false,
            momentum,
            drag_started: Signal::new(),
            drag_finished: Signal::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Whether the pointer is down (pressed or dragging).
    #[inline]
    pub fn is_pointer_down(&self) -> bool {
        matches!(self.phase, DragPhase::Pressed | DragPhase::Dragging)
    }

    /// Whether a drag past the threshold is in progress.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Whether a momentum coast is running.
    #[inline]
    pub fn is_coasting(&self) -> bool {
        self.phase == DragPhase::Coasting
    }

    /// Last sampled velocity in px/ms.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Absolute travel of the current gesture.
    #[inline]
    pub fn drag_distance(&self) -> f64 {
        self.drag_distance
    }

    /// Pointer pressed at `x`.
    ///
    /// Interrupts any running coast and clears unconsumed click suppression.
    pub fn press<S: DragSurface>(&mut self, surface: &S, x: f64, now: Timestamp) {
        self.momentum.stop();
        self.phase = DragPhase::Pressed;
        self.suppress_click = false;
        self.capture_pending = false;
        self.start_x = x;
        self.scroll_left_at_start = surface.scroll_left();
        self.last_x = x;
        self.last_time = now;
        self.velocity = 0.0;
        self.drag_distance = 0.0;
        tracing::trace!(target: targets::DRAG, x, scroll_left = self.scroll_left_at_start, "press");
    }

    /// Pointer moved to `x`.
    ///
    /// Returns `true` if the move was consumed by this scroller.
    pub fn move_to<S: DragSurface>(&mut self, surface: &mut S, x: f64, now: Timestamp) -> bool {
        if !self.is_pointer_down() {
            return false;
        }

        let dx = x - self.start_x;
        self.drag_distance = dx.abs();
        if self.phase == DragPhase::Pressed && self.drag_distance > self.config.threshold {
            self.phase = DragPhase::Dragging;
            self.suppress_click = true;
            self.capture_pending = true;
            surface.set_dragging(true);
            tracing::debug!(target: targets::DRAG, distance = self.drag_distance, "drag started");
            self.drag_started.emit(());
        }

        surface.set_scroll_left(self.scroll_left_at_start - dx);

        let mut dt = now.millis_since(self.last_time);
        if dt <= 0.0 {
            dt = self.config.fallback_dt_ms;
        }
        self.velocity = (x - self.last_x) / dt;
        self.last_x = x;
        self.last_time = now;
        true
    }

    /// Pointer released.
    ///
    /// Starts a coast when the release velocity exceeds the configured
    /// minimum. Returns `true` if a coast was started.
    pub fn release<S: DragSurface>(&mut self, surface: &mut S, now: Timestamp) -> bool {
        if !self.is_pointer_down() {
            return false;
        }

        let was_dragging = self.is_dragging();
        if was_dragging {
            surface.set_dragging(false);
        }

        let coasting = self.velocity.abs() > self.config.min_velocity;
        if coasting {
            let start = surface.scroll_left();
            let target = start - self.velocity * self.config.momentum_factor;
            self.momentum.start(now, start, target);
            self.phase = DragPhase::Coasting;
            tracing::debug!(target: targets::DRAG, velocity = self.velocity, start, target, "coasting");
        } else {
            self.phase = DragPhase::Idle;
        }

        self.drag_distance = 0.0;
        self.capture_pending = false;
        if was_dragging {
            self.drag_finished.emit(());
        }
        coasting
    }

    /// Abandon the gesture without momentum (pointer cancelled).
    pub fn cancel<S: DragSurface>(&mut self, surface: &mut S) {
        if self.is_dragging() {
            surface.set_dragging(false);
            self.drag_finished.emit(());
        }
        self.momentum.stop();
        self.phase = DragPhase::Idle;
        self.velocity = 0.0;
        self.drag_distance = 0.0;
        self.capture_pending = false;
    }

    /// Advance a running coast.
    pub fn tick<S: DragSurface>(&mut self, surface: &mut S, now: Timestamp) {
        if self.phase != DragPhase::Coasting {
            return;
        }
        match self.momentum.update(now) {
            TransitionState::Running { value, .. } => surface.set_scroll_left(value),
            TransitionState::Finished { value } => {
                surface.set_scroll_left(value);
                self.phase = DragPhase::Idle;
                self.velocity = 0.0;
            }
            TransitionState::Idle => self.phase = DragPhase::Idle,
        }
    }

    /// Consume click suppression.
    ///
    /// Returns `true` if the click should be swallowed because it ends a drag.
    pub fn take_click_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }

    /// Consume a pointer capture request.
    ///
    /// Returns `true` once per gesture, right after the press crosses the drag
    /// threshold.
    pub fn take_capture_request(&mut self) -> bool {
        std::mem::take(&mut self.capture_pending)
    }

    /// Whether the next click would be swallowed.
    #[inline]
    pub fn suppresses_click(&self) -> bool {
        self.suppress_click
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Track {
        scroll_left: f64,
        dragging: bool,
        dragging_changes: usize,
    }

    impl DragSurface for Track {
        fn scroll_left(&self) -> f64 {
            self.scroll_left
        }
        fn set_scroll_left(&mut self, value: f64) {
            self.scroll_left = value;
        }
        fn set_dragging(&mut self, dragging: bool) {
            self.dragging = dragging;
            self.dragging_changes += 1;
        }
    }

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_small_move_keeps_click() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 100.0, ms(0.0));
        assert!(drag.move_to(&mut track, 105.0, ms(100.0)));
        assert_eq!(drag.phase(), DragPhase::Pressed);
        assert_eq!(track.scroll_left, -5.0);
        drag.release(&mut track, ms(110.0));

        assert!(!drag.take_click_suppression());
        assert!(!track.dragging);
    }

    #[test]
    fn test_capture_only_after_threshold() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 100.0, ms(0.0));
        assert!(!drag.take_capture_request());
        drag.move_to(&mut track, 105.0, ms(50.0));
        assert!(!drag.take_capture_request());
        drag.release(&mut track, ms(60.0));
        assert!(!drag.take_capture_request());
        // the click lands on the card and is not swallowed
        assert!(!drag.take_click_suppression());

        drag.press(&track, 100.0, ms(100.0));
        drag.move_to(&mut track, 80.0, ms(150.0));
        assert!(drag.take_capture_request());
        drag.move_to(&mut track, 70.0, ms(160.0));
        assert!(!drag.take_capture_request());
    }

    #[test]
    fn test_drag_suppresses_one_click() {
        let mut track = Track {
            scroll_left: 200.0,
            ..Default::default()
        };
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 100.0, ms(0.0));
        drag.move_to(&mut track, 80.0, ms(1000.0));
        assert!(drag.is_dragging());
        assert!(track.dragging);
        assert_eq!(track.scroll_left, 220.0);

        drag.release(&mut track, ms(1010.0));
        assert!(!track.dragging);
        assert!(drag.take_click_suppression());
        assert!(!drag.take_click_suppression());
    }

    #[test]
    fn test_press_clears_stale_suppression() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::strip());

        drag.press(&track, 0.0, ms(0.0));
        drag.move_to(&mut track, 10.0, ms(500.0));
        drag.release(&mut track, ms(600.0));
        assert!(drag.suppresses_click());

        drag.press(&track, 0.0, ms(700.0));
        assert!(!drag.suppresses_click());
    }

    #[test]
    fn test_zero_dt_uses_fallback() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 0.0, ms(50.0));
        drag.move_to(&mut track, 8.0, ms(50.0));
        assert_eq!(drag.velocity(), 0.5);
    }

    #[test]
    fn test_fast_release_coasts_with_ease_out() {
        let mut track = Track {
            scroll_left: 500.0,
            ..Default::default()
        };
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 300.0, ms(0.0));
        drag.move_to(&mut track, 280.0, ms(16.0));
        drag.move_to(&mut track, 260.0, ms(32.0));
        // 20px over 16ms to the left
        assert_eq!(drag.velocity(), -1.25);
        assert_eq!(track.scroll_left, 540.0);

        assert!(drag.release(&mut track, ms(32.0)));
        assert!(drag.is_coasting());

        // Halfway through 320ms: 1 - 0.5^3 = 0.875 of 750px.
        drag.tick(&mut track, ms(192.0));
        assert!((track.scroll_left - (540.0 + 750.0 * 0.875)).abs() < 1e-9);

        drag.tick(&mut track, ms(400.0));
        assert_eq!(track.scroll_left, 1290.0);
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_slow_release_stops() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::carousel());

        drag.press(&track, 0.0, ms(0.0));
        drag.move_to(&mut track, 20.0, ms(1000.0));
        assert!(!drag.release(&mut track, ms(1000.0)));
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_press_interrupts_coast() {
        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::strip());

        drag.press(&track, 0.0, ms(0.0));
        drag.move_to(&mut track, 50.0, ms(10.0));
        assert!(drag.release(&mut track, ms(10.0)));

        drag.press(&track, 0.0, ms(20.0));
        let before = track.scroll_left;
        drag.tick(&mut track, ms(100.0));
        assert_eq!(track.scroll_left, before);
        assert_eq!(drag.phase(), DragPhase::Pressed);
    }

    #[test]
    fn test_signals() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut track = Track::default();
        let mut drag = DragScroller::new(DragConfig::carousel());
        let started = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(0));
        let s = started.clone();
        drag.drag_started.connect(move |_| s.set(s.get() + 1));
        let f = finished.clone();
        drag.drag_finished.connect(move |_| f.set(f.get() + 1));

        drag.press(&track, 0.0, ms(0.0));
        drag.move_to(&mut track, 30.0, ms(100.0));
        drag.move_to(&mut track, 40.0, ms(200.0));
        drag.release(&mut track, ms(1000.0));

        assert_eq!(started.get(), 1);
        assert_eq!(finished.get(), 1);
        assert_eq!(track.dragging_changes, 2);
    }
}
