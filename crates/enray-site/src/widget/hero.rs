//! Rotating hero text.
//!
//! [`HeroRotator`] cycles through a set of text blocks. The outgoing block
//! plays a leave animation while the incoming one becomes active, and the
//! container height follows the active block. Hovering or focusing the
//! rotator pauses it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Timer, Timestamp};

/// State of one text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Hidden,
    Active,
    /// Playing the leave animation.
    Leaving,
}

/// The page side of a [`HeroRotator`].
pub trait HeroSurface {
    /// Present a block state.
    fn set_block_state(&mut self, index: usize, state: BlockState);

    /// Content height of a block.
    fn block_height(&self, index: usize) -> f64;

    /// Set the container height.
    fn set_height(&mut self, height: f64);
}

/// Hero rotation timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Delay before the first rotation.
    pub first_delay_ms: u64,
    /// How long each block stays visible.
    pub visible_ms: u64,
    /// Length of the leave animation.
    pub animation_ms: u64,
    /// Extra time before the leaving state is cleared.
    pub cleanup_slack_ms: u64,
    /// Added to the block height for descenders.
    pub height_buffer: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            first_delay_ms: 700,
            visible_ms: 3600,
            animation_ms: 460,
            cleanup_slack_ms: 40,
            height_buffer: 4.0,
        }
    }
}

/// Why the rotator is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Pause {
    hover: bool,
    focus: bool,
}

impl Pause {
    fn any(self) -> bool {
        self.hover || self.focus
    }
}

/// Text block rotator.
#[derive(Debug)]
pub struct HeroRotator {
    config: HeroConfig,
    animation: Duration,
    states: Vec<BlockState>,
    active: usize,
    pause: Pause,
    cycle_timer: Timer,
    // Blocks whose leave animation is still running.
    leaving: Vec<(usize, Timer)>,
}

impl HeroRotator {
    /// Create a rotator over `block_count` blocks.
    ///
    /// Returns `None` with fewer than two blocks. `initially_active` is the
    /// first block already marked active in the page, if any. Reduced motion
    /// drops the leave animation.
    pub fn new(
        block_count: usize,
        initially_active: Option<usize>,
        reduced_motion: bool,
        config: HeroConfig,
    ) -> Option<Self> {
        if block_count < 2 {
            return None;
        }
        let active = initially_active.filter(|i| *i < block_count).unwrap_or(0);
        let mut states = vec![BlockState::Hidden; block_count];
        states[active] = BlockState::Active;
        let animation = if reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(config.animation_ms)
        };
        Some(Self {
            config,
            animation,
            states,
            active,
            pause: Pause::default(),
            cycle_timer: Timer::new(),
            leaving: Vec::new(),
        })
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn block_state(&self, index: usize) -> Option<BlockState> {
        self.states.get(index).copied()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.pause.any()
    }

    /// Sync the initial height and schedule the first rotation.
    pub fn start<S: HeroSurface>(&mut self, surface: &mut S, now: Timestamp) {
        self.sync_height(surface, self.active);
        self.cycle_timer
            .start_one_shot(now, Duration::from_millis(self.config.first_delay_ms));
    }

    fn sync_height<S: HeroSurface>(&self, surface: &mut S, index: usize) {
        surface.set_height(surface.block_height(index) + self.config.height_buffer);
    }

    fn set_state<S: HeroSurface>(&mut self, surface: &mut S, index: usize, state: BlockState) {
        self.states[index] = state;
        surface.set_block_state(index, state);
    }

    fn set_active<S: HeroSurface>(&mut self, surface: &mut S, now: Timestamp, next: usize) {
        let current = self.active;
        if current == next {
            return;
        }

        self.leaving.retain(|(index, _)| *index != next);
        self.set_state(surface, next, BlockState::Active);
        if self.animation.is_zero() {
            self.set_state(surface, current, BlockState::Hidden);
        } else {
            self.set_state(surface, current, BlockState::Leaving);
            let mut cleanup = Timer::new();
            cleanup.start_one_shot(
                now,
                self.animation + Duration::from_millis(self.config.cleanup_slack_ms),
            );
            self.leaving.push((current, cleanup));
        }
        self.sync_height(surface, next);
        self.active = next;
        tracing::trace!(target: targets::HERO, from = current, to = next, "hero rotated");
    }

    fn cycle<S: HeroSurface>(&mut self, surface: &mut S, now: Timestamp) {
        let next = (self.active + 1) % self.states.len();
        self.set_active(surface, now, next);
        self.cycle_timer.start_one_shot(
            now,
            Duration::from_millis(self.config.visible_ms) + self.animation,
        );
    }

    fn stop_cycle(&mut self) {
        self.cycle_timer.stop();
    }

    fn resume(&mut self, now: Timestamp) {
        self.cycle_timer
            .start_one_shot(now, Duration::from_millis(self.config.visible_ms));
    }

    pub fn pointer_entered(&mut self) {
        let was_paused = self.pause.any();
        self.pause.hover = true;
        if !was_paused {
            self.stop_cycle();
        }
    }

    pub fn pointer_left(&mut self, now: Timestamp) {
        let was_paused = self.pause.any();
        self.pause.hover = false;
        if was_paused && !self.pause.any() {
            self.resume(now);
        }
    }

    pub fn focus_entered(&mut self) {
        let was_paused = self.pause.any();
        self.pause.focus = true;
        if !was_paused {
            self.stop_cycle();
        }
    }

    /// Focus left an element; `still_inside` tells whether it moved to
    /// another element inside the rotator.
    pub fn focus_left(&mut self, now: Timestamp, still_inside: bool) {
        if still_inside {
            return;
        }
        let was_paused = self.pause.any();
        self.pause.focus = false;
        if was_paused && !self.pause.any() {
            self.resume(now);
        }
    }

    pub fn tick<S: HeroSurface>(&mut self, surface: &mut S, now: Timestamp) {
        let mut finished = Vec::new();
        self.leaving.retain_mut(|(index, timer)| {
            if timer.poll(now) {
                finished.push(*index);
                false
            } else {
                true
            }
        });
        for index in finished {
            if self.states[index] == BlockState::Leaving {
                self.set_state(surface, index, BlockState::Hidden);
            }
        }

        if self.cycle_timer.poll(now) {
            self.cycle(surface, now);
        }
    }
}
