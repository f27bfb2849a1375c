//! Continuously scrolling product strip.
//!
//! A marquee duplicates its item run once and scrolls the track at a constant
//! rate, jumping back by one loop width whenever the scroll position passes
//! it. Because the second run is a copy of the first, the jump is invisible.
//!
//! Scrolling only advances while the strip is in view and nobody is
//! interacting with it (hover, keyboard focus, or a press that has not yet
//! been released for [`MarqueeConfig::release_grace_ms`]).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Timer, Timestamp};

/// The page side of a marquee.
pub trait MarqueeSurface {
    /// Current native scroll offset of the track.
    fn scroll_left(&self) -> f64;

    /// Set the native scroll offset of the track.
    fn set_scroll_left(&mut self, value: f64);

    /// Append one copy of every original item to the track.
    fn clone_items(&mut self);

    /// Add the active marker to the track.
    fn set_active(&mut self);

    /// Widths of the original (non-cloned) items.
    fn item_widths(&self) -> Vec<f64>;

    /// Column gap between items.
    fn gap(&self) -> f64;
}

/// Track measurements taken before the marquee is attached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarqueeLayout {
    pub item_count: usize,
    pub scroll_width: f64,
    pub client_width: f64,
}

/// Why a strip was left static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeSkip {
    ReducedMotion,
    NoItems,
    TooFewItems,
    NoOverflow,
}

impl fmt::Display for MarqueeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MarqueeSkip::ReducedMotion => "reduced motion requested",
            MarqueeSkip::NoItems => "no items",
            MarqueeSkip::TooFewItems => "too few items",
            MarqueeSkip::NoOverflow => "track does not overflow",
        })
    }
}

/// Tuning for a [`MarqueeScroller`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Scroll rate in pixels per second.
    pub rate: f64,
    /// Strips with fewer items stay static.
    pub min_items: usize,
    /// Overflow slack in pixels.
    pub overflow_tolerance: f64,
    /// How long scrolling stays paused after a press is released.
    pub release_grace_ms: u64,
    /// Visible fraction of the strip that counts as in view.
    pub view_threshold: f64,
}

impl MarqueeConfig {
    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms)
    }
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            rate: 40.0,
            min_items: 4,
            overflow_tolerance: 4.0,
            release_grace_ms: 300,
            view_threshold: 0.2,
        }
    }
}

/// Continuous scroller for one strip.
pub struct MarqueeScroller {
    config: MarqueeConfig,
    loop_width: f64,
    // Sub-pixel position; the native offset may be rounded by the page.
    position: f64,
    last_written: f64,
    last_frame: Timestamp,
    hovered: bool,
    focused: bool,
    interacting: bool,
    in_view: bool,
    release_timer: Timer,
}

impl MarqueeScroller {
    /// Decide whether a strip animates, and if so set it up.
    ///
    /// On success the items have been cloned once and the track carries the
    /// active marker. The loop width is the scroll width before cloning.
    pub fn attach<S: MarqueeSurface>(
        surface: &mut S,
        layout: MarqueeLayout,
        reduced_motion: bool,
        config: MarqueeConfig,
        now: Timestamp,
    ) -> Result<Self, MarqueeSkip> {
        if reduced_motion {
            return Err(MarqueeSkip::ReducedMotion);
        }
        if layout.item_count == 0 {
            return Err(MarqueeSkip::NoItems);
        }
        if layout.scroll_width <= layout.client_width + config.overflow_tolerance {
            return Err(MarqueeSkip::NoOverflow);
        }
        if layout.item_count < config.min_items {
            return Err(MarqueeSkip::TooFewItems);
        }

        surface.clone_items();
        surface.set_active();
        let position = surface.scroll_left();

        tracing::debug!(
            target: targets::MARQUEE,
            items = layout.item_count,
            loop_width = layout.scroll_width,
            "marquee attached"
        );

        Ok(Self {
            config,
            loop_width: layout.scroll_width,
            position,
            last_written: position,
            last_frame: now,
            hovered: false,
            focused: false,
            interacting: false,
            in_view: false,
            release_timer: Timer::new(),
        })
    }

    #[inline]
    pub fn loop_width(&self) -> f64 {
        self.loop_width
    }

    /// Current scroll position, before any rounding by the page.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Whether the strip advances on the next frame.
    pub fn is_running(&self) -> bool {
        !self.hovered && !self.focused && !self.interacting && self.in_view
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn set_in_view(&mut self, in_view: bool) {
        self.in_view = in_view;
    }

    /// Mouse down or touch start on the track.
    pub fn pointer_down(&mut self) {
        self.interacting = true;
        self.release_timer.stop();
    }

    /// Mouse up or touch end anywhere on the page.
    pub fn pointer_up(&mut self, now: Timestamp) {
        if self.interacting {
            self.release_timer
                .start_one_shot(now, self.config.release_grace());
        }
    }

    /// Recompute the loop width from the original items.
    pub fn resize<S: MarqueeSurface>(&mut self, surface: &S) {
        let widths = surface.item_widths();
        if widths.is_empty() {
            return;
        }
        let total: f64 = widths.iter().sum();
        let loop_width = total + surface.gap() * (widths.len() - 1) as f64;
        if loop_width > 0.0 {
            tracing::trace!(target: targets::MARQUEE, loop_width, "loop width updated");
            self.loop_width = loop_width;
        }
    }

    /// Advance one frame.
    pub fn tick<S: MarqueeSurface>(&mut self, surface: &mut S, now: Timestamp) {
        let dt = now.millis_since(self.last_frame);
        self.last_frame = now;

        if self.release_timer.poll(now) {
            self.interacting = false;
        }
        if !self.is_running() {
            return;
        }

        // Adopt the page's offset when someone else moved it.
        let actual = surface.scroll_left();
        if (actual - self.last_written).abs() > 1.0 {
            self.position = actual;
        }

        self.position += self.config.rate * dt / 1000.0;
        if self.position >= self.loop_width {
            self.position = self.position.rem_euclid(self.loop_width);
        }

        surface.set_scroll_left(self.position);
        self.last_written = self.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Strip {
        scroll_left: f64,
        clones: usize,
        active: bool,
        widths: Vec<f64>,
        gap: f64,
    }

    impl MarqueeSurface for Strip {
        fn scroll_left(&self) -> f64 {
            self.scroll_left
        }
        fn set_scroll_left(&mut self, value: f64) {
            self.scroll_left = value;
        }
        fn clone_items(&mut self) {
            self.clones += 1;
        }
        fn set_active(&mut self) {
            self.active = true;
        }
        fn item_widths(&self) -> Vec<f64> {
            self.widths.clone()
        }
        fn gap(&self) -> f64 {
            self.gap
        }
    }

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn layout(items: usize, scroll_width: f64) -> MarqueeLayout {
        MarqueeLayout {
            item_count: items,
            scroll_width,
            client_width: 300.0,
        }
    }

    fn attach(strip: &mut Strip) -> MarqueeScroller {
        let mut marquee =
            MarqueeScroller::attach(strip, layout(6, 1000.0), false, MarqueeConfig::default(), ms(0.0))
                .unwrap();
        marquee.set_in_view(true);
        marquee
    }

    #[test]
    fn test_attach_skips() {
        let mut strip = Strip::default();
        let config = MarqueeConfig::default;
        let skip = |strip: &mut Strip, l, reduced| {
            MarqueeScroller::attach(strip, l, reduced, config(), ms(0.0)).err()
        };

        assert_eq!(skip(&mut strip, layout(6, 1000.0), true), Some(MarqueeSkip::ReducedMotion));
        assert_eq!(skip(&mut strip, layout(0, 1000.0), false), Some(MarqueeSkip::NoItems));
        assert_eq!(skip(&mut strip, layout(3, 1000.0), false), Some(MarqueeSkip::TooFewItems));
        assert_eq!(skip(&mut strip, layout(6, 304.0), false), Some(MarqueeSkip::NoOverflow));
        assert_eq!(strip.clones, 0);
        assert!(!strip.active);

        assert_eq!(skip(&mut strip, layout(4, 305.0), false), None);
        assert_eq!(strip.clones, 1);
        assert!(strip.active);
    }

    #[test]
    fn test_scrolls_at_rate_when_in_view() {
        let mut strip = Strip::default();
        let mut marquee =
            MarqueeScroller::attach(&mut strip, layout(6, 1000.0), false, MarqueeConfig::default(), ms(0.0))
                .unwrap();

        marquee.tick(&mut strip, ms(500.0));
        assert_eq!(strip.scroll_left, 0.0);

        marquee.set_in_view(true);
        marquee.tick(&mut strip, ms(1000.0));
        assert_eq!(strip.scroll_left, 20.0);
    }

    #[test]
    fn test_loop_invariant() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);

        let mut now = 0.0;
        for _ in 0..5000 {
            now += 16.0;
            marquee.tick(&mut strip, ms(now));
            assert!(strip.scroll_left >= 0.0);
            assert!(strip.scroll_left < marquee.loop_width());
        }
        // 80 seconds at 40px/s is 3200px, three full loops plus 200.
        assert!((marquee.position() - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_crossing_subtracts_loop_width() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);
        strip.scroll_left = 990.0;

        marquee.tick(&mut strip, ms(500.0));
        assert!((strip.scroll_left - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sub_pixel_progress_survives_rounding() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);

        // Half a pixel per frame, floored by the page every time.
        let mut now = 0.0;
        for _ in 0..100 {
            now += 12.5;
            marquee.tick(&mut strip, ms(now));
            strip.scroll_left = strip.scroll_left.floor();
        }
        assert_eq!(strip.scroll_left, 50.0);
    }

    #[test]
    fn test_hover_and_focus_pause() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);

        marquee.set_hovered(true);
        marquee.tick(&mut strip, ms(1000.0));
        assert_eq!(strip.scroll_left, 0.0);

        marquee.set_hovered(false);
        marquee.set_focused(true);
        marquee.tick(&mut strip, ms(2000.0));
        assert_eq!(strip.scroll_left, 0.0);

        marquee.set_focused(false);
        marquee.tick(&mut strip, ms(2500.0));
        assert_eq!(strip.scroll_left, 20.0);
    }

    #[test]
    fn test_release_grace() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);

        marquee.pointer_down();
        marquee.pointer_up(ms(100.0));
        marquee.tick(&mut strip, ms(399.0));
        assert!(marquee.is_interacting());
        assert_eq!(strip.scroll_left, 0.0);

        marquee.tick(&mut strip, ms(400.0));
        assert!(!marquee.is_interacting());
        assert!((strip.scroll_left - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_user_scroll_is_adopted() {
        let mut strip = Strip::default();
        let mut marquee = attach(&mut strip);
        marquee.tick(&mut strip, ms(1000.0));

        strip.scroll_left = 500.0;
        marquee.tick(&mut strip, ms(1500.0));
        assert_eq!(strip.scroll_left, 520.0);
    }

    #[test]
    fn test_resize_recomputes_loop_width() {
        let mut strip = Strip {
            widths: vec![200.0, 200.0, 250.0, 150.0],
            gap: 12.0,
            ..Default::default()
        };
        let mut marquee = attach(&mut strip);
        marquee.resize(&strip);
        assert_eq!(marquee.loop_width(), 836.0);
    }
}
