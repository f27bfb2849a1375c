//! Auto-advancing image slideshow with dot navigation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Timer, Timestamp};

use super::input::{Direction, Key};

/// The page side of a [`Slideshow`].
pub trait SlideshowSurface {
    /// Create one dot per slide, `active` marked.
    fn render_dots(&mut self, count: usize, active: usize);

    /// Mark the active slide and dot, and translate the track by
    /// `offset_percent` of its width.
    fn show_slide(&mut self, index: usize, offset_percent: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    pub interval_ms: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self { interval_ms: 3000 }
    }
}

#[derive(Debug)]
pub struct Slideshow {
    len: usize,
    index: usize,
    autoplay: bool,
    interval: Duration,
    timer: Timer,
}

impl Slideshow {
    /// Returns `None` for an empty slideshow. Reduced motion disables autoplay.
    pub fn new(
        len: usize,
        initially_active: Option<usize>,
        reduced_motion: bool,
        config: &SlideshowConfig,
    ) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            len,
            index: initially_active.filter(|i| *i < len).unwrap_or(0),
            autoplay: !reduced_motion,
            interval: Duration::from_millis(config.interval_ms),
            timer: Timer::new(),
        })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.timer.is_active()
    }

    /// Render dots, show the initial slide and start autoplay.
    pub fn attach<S: SlideshowSurface>(&mut self, surface: &mut S, now: Timestamp) {
        surface.render_dots(self.len, self.index);
        self.show(surface);
        self.start(now);
    }

    fn show<S: SlideshowSurface>(&self, surface: &mut S) {
        surface.show_slide(self.index, -(self.index as f64) * 100.0);
    }

    /// Show slide `index`, wrapping.
    pub fn go_to<S: SlideshowSurface>(&mut self, surface: &mut S, index: usize) {
        self.index = index % self.len;
        self.show(surface);
    }

    pub fn step<S: SlideshowSurface>(&mut self, surface: &mut S, direction: Direction) {
        let index = direction.wrap(self.index, self.len);
        self.go_to(surface, index);
    }

    /// Start autoplay, replacing any running schedule.
    pub fn start(&mut self, now: Timestamp) {
        if self.autoplay {
            self.timer.start_repeating(now, self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Navigate by user action and restart autoplay.
    pub fn navigate<S: SlideshowSurface>(&mut self, surface: &mut S, now: Timestamp, direction: Direction) {
        self.step(surface, direction);
        self.start(now);
    }

    /// A dot was clicked.
    pub fn dot_clicked<S: SlideshowSurface>(&mut self, surface: &mut S, now: Timestamp, index: usize) {
        self.go_to(surface, index);
        self.start(now);
    }

    /// Arrow keys navigate. Returns `true` if the key was handled.
    pub fn handle_key<S: SlideshowSurface>(&mut self, surface: &mut S, now: Timestamp, key: Key) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.navigate(surface, now, direction);
                true
            }
            None => false,
        }
    }

    pub fn tick<S: SlideshowSurface>(&mut self, surface: &mut S, now: Timestamp) {
        if self.timer.poll(now) {
            self.step(surface, Direction::Next);
            tracing::trace!(target: targets::SLIDESHOW, index = self.index, "slide advanced");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Slides {
        dots: usize,
        shown: Vec<(usize, f64)>,
    }

    impl SlideshowSurface for Slides {
        fn render_dots(&mut self, count: usize, _active: usize) {
            self.dots = count;
        }
        fn show_slide(&mut self, index: usize, offset_percent: f64) {
            self.shown.push((index, offset_percent));
        }
    }

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_autoplay_and_restart() {
        let mut page = Slides::default();
        let mut show = Slideshow::new(3, None, false, &SlideshowConfig::default()).unwrap();
        show.attach(&mut page, ms(0.0));
        assert_eq!(page.dots, 3);
        assert_eq!(page.shown, vec![(0, 0.0)]);

        show.tick(&mut page, ms(3000.0));
        assert_eq!(page.shown.last(), Some(&(1, -100.0)));

        // Navigation restarts the interval.
        assert!(show.handle_key(&mut page, ms(4000.0), Key::ArrowLeft));
        assert_eq!(show.index(), 0);
        show.tick(&mut page, ms(6000.0));
        assert_eq!(show.index(), 0);
        show.tick(&mut page, ms(7000.0));
        assert_eq!(show.index(), 1);

        show.dot_clicked(&mut page, ms(7100.0), 2);
        show.navigate(&mut page, ms(7200.0), Direction::Next);
        assert_eq!(show.index(), 0);
    }

    #[test]
    fn test_hover_stops_and_reduced_motion() {
        let mut page = Slides::default();
        let mut show = Slideshow::new(2, Some(1), false, &SlideshowConfig::default()).unwrap();
        show.attach(&mut page, ms(0.0));
        show.stop();
        show.tick(&mut page, ms(9000.0));
        assert_eq!(show.index(), 1);

        let mut still = Slideshow::new(2, None, true, &SlideshowConfig::default()).unwrap();
        still.attach(&mut page, ms(0.0));
        assert!(!still.is_playing());
        assert!(Slideshow::new(0, None, false, &SlideshowConfig::default()).is_none());
    }
}
