//! Auto-advancing card carousel.
//!
//! [`CapabilityCarousel`] keeps one card of a horizontally scrolling track
//! highlighted and advances the highlight on a fixed interval while the
//! section is on screen, centering the highlighted card with a smooth scroll.
//!
//! The same component drives the product carousels through
//! [`CarouselConfig::product`]: short tracks are merely center-aligned, and
//! longer ones get page arrows that scroll by roughly a screenful instead of
//! stepping the highlight.
//!
//! # Pausing
//!
//! Auto-advance runs only while no [`PauseReason`] is active. Each reason is
//! set and cleared independently, so for example releasing a drag while the
//! pointer is still over the track keeps the carousel paused.
//!
//! # Signals
//!
//! - `focus_changed(usize)`: the highlighted card changed

use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Rect, Signal, Timer, Timestamp};

use super::input::{Direction, Key};

/// Layout of the scrolling track, as measured by the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackMetrics {
    /// Track bounds in the viewport.
    pub rect: Rect,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Column gap between cards.
    pub gap: f64,
}

impl TrackMetrics {
    /// Largest native scroll offset.
    #[inline]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// Presentation of a prev/next arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowState {
    /// Clickable.
    #[default]
    Enabled,
    /// At the first or last card; rendered dimmed and ignores clicks.
    AtBoundary,
    /// Not shown.
    Hidden,
}

/// The page side of a carousel.
pub trait CarouselSurface {
    /// Add or remove the highlight marker on a card.
    fn set_card_highlighted(&mut self, index: usize, highlighted: bool);

    /// Bounds of the enclosing section, if there is one.
    fn section_rect(&self) -> Option<Rect>;

    /// Height of the layout viewport.
    fn viewport_height(&self) -> f64;

    /// Current track layout.
    fn track_metrics(&self) -> TrackMetrics;

    /// Bounds of a card in the viewport.
    fn card_rect(&self, index: usize) -> Option<Rect>;

    /// Smoothly scroll the track by `delta` pixels.
    fn scroll_track_by(&mut self, delta: f64);

    /// Present the arrow states.
    fn set_arrow_states(&mut self, prev: ArrowState, next: ArrowState);

    /// Mark a track that is too short to animate as center-aligned.
    fn set_center_aligned(&mut self);
}

/// What arrows do at the ends of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowPolicy {
    /// Do nothing at the boundary.
    #[default]
    Clamp,
    /// Wrap around to the other end.
    Wrap,
}

/// What an arrow click moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowMode {
    /// Step the highlight by one card.
    #[default]
    Step,
    /// Scroll the track by a page.
    Page,
}

/// Why auto-advance is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// Pointer over the track or a card.
    Hover,
    /// Keyboard focus inside the track.
    Focus,
    /// A drag is in progress.
    Drag,
    /// An arrow was clicked; cleared by the resume timer.
    Manual,
    /// The section is outside the viewport.
    Offscreen,
}

impl PauseReason {
    const fn bit(self) -> u8 {
        match self {
            PauseReason::Hover => 1,
            PauseReason::Focus => 1 << 1,
            PauseReason::Drag => 1 << 2,
            PauseReason::Manual => 1 << 3,
            PauseReason::Offscreen => 1 << 4,
        }
    }
}

/// A set of active [`PauseReason`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PauseReasons(u8);

impl PauseReasons {
    pub fn insert(&mut self, reason: PauseReason) {
        self.0 |= reason.bit();
    }

    pub fn remove(&mut self, reason: PauseReason) {
        self.0 &= !reason.bit();
    }

    pub fn contains(&self, reason: PauseReason) -> bool {
        self.0 & reason.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Tuning for a [`CapabilityCarousel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Auto-advance interval.
    pub interval_ms: u64,
    /// Delay before auto-advance resumes after an arrow click.
    pub resume_ms: u64,
    /// Delay of the one-time advance when the section first appears.
    pub nudge_ms: u64,
    /// Extra scroll allowed past either end so edge cards are not clipped.
    pub safe_margin: f64,
    pub arrow_policy: ArrowPolicy,
    pub arrow_mode: ArrowMode,
    /// Tracks with at most this many cards are only center-aligned.
    pub passive_max_cards: Option<usize>,
    /// Fraction of the visible width a page arrow scrolls at least.
    pub page_fraction: f64,
    /// Slack before a track counts as overflowing.
    pub overflow_tolerance: f64,
    /// Drop the highlight when keyboard focus leaves the track.
    pub clear_highlight_on_blur: bool,
    /// Highlight the card that receives keyboard focus.
    pub follow_keyboard_focus: bool,
}

impl CarouselConfig {
    /// Preset for the capability carousel.
    pub fn capability() -> Self {
        Self {
            interval_ms: 1600,
            resume_ms: 2500,
            nudge_ms: 150,
            safe_margin: 24.0,
            arrow_policy: ArrowPolicy::Clamp,
            arrow_mode: ArrowMode::Step,
            passive_max_cards: None,
            page_fraction: 0.6,
            overflow_tolerance: 2.0,
            clear_highlight_on_blur: true,
            follow_keyboard_focus: true,
        }
    }

    /// Preset for product carousels.
    pub fn product() -> Self {
        Self {
            interval_ms: 1800,
            resume_ms: 1200,
            arrow_mode: ArrowMode::Page,
            passive_max_cards: Some(5),
            clear_highlight_on_blur: false,
            follow_keyboard_focus: false,
            ..Self::capability()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_ms)
    }

    pub fn nudge_delay(&self) -> Duration {
        Duration::from_millis(self.nudge_ms)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::capability()
    }
}

/// Scroll distance of one page arrow click.
///
/// At least one card plus gap, or the given fraction of the visible width,
/// whichever is larger. Without a card, 70% of the visible width.
pub fn page_scroll_amount(metrics: &TrackMetrics, card_width: Option<f64>, fraction: f64) -> f64 {
    match card_width {
        Some(width) => (width + metrics.gap)
            .ceil()
            .max((metrics.client_width * fraction).floor()),
        None => (metrics.client_width * 0.7).floor(),
    }
}

/// Carousel controller for one track.
pub struct CapabilityCarousel {
    config: CarouselConfig,
    card_count: usize,
    focus_index: usize,
    highlighted: bool,
    passive: bool,
    paused: PauseReasons,
    started_on_view: bool,
    auto_timer: Timer,
    resume_timer: Timer,
    nudge_timer: Timer,
    arrows: Option<(ArrowState, ArrowState)>,

    /// Emitted with the new index whenever the highlighted card changes.
    pub focus_changed: Signal<usize>,
}

impl CapabilityCarousel {
    pub fn new(card_count: usize, config: CarouselConfig) -> Self {
        let passive = config
            .passive_max_cards
            .is_some_and(|max| card_count <= max);
        let mut paused = PauseReasons::default();
        paused.insert(PauseReason::Offscreen);
        Self {
            config,
            card_count,
            focus_index: 0,
            highlighted: false,
            passive,
            paused,
            started_on_view: false,
            auto_timer: Timer::new(),
            resume_timer: Timer::new(),
            nudge_timer: Timer::new(),
            arrows: None,
            focus_changed: Signal::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[inline]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    #[inline]
    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    /// Whether the focused card currently shows the highlight marker.
    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Whether this track is too short to animate.
    #[inline]
    pub fn is_passive(&self) -> bool {
        self.passive
    }

    #[inline]
    pub fn pause_reasons(&self) -> PauseReasons {
        self.paused
    }

    /// Whether the auto-advance interval is scheduled.
    #[inline]
    pub fn is_auto_focus_running(&self) -> bool {
        self.auto_timer.is_active()
    }

    /// Whether the track gets interactive behavior at all.
    pub fn has_behavior(&self) -> bool {
        self.card_count > 0 && !self.passive
    }

    fn can_auto_focus(&self) -> bool {
        self.has_behavior() && self.card_count > 1
    }

    /// Initial presentation: highlight the first card without scrolling.
    pub fn attach<S: CarouselSurface>(&mut self, surface: &mut S) {
        if self.passive {
            tracing::debug!(target: targets::CAROUSEL, cards = self.card_count, "short track, center-aligned");
            surface.set_center_aligned();
            return;
        }
        if self.card_count == 0 {
            return;
        }
        for index in 1..self.card_count {
            surface.set_card_highlighted(index, false);
        }
        self.set_focus(surface, 0, false);
        self.sync_arrows(surface);
    }

    /// Highlight card `index`, optionally centering it in the track.
    ///
    /// Scrolling happens only when the section is at least partly on screen
    /// and no drag is in progress.
    pub fn set_focus<S: CarouselSurface>(&mut self, surface: &mut S, index: usize, scroll: bool) {
        if !self.has_behavior() {
            return;
        }
        let index = index.min(self.card_count - 1);

        if self.highlighted && self.focus_index != index {
            surface.set_card_highlighted(self.focus_index, false);
        }
        surface.set_card_highlighted(index, true);
        self.highlighted = true;
        self.focus_index = index;

        if scroll {
            self.scroll_to_card(surface, index);
        }
        self.focus_changed.emit(index);
    }

    /// Advance the highlight by one card, wrapping, with scrolling.
    pub fn advance<S: CarouselSurface>(&mut self, surface: &mut S) {
        if !self.has_behavior() {
            return;
        }
        let next = Direction::Next.wrap(self.focus_index, self.card_count);
        tracing::debug!(target: targets::CAROUSEL, from = self.focus_index, to = next, "advance");
        self.set_focus(surface, next, true);
    }

    /// Remove the highlight marker without forgetting the focus index.
    pub fn clear_highlight<S: CarouselSurface>(&mut self, surface: &mut S) {
        if self.highlighted {
            surface.set_card_highlighted(self.focus_index, false);
            self.highlighted = false;
        }
    }

    fn section_visible<S: CarouselSurface>(surface: &S) -> bool {
        let viewport = surface.viewport_height();
        surface
            .section_rect()
            .is_some_and(|rect| rect.intersects_viewport(viewport))
    }

    fn scroll_to_card<S: CarouselSurface>(&self, surface: &mut S, index: usize) {
        if self.paused.contains(PauseReason::Drag) || !Self::section_visible(surface) {
            return;
        }
        let Some(card) = surface.card_rect(index) else {
            return;
        };
        let metrics = surface.track_metrics();

        let delta = card.center_x() - metrics.rect.center_x();
        let min_target = -metrics.padding_left - self.config.safe_margin;
        let max_target = metrics.max_scroll() + metrics.padding_right + self.config.safe_margin;
        let target = (metrics.scroll_left + delta).min(max_target).max(min_target);

        let by = target - metrics.scroll_left;
        if by != 0.0 {
            surface.scroll_track_by(by);
        }
    }

    /// Start (or restart) the auto-advance interval.
    pub fn start_auto_focus(&mut self, now: Timestamp) {
        if self.can_auto_focus() {
            self.auto_timer.start_repeating(now, self.config.interval());
        }
    }

    /// Stop the auto-advance interval.
    pub fn stop_auto_focus(&mut self) {
        self.auto_timer.stop();
    }

    /// The section entered or left the viewport.
    pub fn set_in_view(&mut self, now: Timestamp, visible: bool) {
        if !self.has_behavior() {
            return;
        }
        if !visible {
            self.paused.insert(PauseReason::Offscreen);
            return;
        }

        self.paused.remove(PauseReason::Offscreen);
        if !self.auto_timer.is_active() && !self.paused.contains(PauseReason::Hover) {
            self.start_auto_focus(now);
        }
        if !self.started_on_view {
            self.started_on_view = true;
            self.nudge_timer.start_one_shot(now, self.config.nudge_delay());
        }
    }

    /// Pointer entered the track.
    pub fn pointer_entered_track(&mut self) {
        self.paused.insert(PauseReason::Hover);
        self.auto_timer.stop();
    }

    /// Pointer left the track.
    pub fn pointer_left_track(&mut self, now: Timestamp) {
        self.paused.remove(PauseReason::Hover);
        self.start_auto_focus(now);
    }

    /// Pointer entered a card: highlight it in place.
    pub fn pointer_entered_card<S: CarouselSurface>(&mut self, surface: &mut S, index: usize) {
        self.paused.insert(PauseReason::Hover);
        self.set_focus(surface, index, false);
    }

    /// Keyboard focus entered the track, landing on `card` if it is a card.
    pub fn focus_entered<S: CarouselSurface>(&mut self, surface: &mut S, card: Option<usize>) {
        self.paused.insert(PauseReason::Focus);
        if self.config.follow_keyboard_focus
            && let Some(index) = card
        {
            self.set_focus(surface, index, false);
        }
    }

    /// Keyboard focus moved outside the track.
    pub fn focus_left_track<S: CarouselSurface>(&mut self, surface: &mut S, now: Timestamp) {
        self.paused.remove(PauseReason::Focus);
        self.start_auto_focus(now);
        if self.config.clear_highlight_on_blur {
            self.clear_highlight(surface);
        }
    }

    /// A drag on the track started or finished.
    pub fn set_dragging(&mut self, dragging: bool) {
        if dragging {
            self.paused.insert(PauseReason::Drag);
        } else {
            self.paused.remove(PauseReason::Drag);
        }
    }

    fn pause_and_resume_later(&mut self, now: Timestamp) {
        self.paused.insert(PauseReason::Manual);
        self.auto_timer.stop();
        self.resume_timer.start_one_shot(now, self.config.resume_delay());
    }

    /// An arrow was clicked.
    ///
    /// Returns `true` if the click moved the carousel.
    pub fn arrow<S: CarouselSurface>(&mut self, surface: &mut S, now: Timestamp, direction: Direction) -> bool {
        if !self.has_behavior() {
            return false;
        }

        match self.config.arrow_mode {
            ArrowMode::Step => {
                let last = self.card_count - 1;
                let target = match (self.config.arrow_policy, direction) {
                    (ArrowPolicy::Clamp, Direction::Previous) if self.focus_index == 0 => return false,
                    (ArrowPolicy::Clamp, Direction::Next) if self.focus_index >= last => return false,
                    (ArrowPolicy::Clamp, Direction::Previous) => self.focus_index - 1,
                    (ArrowPolicy::Clamp, Direction::Next) => self.focus_index + 1,
                    (ArrowPolicy::Wrap, direction) => direction.wrap(self.focus_index, self.card_count),
                };
                self.pause_and_resume_later(now);
                self.set_focus(surface, target, true);
            }
            ArrowMode::Page => {
                self.pause_and_resume_later(now);
                let metrics = surface.track_metrics();
                let card_width = surface.card_rect(0).map(|rect| rect.width);
                let amount = page_scroll_amount(&metrics, card_width, self.config.page_fraction);
                let delta = match direction {
                    Direction::Previous => -amount,
                    Direction::Next => amount,
                };
                tracing::debug!(target: targets::CAROUSEL, delta, "page scroll");
                surface.scroll_track_by(delta);
            }
        }
        self.sync_arrows(surface);
        true
    }

    /// ArrowLeft/ArrowRight on the carousel wrapper.
    ///
    /// Returns `true` if the key was handled.
    pub fn handle_key<S: CarouselSurface>(&mut self, surface: &mut S, now: Timestamp, key: Key) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.arrow(surface, now, direction);
                true
            }
            None => false,
        }
    }

    /// Compute and present arrow states, touching the page only on change.
    pub fn sync_arrows<S: CarouselSurface>(&mut self, surface: &mut S) {
        if !self.has_behavior() {
            return;
        }
        let states = match self.config.arrow_mode {
            ArrowMode::Step => match self.config.arrow_policy {
                ArrowPolicy::Clamp => (
                    if self.focus_index == 0 {
                        ArrowState::AtBoundary
                    } else {
                        ArrowState::Enabled
                    },
                    if self.focus_index + 1 >= self.card_count {
                        ArrowState::AtBoundary
                    } else {
                        ArrowState::Enabled
                    },
                ),
                ArrowPolicy::Wrap => (ArrowState::Enabled, ArrowState::Enabled),
            },
            ArrowMode::Page => {
                let metrics = surface.track_metrics();
                let state = if metrics.scroll_width > metrics.client_width + self.config.overflow_tolerance {
                    ArrowState::Enabled
                } else {
                    ArrowState::Hidden
                };
                (state, state)
            }
        };

        if self.arrows != Some(states) {
            self.arrows = Some(states);
            surface.set_arrow_states(states.0, states.1);
        }
    }

    /// Drive timers.
    pub fn tick<S: CarouselSurface>(&mut self, surface: &mut S, now: Timestamp) {
        if !self.has_behavior() {
            return;
        }

        if self.resume_timer.poll(now) {
            self.paused.remove(PauseReason::Manual);
            self.start_auto_focus(now);
        }

        if self.nudge_timer.poll(now) && self.card_count > 1 {
            self.advance(surface);
        }

        if self.auto_timer.poll(now) && self.paused.is_empty() && Self::section_visible(surface) {
            self.advance(surface);
        }

        self.sync_arrows(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Page {
        highlighted: Vec<bool>,
        section: Option<Rect>,
        metrics: TrackMetrics,
        card_width: f64,
        scrolls: Vec<f64>,
        arrows: Vec<(ArrowState, ArrowState)>,
        center_aligned: bool,
    }

    impl Page {
        fn new(cards: usize) -> Self {
            Self {
                highlighted: vec![false; cards],
                section: Some(Rect::new(0.0, 100.0, 1000.0, 400.0)),
                metrics: TrackMetrics {
                    rect: Rect::new(0.0, 150.0, 1000.0, 300.0),
                    scroll_left: 0.0,
                    scroll_width: 300.0 * cards as f64,
                    client_width: 1000.0,
                    padding_left: 10.0,
                    padding_right: 10.0,
                    gap: 20.0,
                },
                card_width: 280.0,
                scrolls: Vec::new(),
                arrows: Vec::new(),
                center_aligned: false,
            }
        }

        fn marked(&self) -> Vec<usize> {
            self.highlighted
                .iter()
                .enumerate()
                .filter_map(|(i, h)| h.then_some(i))
                .collect()
        }
    }

    impl CarouselSurface for Page {
        fn set_card_highlighted(&mut self, index: usize, highlighted: bool) {
            self.highlighted[index] = highlighted;
        }
        fn section_rect(&self) -> Option<Rect> {
            self.section
        }
        fn viewport_height(&self) -> f64 {
            800.0
        }
        fn track_metrics(&self) -> TrackMetrics {
            self.metrics
        }
        fn card_rect(&self, index: usize) -> Option<Rect> {
            let x = index as f64 * 300.0 - self.metrics.scroll_left;
            Some(Rect::new(x, 150.0, self.card_width, 300.0))
        }
        fn scroll_track_by(&mut self, delta: f64) {
            self.scrolls.push(delta);
            self.metrics.scroll_left += delta;
        }
        fn set_arrow_states(&mut self, prev: ArrowState, next: ArrowState) {
            self.arrows.push((prev, next));
        }
        fn set_center_aligned(&mut self) {
            self.center_aligned = true;
        }
    }

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_focus_wraps_after_advances() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::capability());
        carousel.attach(&mut page);

        for _ in 0..7 {
            carousel.advance(&mut page);
        }
        assert_eq!(carousel.focus_index(), 2);
        assert_eq!(page.marked(), vec![2]);
    }

    #[test]
    fn test_single_marker_invariant() {
        let mut page = Page::new(4);
        page.highlighted = vec![true, true, false, true];
        let mut carousel = CapabilityCarousel::new(4, CarouselConfig::capability());
        carousel.attach(&mut page);
        assert_eq!(page.marked(), vec![0]);

        carousel.pointer_entered_card(&mut page, 3);
        assert_eq!(page.marked(), vec![3]);
        assert!(page.scrolls.is_empty());
    }

    #[test]
    fn test_centering_scroll_is_clamped() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::capability());
        carousel.attach(&mut page);

        // Card 1 center 440, track center 500: -60 clamps to -(10 + 24).
        carousel.set_focus(&mut page, 1, true);
        assert_eq!(page.scrolls, vec![-34.0]);
        assert_eq!(page.metrics.scroll_left, -34.0);

        // Target 840 clamps to 500 + 10 + 24.
        carousel.set_focus(&mut page, 4, true);
        assert_eq!(page.metrics.scroll_left, 534.0);
    }

    #[test]
    fn test_no_scroll_offscreen_or_dragging() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::capability());
        carousel.attach(&mut page);

        page.section = Some(Rect::new(0.0, 900.0, 1000.0, 400.0));
        carousel.set_focus(&mut page, 3, true);
        assert!(page.scrolls.is_empty());

        page.section = Some(Rect::new(0.0, 100.0, 1000.0, 400.0));
        carousel.set_dragging(true);
        carousel.set_focus(&mut page, 4, true);
        assert!(page.scrolls.is_empty());
        assert_eq!(carousel.focus_index(), 4);
    }

    #[test]
    fn test_auto_focus_with_nudge() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::capability());
        carousel.attach(&mut page);

        carousel.tick(&mut page, ms(1000.0));
        assert_eq!(carousel.focus_index(), 0);

        carousel.set_in_view(ms(1000.0), true);
        carousel.tick(&mut page, ms(1150.0));
        assert_eq!(carousel.focus_index(), 1);

        carousel.tick(&mut page, ms(2600.0));
        assert_eq!(carousel.focus_index(), 2);
        carousel.tick(&mut page, ms(4200.0));
        assert_eq!(carousel.focus_index(), 3);

        // A second visibility change does not nudge again.
        carousel.set_in_view(ms(4300.0), false);
        carousel.set_in_view(ms(4400.0), true);
        carousel.tick(&mut page, ms(4600.0));
        assert_eq!(carousel.focus_index(), 3);
    }

    #[test]
    fn test_hover_pauses_and_leave_restarts() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::capability());
        carousel.attach(&mut page);
        carousel.set_in_view(ms(0.0), true);
        carousel.tick(&mut page, ms(150.0));
        assert_eq!(carousel.focus_index(), 1);

        carousel.pointer_entered_track();
        assert!(!carousel.is_auto_focus_running());
        carousel.tick(&mut page, ms(5000.0));
        assert_eq!(carousel.focus_index(), 1);

        carousel.pointer_left_track(ms(5000.0));
        carousel.tick(&mut page, ms(6000.0));
        assert_eq!(carousel.focus_index(), 1);
        carousel.tick(&mut page, ms(6600.0));
        assert_eq!(carousel.focus_index(), 2);
    }

    #[test]
    fn test_focus_leaving_clears_marker_keeps_index() {
        let mut page = Page::new(3);
        let mut carousel = CapabilityCarousel::new(3, CarouselConfig::capability());
        carousel.attach(&mut page);

        carousel.focus_entered(&mut page, Some(2));
        assert_eq!(page.marked(), vec![2]);
        assert!(carousel.pause_reasons().contains(PauseReason::Focus));

        carousel.focus_left_track(&mut page, ms(0.0));
        assert!(page.marked().is_empty());
        assert_eq!(carousel.focus_index(), 2);
        assert!(carousel.is_auto_focus_running());

        carousel.set_focus(&mut page, 0, false);
        assert_eq!(page.marked(), vec![0]);
    }

    #[test]
    fn test_clamped_arrows() {
        let mut page = Page::new(3);
        let mut carousel = CapabilityCarousel::new(3, CarouselConfig::capability());
        carousel.attach(&mut page);
        assert_eq!(page.arrows.last(), Some(&(ArrowState::AtBoundary, ArrowState::Enabled)));

        assert!(!carousel.arrow(&mut page, ms(0.0), Direction::Previous));
        assert!(!carousel.pause_reasons().contains(PauseReason::Manual));

        assert!(carousel.arrow(&mut page, ms(0.0), Direction::Next));
        assert!(carousel.arrow(&mut page, ms(0.0), Direction::Next));
        assert_eq!(carousel.focus_index(), 2);
        assert_eq!(page.arrows.last(), Some(&(ArrowState::Enabled, ArrowState::AtBoundary)));
        assert!(!carousel.arrow(&mut page, ms(0.0), Direction::Next));
    }

    #[test]
    fn test_wrapping_arrows_and_resume() {
        let mut page = Page::new(3);
        let config = CarouselConfig {
            arrow_policy: ArrowPolicy::Wrap,
            ..CarouselConfig::capability()
        };
        let mut carousel = CapabilityCarousel::new(3, config);
        carousel.attach(&mut page);
        carousel.set_in_view(ms(0.0), true);
        carousel.tick(&mut page, ms(150.0));
        assert_eq!(carousel.focus_index(), 1);

        carousel.arrow(&mut page, ms(200.0), Direction::Next);
        carousel.arrow(&mut page, ms(300.0), Direction::Next);
        assert_eq!(carousel.focus_index(), 0);
        assert!(!carousel.is_auto_focus_running());

        // Resume 2500ms after the last click, then the interval restarts.
        carousel.tick(&mut page, ms(2799.0));
        assert!(carousel.pause_reasons().contains(PauseReason::Manual));
        carousel.tick(&mut page, ms(2800.0));
        assert!(carousel.pause_reasons().is_empty());
        carousel.tick(&mut page, ms(4400.0));
        assert_eq!(carousel.focus_index(), 1);
    }

    #[test]
    fn test_product_preset_short_track_is_passive() {
        let mut page = Page::new(5);
        let mut carousel = CapabilityCarousel::new(5, CarouselConfig::product());
        carousel.attach(&mut page);
        assert!(page.center_aligned);
        assert!(page.marked().is_empty());

        carousel.set_in_view(ms(0.0), true);
        carousel.tick(&mut page, ms(10_000.0));
        assert!(page.marked().is_empty());
    }

    #[test]
    fn test_product_page_arrows() {
        let mut page = Page::new(8);
        let mut carousel = CapabilityCarousel::new(8, CarouselConfig::product());
        carousel.attach(&mut page);
        assert_eq!(page.arrows.last(), Some(&(ArrowState::Enabled, ArrowState::Enabled)));

        // max(ceil(280 + 20), floor(1000 * 0.6)) = 600
        assert!(carousel.handle_key(&mut page, ms(0.0), Key::ArrowRight));
        assert_eq!(page.scrolls, vec![600.0]);
        assert_eq!(carousel.focus_index(), 0);

        carousel.arrow(&mut page, ms(0.0), Direction::Previous);
        assert_eq!(page.scrolls, vec![600.0, -600.0]);
        assert!(!carousel.handle_key(&mut page, ms(0.0), Key::Enter));
    }

    #[test]
    fn test_page_arrows_hidden_without_overflow() {
        let mut page = Page::new(6);
        page.metrics.scroll_width = 1001.0;
        let mut carousel = CapabilityCarousel::new(6, CarouselConfig::product());
        carousel.attach(&mut page);
        assert_eq!(page.arrows.last(), Some(&(ArrowState::Hidden, ArrowState::Hidden)));
    }

    #[test]
    fn test_page_scroll_amount() {
        let metrics = TrackMetrics {
            client_width: 300.0,
            gap: 12.0,
            ..Default::default()
        };
        assert_eq!(page_scroll_amount(&metrics, Some(250.4), 0.6), 263.0);
        assert_eq!(page_scroll_amount(&metrics, None, 0.6), 210.0);
    }

    #[test]
    fn test_focus_changed_signal() {
        let mut page = Page::new(3);
        let mut carousel = CapabilityCarousel::new(3, CarouselConfig::capability());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        carousel.focus_changed.connect(move |i| sink.borrow_mut().push(*i));

        carousel.attach(&mut page);
        carousel.advance(&mut page);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_single_card_never_auto_advances() {
        let mut page = Page::new(1);
        let mut carousel = CapabilityCarousel::new(1, CarouselConfig::capability());
        carousel.attach(&mut page);
        carousel.set_in_view(ms(0.0), true);
        assert!(!carousel.is_auto_focus_running());
        carousel.tick(&mut page, ms(5000.0));
        assert_eq!(page.marked(), vec![0]);
    }
}
