//! Integration tests for components working together the way the page wires
//! them: signals between components, shared configuration, and the
//! properties each component must keep over long runs.

use std::cell::RefCell;
use std::rc::Rc;

use enray_site::core::{Rect, Timestamp};
use enray_site::form::{FieldError, FieldKind, FormValidator};
use enray_site::gallery::{Catalog, CategoryDetails, GalleryImage};
use enray_site::widget::{
    ArrowState, CapabilityCarousel, CapabilityModal, CarouselSurface, ChromeSurface, DialogKind,
    DragScroller, DragSurface, FocusTarget, ImageArea, Key, KeyPress, LayoutMetrics,
    LightboxSurface, MarqueeLayout, MarqueeScroller, MarqueeSurface, PageChrome, PauseReason,
    RevealAnimator, RevealState, RevealSurface, Trigger,
};
use enray_site::SiteConfig;

fn ms(v: f64) -> Timestamp {
    Timestamp::from_millis(v)
}

// Component logs show up with `cargo test -- --nocapture`.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Page doubles
// ---------------------------------------------------------------------------

struct Track {
    highlighted: Vec<bool>,
    scroll_left: f64,
    dragging: bool,
}

impl Track {
    fn new(cards: usize) -> Self {
        Self {
            highlighted: vec![false; cards],
            scroll_left: 0.0,
            dragging: false,
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

impl CarouselSurface for Track {
    fn set_card_highlighted(&mut self, index: usize, highlighted: bool) {
        self.highlighted[index] = highlighted;
    }
    fn section_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 100.0, 1000.0, 400.0))
    }
    fn viewport_height(&self) -> f64 {
        800.0
    }
    fn track_metrics(&self) -> enray_site::widget::TrackMetrics {
        enray_site::widget::TrackMetrics {
            rect: Rect::new(0.0, 150.0, 1000.0, 300.0),
            scroll_left: self.scroll_left,
            scroll_width: 300.0 * self.highlighted.len() as f64,
            client_width: 1000.0,
            padding_left: 10.0,
            padding_right: 10.0,
            gap: 20.0,
        }
    }
    fn card_rect(&self, index: usize) -> Option<Rect> {
        let x = index as f64 * 300.0 - self.scroll_left;
        Some(Rect::new(x, 150.0, 280.0, 300.0))
    }
    fn scroll_track_by(&mut self, delta: f64) {
        self.scroll_left += delta;
    }
    fn set_arrow_states(&mut self, _prev: ArrowState, _next: ArrowState) {}
    fn set_center_aligned(&mut self) {}
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
    }
}

#[derive(Default)]
struct Body {
    modal_open: bool,
    scroll_top_visible: bool,
}

impl ChromeSurface for Body {
    fn set_modal_open(&mut self, open: bool) {
        self.modal_open = open;
    }
    fn set_scroll_top_visible(&mut self, visible: bool) {
        self.scroll_top_visible = visible;
    }
    fn scroll_to_top(&mut self) {}
}

#[derive(Default)]
struct Lightbox {
    visible: bool,
    counter: String,
    focused: Option<FocusTarget<u8>>,
}

impl LightboxSurface for Lightbox {
    type Handle = u8;

    fn show(&mut self) {
        self.visible = true;
    }
    fn hide(&mut self) {
        self.visible = false;
    }
    fn render_title(&mut self, _title: &str) {}
    fn render_image(&mut self, _image: &GalleryImage, counter: &str) {
        self.counter = counter.to_owned();
    }
    fn render_thumbnails(&mut self, _images: &[GalleryImage], _active: usize) {}
    fn set_active_thumbnail(&mut self, _index: usize) {}
    fn render_details(&mut self, _details: CategoryDetails<'_>) {}
    fn layout_metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            viewport_height: 900.0,
            header_height: 60.0,
            thumbnails_height: 100.0,
        }
    }
    fn apply_image_area(&mut self, _area: ImageArea) {}
    fn scroll_thumbnails_by(&mut self, _delta: f64) {}
    fn focusables(&self) -> Vec<u8> {
        vec![1, 2, 3]
    }
    fn focused(&self) -> Option<u8> {
        match self.focused {
            Some(FocusTarget::Element(h)) => Some(h),
            _ => None,
        }
    }
    fn focus(&mut self, target: FocusTarget<u8>) {
        self.focused = Some(target);
    }
}

#[derive(Default)]
struct Strip {
    scroll_left: f64,
}

impl MarqueeSurface for Strip {
    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }
    fn set_scroll_left(&mut self, value: f64) {
        // The page rounds offsets to whole pixels.
        self.scroll_left = value.round();
    }
    fn clone_items(&mut self) {}
    fn set_active(&mut self) {}
    fn item_widths(&self) -> Vec<f64> {
        vec![200.0; 6]
    }
    fn gap(&self) -> f64 {
        16.0
    }
}

#[derive(Default)]
struct Sections {
    revealed: Vec<usize>,
    unobserved: Vec<usize>,
}

impl RevealSurface for Sections {
    fn prepare_hidden(&mut self, _index: usize, _config: &enray_site::widget::RevealConfig) {}
    fn reveal(&mut self, index: usize) {
        self.revealed.push(index);
    }
    fn unobserve(&mut self, index: usize) {
        self.unobserved.push(index);
    }
}

fn three_image_catalog() -> Rc<Catalog> {
    Rc::new(
        Catalog::from_json_str(
            r#"[{"id":"welding","title":"Welding","images":[
                {"src":"1.webp","caption":"One"},
                {"src":"2.webp","caption":"Two"},
                {"src":"3.webp","caption":"Three"}
            ]}]"#,
        )
        .unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[test]
fn test_carousel_focus_after_advances() {
    let config = SiteConfig::default();
    let mut track = Track::new(5);
    let mut carousel = CapabilityCarousel::new(5, config.capability_carousel.clone());
    carousel.attach(&mut track);

    for _ in 0..7 {
        carousel.advance(&mut track);
        assert_eq!(track.marked().len(), 1);
    }
    assert_eq!(carousel.focus_index(), 2);
    assert_eq!(track.marked(), vec![2]);
}

#[test]
fn test_drag_pauses_carousel_through_signals() {
    init_logging();
    let config = SiteConfig::default();
    let carousel = Rc::new(RefCell::new(CapabilityCarousel::new(
        5,
        config.capability_carousel.clone(),
    )));
    let mut drag = DragScroller::new(config.carousel_drag.clone());

    {
        let carousel = Rc::clone(&carousel);
        drag.drag_started
            .connect(move |_| carousel.borrow_mut().set_dragging(true));
    }
    {
        let carousel = Rc::clone(&carousel);
        drag.drag_finished
            .connect(move |_| carousel.borrow_mut().set_dragging(false));
    }

    let mut track = Track::new(5);
    carousel.borrow_mut().attach(&mut track);

    // Below the threshold: still a click, no pause.
    drag.press(&track, 500.0, ms(0.0));
    drag.move_to(&mut track, 495.0, ms(200.0));
    assert!(!carousel.borrow().pause_reasons().contains(PauseReason::Drag));
    drag.release(&mut track, ms(400.0));
    assert!(!drag.take_click_suppression());

    // Past the threshold: paused while dragging, one click swallowed.
    drag.press(&track, 500.0, ms(1000.0));
    drag.move_to(&mut track, 480.0, ms(1400.0));
    assert!(track.dragging);
    assert!(carousel.borrow().pause_reasons().contains(PauseReason::Drag));

    // Highlight changes during a drag never scroll the track.
    let before = track.scroll_left;
    carousel.borrow_mut().set_focus(&mut track, 4, true);
    assert_eq!(track.scroll_left, before);

    drag.release(&mut track, ms(1800.0));
    assert!(!carousel.borrow().pause_reasons().contains(PauseReason::Drag));
    assert!(drag.take_click_suppression());
    assert!(!drag.take_click_suppression());
}

#[test]
fn test_lightbox_locks_page_and_clears_carousel_marker() {
    init_logging();
    let config = SiteConfig::default();
    let chrome = Rc::new(RefCell::new((PageChrome::new(config.chrome.clone()), Body::default())));
    let carousel = Rc::new(RefCell::new(CapabilityCarousel::new(
        5,
        config.capability_carousel.clone(),
    )));
    let track = Rc::new(RefCell::new(Track::new(5)));
    carousel.borrow_mut().attach(&mut *track.borrow_mut());

    let mut modal: CapabilityModal<u8> =
        CapabilityModal::new(three_image_catalog(), config.lightbox.clone());
    {
        let chrome = Rc::clone(&chrome);
        modal.opened.connect(move |_| {
            let (chrome, body) = &mut *chrome.borrow_mut();
            chrome.push_dialog(body, DialogKind::Lightbox);
        });
    }
    {
        let chrome = Rc::clone(&chrome);
        let carousel = Rc::clone(&carousel);
        let track = Rc::clone(&track);
        modal.closed.connect(move |_| {
            let (chrome, body) = &mut *chrome.borrow_mut();
            chrome.pop_dialog(body, DialogKind::Lightbox);
            carousel
                .borrow_mut()
                .clear_highlight(&mut *track.borrow_mut());
        });
    }

    {
        let (chrome, body) = &mut *chrome.borrow_mut();
        chrome.scrolled(body, 800.0);
    }
    assert!(chrome.borrow().1.scroll_top_visible);

    let mut lightbox = Lightbox::default();
    modal
        .open(&mut lightbox, "welding", Trigger::Card(2))
        .unwrap();
    assert!(lightbox.visible);
    assert_eq!(lightbox.counter, "1 / 3");
    assert!(chrome.borrow().1.modal_open);
    assert!(!chrome.borrow().1.scroll_top_visible);

    // Previous from the first image wraps to the last.
    modal.prev(&mut lightbox);
    assert_eq!(modal.index(), Some(2));
    assert_eq!(lightbox.counter, "3 / 3");

    assert!(modal.handle_key(&mut lightbox, KeyPress::new(Key::Escape)));
    assert!(!lightbox.visible);
    assert_eq!(lightbox.focused, Some(FocusTarget::CapabilitySection));
    assert!(!chrome.borrow().1.modal_open);
    assert!(chrome.borrow().1.scroll_top_visible);

    assert!(track.borrow().marked().is_empty());
    assert_eq!(carousel.borrow().focus_index(), 0);
}

#[test]
fn test_lightbox_rejects_unknown_and_empty_categories() {
    let catalog = Rc::new(
        Catalog::from_json_str(r#"[{"id":"others","title":"Others","description":"Misc"}]"#)
            .unwrap(),
    );
    let mut modal: CapabilityModal<u8> = CapabilityModal::new(catalog, Default::default());
    let mut lightbox = Lightbox::default();

    assert!(matches!(
        modal.open(&mut lightbox, "others", Trigger::Card(0)),
        Err(enray_site::Error::EmptyGallery(_))
    ));
    assert!(matches!(
        modal.open(&mut lightbox, "missing", Trigger::Card(0)),
        Err(enray_site::Error::UnknownCategory(_))
    ));
    assert!(!lightbox.visible);
    assert!(!modal.is_open());
}

#[test]
fn test_marquee_stays_in_loop_at_sixty_fps() {
    init_logging();
    let config = SiteConfig::default();
    let mut strip = Strip::default();
    let layout = MarqueeLayout {
        item_count: 6,
        scroll_width: 1280.0,
        client_width: 900.0,
    };
    let mut marquee =
        MarqueeScroller::attach(&mut strip, layout, false, config.marquee.clone(), ms(0.0))
            .unwrap();
    marquee.set_in_view(true);

    let mut now = 0.0;
    for frame in 0..20_000 {
        now += 1000.0 / 60.0;
        if frame == 5_000 {
            // Six 200px items with 16px gaps.
            marquee.resize(&strip);
            assert_eq!(marquee.loop_width(), 1280.0);
        }
        marquee.tick(&mut strip, ms(now));
        assert!(marquee.position() >= 0.0);
        assert!(marquee.position() < marquee.loop_width());
    }

    // Rounding by the page never stalls the strip.
    let expected = (40.0 * now / 1000.0).rem_euclid(1280.0);
    assert!((marquee.position() - expected).abs() < 1e-3);
}

#[test]
fn test_marquee_skips_reduced_motion() {
    let mut strip = Strip::default();
    let layout = MarqueeLayout {
        item_count: 6,
        scroll_width: 1280.0,
        client_width: 900.0,
    };
    assert!(MarqueeScroller::attach(&mut strip, layout, true, Default::default(), ms(0.0)).is_err());
}

#[test]
fn test_field_validation_cases() {
    let validator = FormValidator::new().unwrap();

    assert_eq!(validator.check(FieldKind::Email, true, "a@b"), Some(FieldError::InvalidEmail));
    assert_eq!(validator.check(FieldKind::Email, true, "a@b.co"), None);
    assert_eq!(validator.check(FieldKind::Tel, false, "+91 98765 43210"), None);
    assert_eq!(validator.check(FieldKind::Tel, false, "0123"), Some(FieldError::InvalidPhone));
    assert_eq!(validator.check(FieldKind::Tel, false, "   "), None);
    assert_eq!(validator.check(FieldKind::Textarea, true, "\n\t"), Some(FieldError::Required));
}

#[test]
fn test_reveal_is_one_shot_across_scrolling() {
    let config = SiteConfig::default();
    let mut sections = Sections::default();
    let mut reveal = RevealAnimator::new(3, config.reveal.clone());
    reveal.attach(&mut sections, true);

    // Scrolling past a section repeatedly reveals it once.
    for _ in 0..3 {
        reveal.intersection(&mut sections, 1, true);
        reveal.intersection(&mut sections, 1, false);
    }
    assert_eq!(sections.revealed, vec![1]);
    assert_eq!(sections.unobserved, vec![1]);
    assert_eq!(reveal.state(1), Some(RevealState::Revealed));
    assert_eq!(reveal.state(0), Some(RevealState::Hidden));
}
