//! The capability carousel and the product carousels.

use wasm_bindgen::JsCast;
use web_sys::{FocusEvent, HtmlElement, KeyboardEvent, MouseEvent, Node};

use enray_site::widget::{
    ArrowState, CapabilityCarousel, CarouselConfig, CarouselSurface, Direction, DragConfig,
    DragScroller, Key, TrackMetrics,
};
use enray_site_core::Rect;
use enray_site_core::logging::targets;

use crate::bind::drag;
use crate::dom;
use crate::runtime::{Runtime, Shared, share, with};

/// Visible fraction of a carousel section that starts auto-advance.
const VIEW_THRESHOLD: f64 = 0.15;

pub struct TrackDom {
    section: Option<HtmlElement>,
    track: HtmlElement,
    cards: Vec<HtmlElement>,
    prev: Option<HtmlElement>,
    next: Option<HtmlElement>,
    highlight_class: &'static str,
    // Elements that get `center-aligned` on short tracks.
    align_targets: Vec<HtmlElement>,
    // `display` for a visible arrow; empty leaves it to the stylesheet.
    arrow_display: &'static str,
}

impl TrackDom {
    fn card_index(&self, node: &web_sys::Element) -> Option<usize> {
        let card = node.closest(".infra-card, .product-card").ok().flatten()?;
        dom::index_of(&self.cards, &card)
    }

    fn present_arrow(&self, button: Option<&HtmlElement>, state: ArrowState) {
        let Some(button) = button else {
            return;
        };
        match state {
            ArrowState::Hidden => dom::set_shown(button, false, self.arrow_display),
            ArrowState::Enabled | ArrowState::AtBoundary => {
                dom::set_shown(button, true, self.arrow_display);
                let opacity = if state == ArrowState::AtBoundary { "0.7" } else { "1" };
                dom::set_style(button, "opacity", opacity);
                dom::set_attr(
                    button,
                    "aria-disabled",
                    if state == ArrowState::AtBoundary { "true" } else { "false" },
                );
            }
        }
    }
}

impl CarouselSurface for TrackDom {
    fn set_card_highlighted(&mut self, index: usize, highlighted: bool) {
        if let Some(card) = self.cards.get(index) {
            dom::set_class(card, self.highlight_class, highlighted);
        }
    }

    fn section_rect(&self) -> Option<Rect> {
        self.section.as_ref().map(|section| dom::rect(section))
    }

    fn viewport_height(&self) -> f64 {
        dom::viewport_height()
    }

    fn track_metrics(&self) -> TrackMetrics {
        let gap = match dom::style_px(&self.track, "column-gap") {
            gap if gap > 0.0 => gap,
            _ => dom::style_px(&self.track, "gap"),
        };
        TrackMetrics {
            rect: dom::rect(&self.track),
            scroll_left: dom::scroll_left(&self.track),
            scroll_width: f64::from(self.track.scroll_width()),
            client_width: f64::from(self.track.client_width()),
            padding_left: dom::style_px(&self.track, "padding-left"),
            padding_right: dom::style_px(&self.track, "padding-right"),
            gap,
        }
    }

    fn card_rect(&self, index: usize) -> Option<Rect> {
        self.cards.get(index).map(|card| dom::rect(card))
    }

    fn scroll_track_by(&mut self, delta: f64) {
        dom::smooth_scroll_by(&self.track, delta);
    }

    fn set_arrow_states(&mut self, prev: ArrowState, next: ArrowState) {
        self.present_arrow(self.prev.as_ref(), prev);
        self.present_arrow(self.next.as_ref(), next);
    }

    fn set_center_aligned(&mut self) {
        for element in &self.align_targets {
            dom::set_class(element, "center-aligned", true);
        }
    }
}

pub type SharedCarousel = Shared<CapabilityCarousel, TrackDom>;

fn listen_arrow(button: &HtmlElement, carousel: &SharedCarousel, direction: Direction) {
    let carousel = carousel.clone();
    dom::listen(button, "click", move |event: MouseEvent| {
        event.prevent_default();
        with(&carousel, |carousel, page| carousel.arrow(page, dom::now(), direction));
    });
}

fn listen_keys(target: &HtmlElement, carousel: &SharedCarousel) {
    let carousel = carousel.clone();
    dom::listen(target, "keydown", move |event: KeyboardEvent| {
        let key = Key::from_dom(&event.key());
        if !matches!(key, Key::ArrowLeft | Key::ArrowRight) {
            return;
        }
        let handled = with(&carousel, |carousel, page| carousel.handle_key(page, dom::now(), key));
        if handled == Some(true) {
            event.prevent_default();
        }
    });
}

fn listen_track(track: &HtmlElement, carousel: &SharedCarousel) {
    {
        let carousel = carousel.clone();
        dom::listen(track, "mouseenter", move |_: MouseEvent| {
            with(&carousel, |carousel, _| carousel.pointer_entered_track());
        });
    }
    {
        let carousel = carousel.clone();
        dom::listen(track, "mouseleave", move |_: MouseEvent| {
            with(&carousel, |carousel, _| carousel.pointer_left_track(dom::now()));
        });
    }
    {
        let carousel = carousel.clone();
        dom::listen(track, "focusin", move |event: FocusEvent| {
            let target = dom::target_element(&event);
            with(&carousel, |carousel, page| {
                let card = target.as_ref().and_then(|node| page.card_index(node));
                carousel.focus_entered(page, card);
            });
        });
    }
    {
        let carousel = carousel.clone();
        let root = track.clone();
        dom::listen(track, "focusout", move |event: FocusEvent| {
            let related = event.related_target().and_then(|t| t.dyn_into::<Node>().ok());
            if !dom::contains(&root, related.as_ref()) {
                with(&carousel, |carousel, page| carousel.focus_left_track(page, dom::now()));
            }
        });
    }
}

fn listen_cards(cards: &[HtmlElement], carousel: &SharedCarousel) {
    for (index, card) in cards.iter().enumerate() {
        let carousel = carousel.clone();
        dom::listen(card, "mouseenter", move |_: MouseEvent| {
            with(&carousel, |carousel, page| carousel.pointer_entered_card(page, index));
        });
    }
}

fn observe_section(section: Option<&HtmlElement>, carousel: &SharedCarousel) {
    let observed = section.and_then(|section| {
        let carousel = carousel.clone();
        dom::observe(&[section.clone()], VIEW_THRESHOLD, None, move |_, intersecting, _| {
            with(&carousel, |carousel, _| carousel.set_in_view(dom::now(), intersecting));
        })
    });
    if observed.is_none() {
        with(carousel, |carousel, _| carousel.set_in_view(dom::now(), true));
    }
}

fn finish(carousel: &SharedCarousel, runtime: &mut Runtime) {
    {
        let carousel = carousel.clone();
        dom::listen_window("resize", move |_: web_sys::Event| {
            with(&carousel, |carousel, page| carousel.sync_arrows(page));
        });
    }
    runtime.tick_each_frame(carousel, |carousel, page, now| carousel.tick(page, now));
}

/// Wire the capability carousel and its drag-to-scroll.
///
/// Returns the carousel so the lightbox can clear its highlight.
pub fn install_capability(
    config: &CarouselConfig,
    drag_config: &DragConfig,
    runtime: &mut Runtime,
) -> Option<SharedCarousel> {
    let Some(track) = dom::query(".infra-carousel-track") else {
        tracing::debug!(target: targets::CAROUSEL, "no capability carousel");
        return None;
    };
    let cards = dom::find_all(&track, ".infra-card");
    let page = TrackDom {
        section: dom::query(".infrastructure"),
        track: track.clone(),
        cards: cards.clone(),
        prev: dom::query(".infra-prev"),
        next: dom::query(".infra-next"),
        highlight_class: "infra-card-focus",
        align_targets: vec![track.clone()],
        arrow_display: "",
    };
    let prev = page.prev.clone();
    let next = page.next.clone();
    let section = page.section.clone();

    let carousel = share(CapabilityCarousel::new(cards.len(), config.clone()), page);
    with(&carousel, |carousel, page| carousel.attach(page));
    if !with(&carousel, |carousel, _| carousel.has_behavior()).unwrap_or(false) {
        return Some(carousel);
    }

    listen_track(&track, &carousel);
    listen_cards(&cards, &carousel);
    listen_keys(&track, &carousel);
    if let Some(prev) = &prev {
        listen_arrow(prev, &carousel, Direction::Previous);
    }
    if let Some(next) = &next {
        listen_arrow(next, &carousel, Direction::Next);
    }
    observe_section(section.as_ref(), &carousel);

    let scroller = DragScroller::new(drag_config.clone());
    {
        let carousel = carousel.clone();
        scroller.drag_started.connect(move |_| {
            with(&carousel, |carousel, _| carousel.set_dragging(true));
        });
    }
    {
        let carousel = carousel.clone();
        scroller.drag_finished.connect(move |_| {
            with(&carousel, |carousel, _| carousel.set_dragging(false));
        });
    }
    drag::bind(&track, scroller, runtime);

    finish(&carousel, runtime);
    tracing::debug!(target: targets::CAROUSEL, cards = cards.len(), "capability carousel installed");
    Some(carousel)
}

fn create_arrow(wrapper: &HtmlElement, class: &str, label: &str, glyph: &str) -> Option<HtmlElement> {
    let button = dom::create("button")?;
    dom::set_attr(&button, "type", "button");
    button.set_class_name(class);
    dom::set_attr(&button, "aria-label", label);
    button.set_inner_html(glyph);
    wrapper.append_child(&button).ok()?;
    Some(button)
}

fn install_product(track: HtmlElement, config: &CarouselConfig, runtime: &mut Runtime) {
    let cards = dom::find_all(&track, ".product-card");
    let closest = |selector: &str| -> Option<HtmlElement> {
        track.closest(selector).ok().flatten()?.dyn_into().ok()
    };
    let wrapper = closest(".product-carousel-wrapper");
    let section = closest(".product-category");

    let mut widget = CapabilityCarousel::new(cards.len(), config.clone());
    let mut align_targets = vec![track.clone()];
    align_targets.extend(wrapper.clone());

    // Arrows exist only on tracks that animate.
    let (prev, next) = match &wrapper {
        Some(wrapper) if widget.has_behavior() => (
            create_arrow(wrapper, "product-prev product-carousel-arrow", "Scroll left", "&#x2039;"),
            create_arrow(wrapper, "product-next product-carousel-arrow", "Scroll right", "&#x203A;"),
        ),
        _ => (None, None),
    };

    let mut page = TrackDom {
        section: section.clone(),
        track: track.clone(),
        cards: cards.clone(),
        prev: prev.clone(),
        next: next.clone(),
        highlight_class: "product-card-focus",
        align_targets,
        arrow_display: "inline-flex",
    };
    widget.attach(&mut page);
    if !widget.has_behavior() {
        return;
    }
    let carousel = share(widget, page);

    listen_track(&track, &carousel);
    listen_cards(&cards, &carousel);
    if let Some(prev) = &prev {
        listen_arrow(prev, &carousel, Direction::Previous);
    }
    if let Some(next) = &next {
        listen_arrow(next, &carousel, Direction::Next);
    }
    if let Some(wrapper) = &wrapper {
        dom::set_attr(wrapper, "tabindex", "0");
        listen_keys(wrapper, &carousel);
    }
    observe_section(section.as_ref(), &carousel);
    finish(&carousel, runtime);
}

/// Wire every `.product-carousel-track`.
pub fn install_products(config: &CarouselConfig, runtime: &mut Runtime) {
    let tracks = dom::query_all(".product-carousel-track");
    let count = tracks.len();
    for track in tracks {
        install_product(track, config, runtime);
    }
    if count > 0 {
        tracing::debug!(target: targets::CAROUSEL, tracks = count, "product carousels installed");
    }
}
