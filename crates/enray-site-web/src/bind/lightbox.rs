//! The `#infraModal` capability lightbox.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlElement, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use enray_site::gallery::{Catalog, CategoryDetails, GalleryImage};
use enray_site::widget::{
    CapabilityModal, DialogKind, Direction, FocusTarget, ImageArea, Key, KeyPress, LayoutMetrics,
    LightboxConfig, LightboxSurface, Trigger,
};
use enray_site_core::logging::targets;

use crate::bind::carousel::SharedCarousel;
use crate::bind::chrome::{self, SharedChrome};
use crate::dom;
use crate::runtime::{Shared, share, with};

const FOCUSABLE: &str = "a[href], area[href], input:not([disabled]), select:not([disabled]), \
    textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
    [tabindex]:not([tabindex=\"-1\"]), [contenteditable=\"true\"]";

pub struct ModalDom {
    modal: HtmlElement,
    header: Option<HtmlElement>,
    gallery: Option<HtmlElement>,
    counter: Option<HtmlElement>,
    thumbnails: Option<HtmlElement>,
    blurb: Option<HtmlElement>,
    points: Option<HtmlElement>,
    items: Option<HtmlElement>,
}

impl ModalDom {
    fn new(modal: HtmlElement) -> Self {
        let part = |selector: &str| dom::find(&modal, selector);
        Self {
            header: part(".modal-header"),
            gallery: part(".modal-gallery"),
            counter: part(".image-counter"),
            thumbnails: part(".thumbnails-container"),
            blurb: part(".modal-info-blurb"),
            points: part(".modal-info-points"),
            items: part(".modal-info-items"),
            modal,
        }
    }

    // The items container is optional in the markup.
    fn items_container(&mut self) -> Option<HtmlElement> {
        if self.items.is_none() {
            let content = dom::find(&self.modal, ".modal-info-content")?;
            let container = dom::create("div")?;
            container.set_class_name("modal-info-items");
            let before = self.points.as_ref().map(|points| {
                let node: &web_sys::Node = points;
                node
            });
            content.insert_before(&container, before).ok()?;
            self.items = Some(container);
        }
        self.items.clone()
    }

    fn render_items(&mut self, items: &[enray_site::gallery::GalleryItem]) {
        let Some(container) = self.items_container() else {
            return;
        };
        container.set_inner_html("");
        for item in items {
            let Some(wrap) = dom::create("div") else {
                continue;
            };
            wrap.set_class_name("modal-info-item");
            if !item.title.is_empty()
                && let Some(title) = dom::create("h4")
            {
                title.set_class_name("modal-info-item-title");
                dom::set_text(&title, &item.title);
                let _ = wrap.append_child(&title);
            }
            if !item.desc.is_empty()
                && let Some(desc) = dom::create("p")
            {
                desc.set_class_name("modal-info-item-desc");
                dom::set_text(&desc, &item.desc);
                let _ = wrap.append_child(&desc);
            }
            let _ = container.append_child(&wrap);
        }
        dom::set_shown(&container, true, "block");
    }

    fn render_summary(&mut self, description: &str, points: &[String]) {
        if let Some(items) = &self.items {
            items.set_inner_html("");
            dom::set_shown(items, false, "block");
        }
        if let Some(blurb) = &self.blurb {
            dom::set_text(blurb, description);
            dom::set_shown(blurb, !description.is_empty(), "block");
        }
        if let Some(list) = &self.points {
            list.set_inner_html("");
            for point in points {
                if let Some(li) = dom::create("li") {
                    dom::set_text(&li, point);
                    let _ = list.append_child(&li);
                }
            }
            dom::set_shown(list, !points.is_empty(), "block");
        }
    }

    fn clear_summary(&self) {
        if let Some(blurb) = &self.blurb {
            dom::set_text(blurb, "");
            dom::set_shown(blurb, false, "block");
        }
        if let Some(list) = &self.points {
            list.set_inner_html("");
            dom::set_shown(list, false, "block");
        }
    }

    fn height_of(&self, selector: &str) -> f64 {
        dom::find(&self.modal, selector).map_or(0.0, |el| dom::rect(&el).height)
    }
}

impl LightboxSurface for ModalDom {
    type Handle = HtmlElement;

    fn show(&mut self) {
        dom::set_shown(&self.modal, true, "block");
        dom::set_attr(&self.modal, "aria-hidden", "false");
    }

    fn hide(&mut self) {
        dom::set_shown(&self.modal, false, "block");
        dom::set_attr(&self.modal, "aria-hidden", "true");
    }

    fn render_title(&mut self, title: &str) {
        if let Some(header) = &self.header {
            dom::set_text(header, title);
        }
    }

    fn render_image(&mut self, image: &GalleryImage, counter: &str) {
        if let Some(gallery) = &self.gallery {
            gallery.set_inner_html("");
            if let Some(img) = dom::create("img") {
                dom::set_attr(&img, "src", &image.src);
                dom::set_attr(&img, "alt", &image.caption);
                let _ = gallery.append_child(&img);
            }
            if let Some(caption) = dom::create("p") {
                caption.set_class_name("modal-caption");
                dom::set_text(&caption, &image.caption);
                let _ = gallery.append_child(&caption);
            }
        }
        if let Some(element) = &self.counter {
            dom::set_text(element, counter);
        }
    }

    fn render_thumbnails(&mut self, images: &[GalleryImage], active: usize) {
        let Some(container) = &self.thumbnails else {
            return;
        };
        container.set_inner_html("");
        for (index, image) in images.iter().enumerate() {
            let (Some(thumb), Some(img)) = (dom::create("div"), dom::create("img")) else {
                continue;
            };
            thumb.set_class_name("thumbnail");
            dom::set_class(&thumb, "active", index == active);
            dom::set_attr(&thumb, "data-index", &index.to_string());
            dom::set_attr(&img, "src", &image.src);
            dom::set_attr(&img, "alt", &format!("Thumbnail {}", index + 1));
            let _ = thumb.append_child(&img);
            let _ = container.append_child(&thumb);
        }
    }

    fn set_active_thumbnail(&mut self, index: usize) {
        let Some(container) = &self.thumbnails else {
            return;
        };
        let thumbs = dom::find_all(container, ".thumbnail");
        for (i, thumb) in thumbs.iter().enumerate() {
            dom::set_class(thumb, "active", i == index);
        }
        if let Some(thumb) = thumbs.get(index) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Nearest);
            options.set_inline(ScrollLogicalPosition::Center);
            thumb.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn render_details(&mut self, details: CategoryDetails<'_>) {
        match details {
            CategoryDetails::Items(items) => {
                self.render_items(items);
                if self.items.is_some() {
                    self.clear_summary();
                }
            }
            CategoryDetails::Summary { description, points } => {
                self.render_summary(description, points);
            }
        }
    }

    fn layout_metrics(&self) -> LayoutMetrics {
        let client_height = dom::document()
            .and_then(|doc| doc.document_element())
            .map_or(0.0, |root| f64::from(root.client_height()));
        LayoutMetrics {
            viewport_height: client_height.max(dom::viewport_height()),
            header_height: self.height_of(".modal-header"),
            thumbnails_height: self.height_of(".modal-thumbnails"),
        }
    }

    fn apply_image_area(&mut self, area: ImageArea) {
        if let Some(main) = dom::find(&self.modal, ".modal-main") {
            dom::set_style(&main, "min-height", &format!("{}px", area.min_height));
        }
        if let Some(img) = dom::find(&self.modal, ".modal-gallery img") {
            dom::set_style(&img, "max-height", &format!("{}px", area.image_max_height));
        }
    }

    fn scroll_thumbnails_by(&mut self, delta: f64) {
        if let Some(container) = &self.thumbnails {
            dom::smooth_scroll_by(container, delta);
        }
    }

    fn focusables(&self) -> Vec<HtmlElement> {
        let active = dom::active_element();
        dom::find_all(&self.modal, FOCUSABLE)
            .into_iter()
            .filter(|el| {
                el.offset_parent().is_some()
                    || active.as_ref().is_some_and(|active| {
                        let el: &Element = el;
                        el == active
                    })
            })
            .collect()
    }

    fn focused(&self) -> Option<HtmlElement> {
        let active = dom::active_element()?;
        let node: &web_sys::Node = &active;
        if !dom::contains(&self.modal, Some(node)) {
            return None;
        }
        active.dyn_into().ok()
    }

    fn focus(&mut self, target: FocusTarget<HtmlElement>) {
        match target {
            FocusTarget::Element(element) => dom::focus(&element),
            FocusTarget::Container => {
                dom::set_attr(&self.modal, "tabindex", "-1");
                dom::focus(&self.modal);
            }
            FocusTarget::CapabilitySection => {
                if let Some(section) = dom::query(".infrastructure") {
                    dom::set_attr(&section, "tabindex", "-1");
                    dom::focus(&section);
                    let _ = section.remove_attribute("tabindex");
                }
            }
        }
    }
}

pub type SharedLightbox = Shared<CapabilityModal<HtmlElement>, ModalDom>;

fn open(lightbox: &SharedLightbox, card: &HtmlElement) {
    let Some(category) = card.get_attribute("data-category") else {
        tracing::warn!(target: targets::MODAL, "card without data-category");
        return;
    };
    let result = with(lightbox, |lightbox, page| {
        lightbox.open(page, &category, Trigger::Card(card.clone()))
    });
    if let Some(Err(err)) = result {
        tracing::warn!(target: targets::MODAL, %err, "lightbox not opened");
    }
}

fn listen_cards(lightbox: &SharedLightbox) {
    for card in dom::query_all(".infra-card") {
        dom::set_style(&card, "cursor", "pointer");
        if !card.has_attribute("tabindex") {
            dom::set_attr(&card, "tabindex", "0");
        }
        {
            let lightbox = lightbox.clone();
            let trigger = card.clone();
            dom::listen(&card, "click", move |event: MouseEvent| {
                event.prevent_default();
                event.stop_propagation();
                open(&lightbox, &trigger);
            });
        }
        {
            let lightbox = lightbox.clone();
            let trigger = card.clone();
            dom::listen(&card, "keydown", move |event: KeyboardEvent| {
                if Key::from_dom(&event.key()).is_activation() {
                    event.prevent_default();
                    open(&lightbox, &trigger);
                }
            });
        }
    }
}

fn on_click(target: Option<HtmlElement>, lightbox: &SharedLightbox, action: fn(&mut CapabilityModal<HtmlElement>, &mut ModalDom)) {
    let Some(target) = target else {
        return;
    };
    let lightbox = lightbox.clone();
    dom::listen(&target, "click", move |event: MouseEvent| {
        event.prevent_default();
        with(&lightbox, |lightbox, page| action(lightbox, page));
    });
}

fn listen_controls(modal: &HtmlElement, lightbox: &SharedLightbox) {
    let close = dom::find(modal, ".modal-close");
    on_click(close.clone(), lightbox, |lightbox, page| {
        lightbox.close(page);
    });
    if let Some(close) = &close {
        let lightbox = lightbox.clone();
        dom::listen(close, "keydown", move |event: KeyboardEvent| {
            let key = Key::from_dom(&event.key());
            if with(&lightbox, |lightbox, page| lightbox.close_control_key(page, key)) == Some(true) {
                event.prevent_default();
            }
        });
    }
    on_click(dom::find(modal, ".modal-prev"), lightbox, |lightbox, page| lightbox.prev(page));
    on_click(dom::find(modal, ".modal-next"), lightbox, |lightbox, page| lightbox.next(page));
    on_click(dom::find(modal, ".thumb-scroll-left"), lightbox, |lightbox, page| {
        lightbox.scroll_thumbnails(page, Direction::Previous);
    });
    on_click(dom::find(modal, ".thumb-scroll-right"), lightbox, |lightbox, page| {
        lightbox.scroll_thumbnails(page, Direction::Next);
    });

    if let Some(container) = dom::find(modal, ".thumbnails-container") {
        let lightbox = lightbox.clone();
        dom::listen(&container, "click", move |event: MouseEvent| {
            let index = dom::closest(&event, ".thumbnail")
                .and_then(|thumb| thumb.get_attribute("data-index"))
                .and_then(|index| index.parse::<usize>().ok());
            if let Some(index) = index {
                with(&lightbox, |lightbox, page| lightbox.select(page, index));
            }
        });
    }

    // `load` does not bubble; catch image loads on the way down.
    if let Some(gallery) = dom::find(modal, ".modal-gallery") {
        let lightbox = lightbox.clone();
        dom::listen_capture(&gallery, "load", move |_: web_sys::Event| {
            with(&lightbox, |lightbox, page| lightbox.resize(page));
        });
    }

    {
        let lightbox = lightbox.clone();
        let backdrop = modal.clone();
        dom::listen(modal, "click", move |event: MouseEvent| {
            let on_backdrop = dom::target_element(&event).is_some_and(|target| {
                let backdrop: &Element = &backdrop;
                &target == backdrop
            });
            if on_backdrop {
                with(&lightbox, |lightbox, page| lightbox.backdrop_click(page));
            }
        });
    }
    {
        let lightbox = lightbox.clone();
        dom::listen_document("keydown", move |event: KeyboardEvent| {
            let press = KeyPress {
                key: Key::from_dom(&event.key()),
                shift: event.shift_key(),
            };
            if with(&lightbox, |lightbox, page| lightbox.handle_key(page, press)) == Some(true) {
                event.prevent_default();
            }
        });
    }
    {
        let lightbox = lightbox.clone();
        dom::listen_window("resize", move |_: web_sys::Event| {
            with(&lightbox, |lightbox, page| lightbox.resize(page));
        });
    }
}

/// Wire the lightbox to the capability cards.
///
/// Opening and closing lock the page through `chrome` and drop the
/// carousel's highlight so the card tag does not linger.
pub fn install(
    config: &LightboxConfig,
    catalog: Rc<Catalog>,
    chrome: Option<SharedChrome>,
    carousel: Option<SharedCarousel>,
) -> Option<SharedLightbox> {
    let Some(modal) = dom::by_id("infraModal") else {
        tracing::debug!(target: targets::MODAL, "no lightbox markup");
        return None;
    };

    let widget = CapabilityModal::new(catalog, config.clone());
    {
        let chrome = chrome.clone();
        let carousel = carousel.clone();
        widget.opened.connect(move |_| {
            chrome::push(chrome.as_ref(), DialogKind::Lightbox);
            if let Some(carousel) = &carousel {
                with(carousel, |carousel, page| carousel.clear_highlight(page));
            }
        });
    }
    widget.closed.connect(move |_| {
        chrome::pop(chrome.as_ref(), DialogKind::Lightbox);
        if let Some(carousel) = &carousel {
            with(carousel, |carousel, page| carousel.clear_highlight(page));
        }
    });

    let lightbox = share(widget, ModalDom::new(modal.clone()));
    listen_controls(&modal, &lightbox);
    listen_cards(&lightbox);

    tracing::debug!(target: targets::MODAL, "lightbox installed");
    Some(lightbox)
}
