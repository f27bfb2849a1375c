//! Thin helpers over `web-sys`.
//!
//! Missing elements are `None` or empty lists; failed DOM calls are ignored
//! or logged. Nothing here panics.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, EventTarget, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

use enray_site_core::logging::targets;
use enray_site_core::{Rect, Timestamp};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

fn collect(list: Option<NodeList>) -> Vec<HtmlElement> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// First element in the document matching `selector`.
pub fn query(selector: &str) -> Option<HtmlElement> {
    document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into()
        .ok()
}

/// Every element in the document matching `selector`.
pub fn query_all(selector: &str) -> Vec<HtmlElement> {
    collect(document().and_then(|doc| doc.query_selector_all(selector).ok()))
}

/// First descendant of `root` matching `selector`.
pub fn find(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector).ok().flatten()?.dyn_into().ok()
}

/// Every descendant of `root` matching `selector`.
pub fn find_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    collect(root.query_selector_all(selector).ok())
}

pub fn by_id(id: &str) -> Option<HtmlElement> {
    document()?.get_element_by_id(id)?.dyn_into().ok()
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub fn set_attr(element: &Element, name: &str, value: &str) {
    let _ = element.set_attribute(name, value);
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn set_shown(element: &HtmlElement, shown: bool, display: &str) {
    set_style(element, "display", if shown { display } else { "none" });
}

pub fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

pub fn text(element: &Element) -> String {
    element.text_content().unwrap_or_default()
}

/// Current value of an input, textarea or select; empty for anything else.
pub fn value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

pub fn focus(element: &HtmlElement) {
    let _ = element.focus();
}

pub fn active_element() -> Option<Element> {
    document()?.active_element()
}

/// Whether `node` is `root` or inside it.
pub fn contains(root: &Element, node: Option<&web_sys::Node>) -> bool {
    root.contains(node)
}

pub fn create(tag: &str) -> Option<HtmlElement> {
    document()?.create_element(tag).ok()?.dyn_into().ok()
}

/// Fractional `scrollLeft`; `Element::scroll_left` rounds to an integer.
pub fn scroll_left(element: &Element) -> f64 {
    js_sys::Reflect::get(element, &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn set_scroll_left(element: &Element, value: f64) {
    let _ = js_sys::Reflect::set(
        element,
        &JsValue::from_str("scrollLeft"),
        &JsValue::from_f64(value),
    );
}

/// Smoothly scroll `element` horizontally by `delta`.
pub fn smooth_scroll_by(element: &Element, delta: f64) {
    let options = ScrollToOptions::new();
    options.set_left(delta);
    options.set_behavior(ScrollBehavior::Smooth);
    element.scroll_by_with_scroll_to_options(&options);
}

pub fn smooth_scroll_window_to_top() {
    if let Some(window) = window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

pub fn rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// Computed style value parsed as pixels, `0.0` when unavailable.
pub fn style_px(element: &Element, property: &str) -> f64 {
    window()
        .and_then(|w| w.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value(property).ok())
        .and_then(|value| value.trim_end_matches("px").trim().parse().ok())
        .unwrap_or(0.0)
}

/// Current time on the same origin as animation frame timestamps.
pub fn now() -> Timestamp {
    let millis = window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now());
    Timestamp::from_millis(millis)
}

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|query| query.matches())
}

pub fn navigate(url: &str) {
    if let Some(window) = window()
        && let Err(err) = window.location().set_href(url)
    {
        tracing::warn!(target: targets::WEB, ?err, "navigation failed");
    }
}

fn add_listener(
    target: &EventTarget,
    event: &str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
    passive: bool,
) {
    let result = if passive {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
    } else {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    };
    if let Err(err) = result {
        tracing::warn!(target: targets::WEB, event, ?err, "failed to add listener");
    }
    // Listeners live as long as the page.
    closure.forget();
}

/// Add a listener for events of type `E`. Events of another type are ignored.
pub fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    add_listener(target, event, closure, false);
}

/// Like [`listen`], registered as passive.
pub fn listen_passive<E, F>(target: &EventTarget, event: &str, mut handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    add_listener(target, event, closure, true);
}

/// Like [`listen`], registered for the capture phase.
pub fn listen_capture<E, F>(target: &EventTarget, event: &str, mut handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    if let Err(err) =
        target.add_event_listener_with_callback_and_bool(event, closure.as_ref().unchecked_ref(), true)
    {
        tracing::warn!(target: targets::WEB, event, ?err, "failed to add capture listener");
    }
    closure.forget();
}

pub fn pointer_events_supported() -> bool {
    window().is_some_and(|w| {
        js_sys::Reflect::has(&w, &JsValue::from_str("PointerEvent")).unwrap_or(false)
    })
}

/// Listen on the window.
pub fn listen_window<E, F>(event: &str, handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    if let Some(window) = window() {
        listen(&window, event, handler);
    }
}

/// Listen on the document.
pub fn listen_document<E, F>(event: &str, handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    if let Some(document) = document() {
        listen(&document, event, handler);
    }
}

pub fn intersection_observer_supported() -> bool {
    window().is_some_and(|w| {
        js_sys::Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    })
}

/// Observe `elements`, reporting `(index, intersecting)` for each entry.
///
/// The handler also receives the observer so it can stop watching an
/// element. Returns `None` when observation is unavailable.
pub fn observe<F>(
    elements: &[HtmlElement],
    threshold: f64,
    root_margin: Option<&str>,
    mut handler: F,
) -> Option<IntersectionObserver>
where
    F: FnMut(usize, bool, &IntersectionObserver) + 'static,
{
    if !intersection_observer_supported() {
        return None;
    }

    let targets_list: Vec<HtmlElement> = elements.to_vec();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                if let Some(index) = targets_list.iter().position(|el| {
                    let el: &Element = el;
                    *el == target
                }) {
                    handler(index, entry.is_intersecting(), &observer);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        init.set_root_margin(margin);
    }
    let observer =
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer,
            Err(err) => {
                tracing::warn!(target: targets::WEB, ?err, "failed to create observer");
                return None;
            }
        };
    callback.forget();

    for element in elements {
        observer.observe(element);
    }
    Some(observer)
}

/// Index of `element` within `elements`.
pub fn index_of(elements: &[HtmlElement], element: &Element) -> Option<usize> {
    elements.iter().position(|el| {
        let el: &Element = el;
        el == element
    })
}

/// The event target as an element.
pub fn target_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into().ok()
}

/// Nearest ancestor-or-self of the event target matching `selector`.
pub fn closest(event: &web_sys::Event, selector: &str) -> Option<Element> {
    target_element(event)?.closest(selector).ok().flatten()
}
