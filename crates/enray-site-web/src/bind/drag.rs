//! Drag-to-scroll on horizontal tracks.
//!
//! Pointer events are used where available, mouse plus touch otherwise. A
//! capture-phase click listener on the track swallows the click that ends a
//! drag before it reaches a card. The pointer is captured only after a press
//! turns into a drag.

use web_sys::{HtmlElement, MouseEvent, PointerEvent, TouchEvent};

use enray_site::widget::{DragConfig, DragScroller, DragSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Runtime, Shared, share, with};

pub struct TrackDom {
    track: HtmlElement,
}

impl DragSurface for TrackDom {
    fn scroll_left(&self) -> f64 {
        dom::scroll_left(&self.track)
    }

    fn set_scroll_left(&mut self, value: f64) {
        dom::set_scroll_left(&self.track, value);
    }

    fn set_dragging(&mut self, dragging: bool) {
        dom::set_class(&self.track, "dragging", dragging);
    }
}

pub type SharedDrag = Shared<DragScroller, TrackDom>;

fn touch_x(event: &TouchEvent) -> Option<f64> {
    event
        .touches()
        .get(0)
        .map(|touch| f64::from(touch.client_x()))
}

fn install_pointer(track: &HtmlElement, drag: &SharedDrag) {
    {
        let drag = drag.clone();
        dom::listen(track, "pointerdown", move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let x = f64::from(event.client_x());
            with(&drag, |drag, page| drag.press(page, x, dom::now()));
        });
    }
    {
        let drag = drag.clone();
        let element = track.clone();
        dom::listen_window("pointermove", move |event: PointerEvent| {
            let x = f64::from(event.client_x());
            let capture = with(&drag, |drag, page| {
                drag.move_to(page, x, dom::now());
                drag.take_capture_request()
            })
            .unwrap_or(false);
            if capture {
                if let Err(err) = element.set_pointer_capture(event.pointer_id()) {
                    tracing::trace!(target: targets::DRAG, ?err, "pointer capture unavailable");
                }
            }
        });
    }
    {
        let drag = drag.clone();
        let element = track.clone();
        dom::listen_window("pointerup", move |event: PointerEvent| {
            with(&drag, |drag, page| drag.release(page, dom::now()));
            if element.has_pointer_capture(event.pointer_id()) {
                let _ = element.release_pointer_capture(event.pointer_id());
            }
        });
    }
    {
        let drag = drag.clone();
        dom::listen_window("pointercancel", move |_: PointerEvent| {
            with(&drag, |drag, page| drag.cancel(page));
        });
    }
}

fn install_mouse_and_touch(track: &HtmlElement, drag: &SharedDrag) {
    {
        let drag = drag.clone();
        dom::listen(track, "mousedown", move |event: MouseEvent| {
            let x = f64::from(event.client_x());
            with(&drag, |drag, page| drag.press(page, x, dom::now()));
        });
    }
    {
        let drag = drag.clone();
        dom::listen_window("mousemove", move |event: MouseEvent| {
            let x = f64::from(event.client_x());
            with(&drag, |drag, page| drag.move_to(page, x, dom::now()));
        });
    }
    {
        let drag = drag.clone();
        dom::listen_window("mouseup", move |_: MouseEvent| {
            with(&drag, |drag, page| drag.release(page, dom::now()));
        });
    }
    {
        let drag = drag.clone();
        dom::listen_passive(track, "touchstart", move |event: TouchEvent| {
            if let Some(x) = touch_x(&event) {
                with(&drag, |drag, page| drag.press(page, x, dom::now()));
            }
        });
    }
    {
        let drag = drag.clone();
        dom::listen_passive(track, "touchmove", move |event: TouchEvent| {
            if let Some(x) = touch_x(&event) {
                with(&drag, |drag, page| drag.move_to(page, x, dom::now()));
            }
        });
    }
    {
        let drag = drag.clone();
        dom::listen_passive(track, "touchend", move |_: TouchEvent| {
            with(&drag, |drag, page| drag.release(page, dom::now()));
        });
    }
}

/// Make `track` drag-scrollable with an already configured scroller.
///
/// Connect to the scroller's signals before calling this.
pub fn bind(track: &HtmlElement, scroller: DragScroller, runtime: &mut Runtime) -> SharedDrag {
    let drag = share(scroller, TrackDom { track: track.clone() });

    if dom::pointer_events_supported() {
        install_pointer(track, &drag);
    } else {
        install_mouse_and_touch(track, &drag);
    }

    {
        let drag = drag.clone();
        dom::listen_capture(track, "click", move |event: MouseEvent| {
            let suppress = with(&drag, |drag, _| drag.take_click_suppression()).unwrap_or(false);
            if suppress {
                tracing::trace!(target: targets::DRAG, "click after drag suppressed");
                event.prevent_default();
                event.stop_propagation();
            }
        });
    }

    runtime.tick_each_frame(&drag, |drag, page, now| drag.tick(page, now));
    drag
}

/// Drag-to-scroll for every `.h-scroll` product strip.
pub fn install_strips(config: &DragConfig, runtime: &mut Runtime) {
    let strips = dom::query_all(".h-scroll");
    for strip in &strips {
        bind(strip, DragScroller::new(config.clone()), runtime);
    }
    if !strips.is_empty() {
        tracing::debug!(target: targets::DRAG, count = strips.len(), "strip drag installed");
    }
}
