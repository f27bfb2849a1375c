//! `.product-scroll` marquees.

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, IntersectionObserver};

use enray_site::widget::{MarqueeConfig, MarqueeLayout, MarqueeScroller, MarqueeSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Runtime, Shared, share, with};

struct StripDom {
    track: HtmlElement,
    // The items before cloning.
    items: Vec<HtmlElement>,
}

impl MarqueeSurface for StripDom {
    fn scroll_left(&self) -> f64 {
        dom::scroll_left(&self.track)
    }

    fn set_scroll_left(&mut self, value: f64) {
        dom::set_scroll_left(&self.track, value);
    }

    fn clone_items(&mut self) {
        for item in &self.items {
            if let Ok(copy) = item.clone_node_with_deep(true) {
                if let Some(copy) = copy.dyn_ref::<HtmlElement>() {
                    dom::set_attr(copy, "aria-hidden", "true");
                }
                let _ = self.track.append_child(&copy);
            }
        }
    }

    fn set_active(&mut self) {
        dom::set_class(&self.track, "marquee-active", true);
    }

    fn item_widths(&self) -> Vec<f64> {
        self.items.iter().map(|item| dom::rect(item).width).collect()
    }

    fn gap(&self) -> f64 {
        match dom::style_px(&self.track, "column-gap") {
            gap if gap > 0.0 => gap,
            _ => dom::style_px(&self.track, "gap"),
        }
    }
}

type SharedStrip = Shared<MarqueeScroller, StripDom>;

fn set_flag(target: &HtmlElement, event: &str, strip: &SharedStrip, apply: fn(&mut MarqueeScroller)) {
    let strip = strip.clone();
    dom::listen(target, event, move |_: web_sys::Event| {
        with(&strip, |marquee, _| apply(marquee));
    });
}

fn install_one(track: HtmlElement, config: &MarqueeConfig, runtime: &mut Runtime) {
    let items = dom::find_all(&track, ":scope > *");
    let layout = MarqueeLayout {
        item_count: items.len(),
        scroll_width: f64::from(track.scroll_width()),
        client_width: f64::from(track.client_width()),
    };
    let mut page = StripDom { track: track.clone(), items };
    let marquee = match MarqueeScroller::attach(&mut page, layout, false, config.clone(), dom::now()) {
        Ok(marquee) => marquee,
        Err(skip) => {
            tracing::debug!(target: targets::MARQUEE, %skip, "marquee left static");
            return;
        }
    };
    let strip = share(marquee, page);

    set_flag(&track, "mouseenter", &strip, |m| m.set_hovered(true));
    set_flag(&track, "mouseleave", &strip, |m| m.set_hovered(false));
    set_flag(&track, "focusin", &strip, |m| m.set_focused(true));
    set_flag(&track, "focusout", &strip, |m| m.set_focused(false));
    set_flag(&track, "mousedown", &strip, MarqueeScroller::pointer_down);
    {
        let strip = strip.clone();
        dom::listen_passive(&track, "touchstart", move |_: web_sys::Event| {
            with(&strip, |marquee, _| marquee.pointer_down());
        });
    }
    for event in ["mouseup", "touchend"] {
        let strip = strip.clone();
        dom::listen_window(event, move |_: web_sys::Event| {
            with(&strip, |marquee, _| marquee.pointer_up(dom::now()));
        });
    }
    {
        let strip = strip.clone();
        dom::listen_window("resize", move |_: web_sys::Event| {
            with(&strip, |marquee, page| marquee.resize(page));
        });
    }

    let in_view = {
        let strip = strip.clone();
        move |_: usize, intersecting: bool, _: &IntersectionObserver| {
            with(&strip, |marquee, _| marquee.set_in_view(intersecting));
        }
    };
    if dom::observe(&[track.clone()], config.view_threshold, None, in_view).is_none() {
        with(&strip, |marquee, _| marquee.set_in_view(true));
    }

    runtime.tick_each_frame(&strip, |marquee, page, now| marquee.tick(page, now));
    tracing::debug!(target: targets::MARQUEE, "marquee installed");
}

pub fn install(config: &MarqueeConfig, reduced_motion: bool, runtime: &mut Runtime) {
    if reduced_motion {
        tracing::debug!(target: targets::MARQUEE, "reduced motion, marquees left static");
        return;
    }
    for track in dom::query_all(".product-scroll") {
        install_one(track, config, runtime);
    }
}
