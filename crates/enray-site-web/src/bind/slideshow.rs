//! `.slideshow` image carousel with dots.

use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};

use enray_site::widget::{Direction, Key, Slideshow, SlideshowConfig, SlideshowSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Runtime, Shared, share, with};

struct SlideshowDom {
    track: HtmlElement,
    slides: Vec<HtmlElement>,
    dots: Option<HtmlElement>,
}

impl SlideshowSurface for SlideshowDom {
    fn render_dots(&mut self, count: usize, active: usize) {
        let Some(dots) = &self.dots else {
            return;
        };
        dots.set_inner_html("");
        for index in 0..count {
            let Some(dot) = dom::create("button") else {
                return;
            };
            dom::set_class(&dot, "active", index == active);
            dom::set_attr(&dot, "type", "button");
            dom::set_attr(&dot, "data-index", &index.to_string());
            dom::set_attr(
                &dot,
                "aria-label",
                &format!("Show image {} of {}", index + 1, count),
            );
            let _ = dots.append_child(&dot);
        }
    }

    fn show_slide(&mut self, index: usize, offset_percent: f64) {
        dom::set_style(&self.track, "transform", &format!("translateX({offset_percent}%)"));
        if let Some(dots) = &self.dots {
            for (i, dot) in dom::find_all(dots, "button").iter().enumerate() {
                dom::set_class(dot, "active", i == index);
            }
        }
        for (i, slide) in self.slides.iter().enumerate() {
            dom::set_class(slide, "active", i == index);
        }
    }
}

type SharedSlideshow = Shared<Slideshow, SlideshowDom>;

fn pause_on_hover(target: &Element, slideshow: &SharedSlideshow, touch: bool) {
    let stop = |slideshow: &SharedSlideshow| {
        let slideshow = slideshow.clone();
        move |_: web_sys::Event| {
            with(&slideshow, |show, _| show.stop());
        }
    };
    let start = |slideshow: &SharedSlideshow| {
        let slideshow = slideshow.clone();
        move |_: web_sys::Event| {
            with(&slideshow, |show, _| show.start(dom::now()));
        }
    };

    dom::listen(target, "mouseenter", stop(slideshow));
    dom::listen(target, "mouseleave", start(slideshow));
    dom::listen(target, "focusin", stop(slideshow));
    dom::listen(target, "focusout", start(slideshow));
    if touch {
        dom::listen_passive(target, "touchstart", stop(slideshow));
        dom::listen_passive(target, "touchend", start(slideshow));
    }
}

fn on_arrow(button: Option<HtmlElement>, slideshow: &SharedSlideshow, direction: Direction) {
    let Some(button) = button else {
        return;
    };
    let slideshow = slideshow.clone();
    dom::listen(&button, "click", move |event: MouseEvent| {
        event.prevent_default();
        with(&slideshow, |show, page| show.navigate(page, dom::now(), direction));
    });
}

pub fn install(config: &SlideshowConfig, reduced_motion: bool, runtime: &mut Runtime) {
    let Some(root) = dom::query(".slideshow") else {
        return;
    };
    let Some(track) = dom::find(&root, ".slideshow-track") else {
        tracing::debug!(target: targets::SLIDESHOW, "slideshow without track");
        return;
    };
    let slides = dom::find_all(&track, "img");
    for slide in &slides {
        dom::set_class(slide, "is-active", false);
    }
    let initially_active = slides.iter().position(|s| dom::has_class(s, "active"));
    let Some(widget) = Slideshow::new(slides.len(), initially_active, reduced_motion, config) else {
        tracing::debug!(target: targets::SLIDESHOW, "slideshow without slides");
        return;
    };

    let dots = dom::find(&root, ".slideshow-dots");
    let slideshow = share(
        widget,
        SlideshowDom {
            track,
            slides: slides.clone(),
            dots: dots.clone(),
        },
    );
    with(&slideshow, |show, page| show.attach(page, dom::now()));

    on_arrow(dom::find(&root, ".slideshow-prev"), &slideshow, Direction::Previous);
    on_arrow(dom::find(&root, ".slideshow-next"), &slideshow, Direction::Next);

    if let Some(dots) = dots {
        let slideshow = slideshow.clone();
        dom::listen(&dots, "click", move |event: MouseEvent| {
            let index = dom::closest(&event, "button")
                .and_then(|dot| dot.get_attribute("data-index"))
                .and_then(|i| i.parse::<usize>().ok());
            if let Some(index) = index {
                with(&slideshow, |show, page| show.dot_clicked(page, dom::now(), index));
            }
        });
    }

    pause_on_hover(&root, &slideshow, false);
    for slide in &slides {
        pause_on_hover(slide, &slideshow, true);
    }

    {
        let slideshow = slideshow.clone();
        dom::listen(&root, "keydown", move |event: KeyboardEvent| {
            let key = Key::from_dom(&event.key());
            with(&slideshow, |show, page| show.handle_key(page, dom::now(), key));
        });
    }

    runtime.tick_each_frame(&slideshow, |show, page, now| show.tick(page, now));
    tracing::debug!(target: targets::SLIDESHOW, slides = slides.len(), "slideshow installed");
}
