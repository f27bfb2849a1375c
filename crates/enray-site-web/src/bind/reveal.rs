//! Scroll-triggered reveal of content blocks.

use web_sys::{HtmlElement, IntersectionObserver};

use enray_site::widget::{RevealAnimator, RevealConfig, RevealSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{share, with};

const TARGETS: &str = ".insight-card, .features-text, .features-image, .product-card, \
    .service-item, .team-member, .mv-card, .impact-card, .tech-item, .cert-item, .goal-item";

struct RevealDom {
    elements: Vec<HtmlElement>,
    observer: Option<IntersectionObserver>,
}

impl RevealSurface for RevealDom {
    fn prepare_hidden(&mut self, index: usize, config: &RevealConfig) {
        let Some(element) = self.elements.get(index) else {
            return;
        };
        let seconds = config.transition_ms as f64 / 1000.0;
        dom::set_style(element, "opacity", "0");
        dom::set_style(element, "transform", &format!("translateY({}px)", config.offset));
        dom::set_style(
            element,
            "transition",
            &format!("opacity {seconds}s ease, transform {seconds}s ease"),
        );
    }

    fn reveal(&mut self, index: usize) {
        if let Some(element) = self.elements.get(index) {
            dom::set_style(element, "opacity", "1");
            dom::set_style(element, "transform", "translateY(0)");
        }
    }

    fn unobserve(&mut self, index: usize) {
        if let (Some(observer), Some(element)) = (&self.observer, self.elements.get(index)) {
            observer.unobserve(element);
        }
    }
}

pub fn install(config: &RevealConfig) {
    let elements = dom::query_all(TARGETS);
    if elements.is_empty() {
        tracing::debug!(target: targets::REVEAL, "nothing to reveal");
        return;
    }

    let supported = dom::intersection_observer_supported();
    let animator = RevealAnimator::new(elements.len(), config.clone());
    let reveal = share(
        animator,
        RevealDom {
            elements: elements.clone(),
            observer: None,
        },
    );
    with(&reveal, |animator, page| animator.attach(page, supported));
    if !supported {
        return;
    }

    let handler = {
        let reveal = reveal.clone();
        move |index: usize, intersecting: bool, _: &IntersectionObserver| {
            with(&reveal, |animator, page| animator.intersection(page, index, intersecting));
        }
    };
    match dom::observe(&elements, config.threshold, None, handler) {
        Some(observer) => {
            with(&reveal, |_, page| page.observer = Some(observer));
            tracing::debug!(target: targets::REVEAL, count = elements.len(), "reveal installed");
        }
        None => {
            with(&reveal, |animator, page| animator.reveal_all_immediately(page));
        }
    }
}
