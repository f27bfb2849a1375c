//! `.stats .stat-number` counters.

use web_sys::{HtmlElement, IntersectionObserver};

use enray_site::widget::{StatConfig, StatCounter, StatSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Runtime, share, with};

struct StatsDom {
    numbers: Vec<HtmlElement>,
}

impl StatSurface for StatsDom {
    fn set_text(&mut self, index: usize, text: &str) {
        if let Some(number) = self.numbers.get(index) {
            dom::set_text(number, text);
        }
    }
}

pub fn install(config: &StatConfig, runtime: &mut Runtime) {
    let Some(section) = dom::query(".stats") else {
        tracing::debug!(target: targets::STATS, "no stats section");
        return;
    };
    let numbers = dom::find_all(&section, ".stat-number");
    let texts: Vec<(String, bool)> = numbers
        .iter()
        .map(|n| (dom::text(n), dom::has_class(n, "stat-number-label")))
        .collect();
    let counter = StatCounter::new(texts.iter().map(|(t, label)| (t.as_str(), *label)), config);
    let stats = share(counter, StatsDom { numbers });

    let handler = {
        let stats = stats.clone();
        let section = section.clone();
        move |_: usize, intersecting: bool, observer: &IntersectionObserver| {
            let started = with(&stats, |counter, _| counter.set_in_view(dom::now(), intersecting));
            if started == Some(true) {
                observer.unobserve(&section);
            }
        }
    };
    if dom::observe(&[section], config.threshold, None, handler).is_none() {
        // Without observation there is no scroll position to wait for.
        with(&stats, |counter, _| counter.set_in_view(dom::now(), true));
    }

    runtime.tick_each_frame(&stats, |counter, page, now| counter.tick(page, now));
    tracing::debug!(target: targets::STATS, "stat counter installed");
}
