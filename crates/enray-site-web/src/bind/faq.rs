//! `.faq-item` accordion.

use web_sys::{HtmlElement, MouseEvent};

use enray_site::widget::{FaqAccordion, FaqSurface};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{share, with};

struct FaqDom {
    items: Vec<HtmlElement>,
}

impl FaqSurface for FaqDom {
    fn set_open(&mut self, index: usize, open: bool) {
        if let Some(item) = self.items.get(index) {
            dom::set_class(item, "active", open);
        }
    }
}

pub fn install() {
    let items = dom::query_all(".faq-item");
    if items.is_empty() {
        return;
    }
    let initially_open = items.iter().position(|item| dom::has_class(item, "active"));
    let questions: Vec<Option<HtmlElement>> =
        items.iter().map(|item| dom::find(item, ".faq-question")).collect();
    let faq = share(FaqAccordion::new(items.len(), initially_open), FaqDom { items });

    for (index, question) in questions.into_iter().enumerate() {
        let Some(question) = question else {
            continue;
        };
        let faq = faq.clone();
        dom::listen(&question, "click", move |_: MouseEvent| {
            with(&faq, |faq, page| faq.toggle(page, index));
        });
    }
    tracing::debug!(target: targets::FAQ, "faq installed");
}
