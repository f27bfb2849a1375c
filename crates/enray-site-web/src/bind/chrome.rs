//! Body-level modal state and the scroll-to-top button.

use web_sys::{HtmlElement, MouseEvent};

use enray_site::widget::{ChromeConfig, ChromeSurface, DialogKind, PageChrome};
use enray_site_core::logging::targets;

use crate::dom;
use crate::runtime::{Shared, share, with};

pub struct BodyChrome {
    body: HtmlElement,
    button: HtmlElement,
}

impl ChromeSurface for BodyChrome {
    fn set_modal_open(&mut self, open: bool) {
        dom::set_class(&self.body, "modal-open", open);
    }

    fn set_scroll_top_visible(&mut self, visible: bool) {
        dom::set_shown(&self.button, visible, "block");
    }

    fn scroll_to_top(&mut self) {
        dom::smooth_scroll_window_to_top();
    }
}

fn create_button(body: &HtmlElement) -> Option<HtmlElement> {
    let button = dom::create("button")?;
    button.set_class_name("scroll-to-top");
    button.set_inner_html(r#"<i class="fas fa-arrow-up"></i>"#);
    dom::set_attr(&button, "title", "Go to top");
    dom::set_attr(&button, "aria-label", "Go to top");
    dom::set_shown(&button, false, "block");
    body.append_child(&button).ok()?;
    Some(button)
}

pub type SharedChrome = Shared<PageChrome, BodyChrome>;

/// Mark a dialog open on the page.
pub fn push(chrome: Option<&SharedChrome>, kind: DialogKind) {
    if let Some(chrome) = chrome {
        with(chrome, |chrome, page| chrome.push_dialog(page, kind));
    }
}

/// Mark a dialog closed on the page.
pub fn pop(chrome: Option<&SharedChrome>, kind: DialogKind) {
    if let Some(chrome) = chrome {
        with(chrome, |chrome, page| chrome.pop_dialog(page, kind));
    }
}

/// Create the scroll-to-top button and track page scrolling.
pub fn install(config: &ChromeConfig) -> Option<SharedChrome> {
    let body = dom::document()?.body()?;
    let button = create_button(&body)?;

    let chrome = share(PageChrome::new(config.clone()), BodyChrome { body, button: button.clone() });
    with(&chrome, |chrome, page| chrome.scrolled(page, dom::scroll_y()));

    {
        let chrome = chrome.clone();
        dom::listen_window("scroll", move |_: web_sys::Event| {
            with(&chrome, |chrome, page| chrome.scrolled(page, dom::scroll_y()));
        });
    }
    {
        let chrome = chrome.clone();
        dom::listen(&button, "click", move |_: MouseEvent| {
            with(&chrome, |chrome, page| chrome.scroll_top_clicked(page));
        });
    }

    tracing::debug!(target: targets::CHROME, "page chrome installed");
    Some(chrome)
}
