//! The `#quoteModal` quote request dialog.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlElement, HtmlFormElement, HtmlOptionElement, HtmlSelectElement,
    KeyboardEvent, MouseEvent,
};

use enray_site::form::{FormValidator, QuoteConfig, QuoteField, QuoteRequestForm, QuoteSurface};
use enray_site::gallery::Catalog;
use enray_site::widget::{DialogKind, Key};
use enray_site_core::logging::{span_names, targets};

use crate::bind::chrome::{self, SharedChrome};
use crate::dom;
use crate::runtime::{Runtime, Shared, share, with};

struct QuoteDom {
    modal: HtmlElement,
    form: HtmlFormElement,
    category: HtmlSelectElement,
    machine: HtmlSelectElement,
    status: Option<HtmlElement>,
}

fn option(value: &str, label: &str) -> Option<HtmlOptionElement> {
    let option: HtmlOptionElement = dom::create("option")?.dyn_into().ok()?;
    option.set_value(value);
    dom::set_text(&option, label);
    Some(option)
}

impl QuoteSurface for QuoteDom {
    fn show(&mut self) {
        dom::set_shown(&self.modal, true, "block");
        dom::set_attr(&self.modal, "aria-hidden", "false");
    }

    fn hide(&mut self) {
        dom::set_shown(&self.modal, false, "block");
        dom::set_attr(&self.modal, "aria-hidden", "true");
    }

    fn set_category_options(&mut self, options: &[(&str, &str)]) {
        while self.category.length() > 1 {
            self.category.remove_with_index(1);
        }
        for (id, title) in options {
            if let Some(option) = option(id, title) {
                let _ = self.category.append_child(&option);
            }
        }
    }

    fn set_machine_options(&mut self, placeholder: &str, machines: &[&str]) {
        self.machine.set_inner_html("");
        if let Some(first) = option("", placeholder) {
            first.set_disabled(true);
            first.set_selected(true);
            let _ = self.machine.append_child(&first);
        }
        for name in machines {
            if let Some(option) = option(name, name) {
                let _ = self.machine.append_child(&option);
            }
        }
    }

    fn set_machine_enabled(&mut self, enabled: bool) {
        self.machine.set_disabled(!enabled);
    }

    fn value(&self, field: QuoteField) -> String {
        dom::by_id(field.element_id())
            .map(|element| dom::value(&element))
            .unwrap_or_default()
    }

    fn set_field_invalid(&mut self, field: QuoteField, invalid: bool) {
        if let Some(element) = dom::by_id(field.element_id()) {
            dom::set_class(&element, "error", invalid);
        }
    }

    fn set_status(&mut self, text: &str) {
        if let Some(status) = &self.status {
            dom::set_text(status, text);
        }
    }

    fn reset(&mut self) {
        self.form.reset();
    }

    fn focus_field(&mut self, field: QuoteField) {
        if let Some(element) = dom::by_id(field.element_id()) {
            dom::focus(&element);
        }
    }

    fn navigate(&mut self, url: &str) {
        dom::navigate(url);
    }
}

type SharedQuote = Shared<QuoteRequestForm, QuoteDom>;

fn element<T: JsCast>(id: &str) -> Option<T> {
    dom::by_id(id)?.dyn_into().ok()
}

fn close_on_click(target: Option<HtmlElement>, quote: &SharedQuote) {
    if let Some(target) = target {
        let quote = quote.clone();
        dom::listen(&target, "click", move |_: MouseEvent| {
            with(&quote, |quote, page| quote.close(page));
        });
    }
}

/// Wire the quote dialog. Missing markup leaves the page untouched.
pub fn install(
    config: &QuoteConfig,
    catalog: Rc<Catalog>,
    validator: Rc<FormValidator>,
    chrome: Option<SharedChrome>,
    runtime: &mut Runtime,
) {
    let (Some(button), Some(modal), Some(form), Some(category), Some(machine)) = (
        dom::by_id("getQuoteBtn"),
        dom::by_id("quoteModal"),
        element::<HtmlFormElement>("quote-form"),
        element::<HtmlSelectElement>(QuoteField::Category.element_id()),
        element::<HtmlSelectElement>(QuoteField::Machine.element_id()),
    ) else {
        tracing::debug!(target: targets::FORM, "no quote dialog");
        return;
    };

    let widget = QuoteRequestForm::new(catalog, validator, config.clone());
    {
        let chrome = chrome.clone();
        widget.opened.connect(move |_| chrome::push(chrome.as_ref(), DialogKind::Quote));
    }
    widget.closed.connect(move |_| chrome::pop(chrome.as_ref(), DialogKind::Quote));
    widget.submitted.connect(|url: &String| {
        tracing::info!(target: targets::FORM, len = url.len(), "quote request handed to mail client");
    });

    let page = QuoteDom {
        modal: modal.clone(),
        form: form.clone(),
        category: category.clone(),
        machine,
        status: dom::by_id("q-status"),
    };
    let quote = share(widget, page);

    {
        let quote = quote.clone();
        dom::listen(&button, "click", move |event: MouseEvent| {
            event.prevent_default();
            with(&quote, |quote, page| quote.open(page, dom::now()));
        });
    }
    close_on_click(dom::find(&modal, ".modal-close"), &quote);
    close_on_click(dom::by_id("q-cancel"), &quote);
    {
        let quote = quote.clone();
        let backdrop = modal.clone();
        dom::listen(&modal, "click", move |event: MouseEvent| {
            let on_backdrop = dom::target_element(&event).is_some_and(|target| {
                let backdrop: &Element = &backdrop;
                &target == backdrop
            });
            if on_backdrop {
                with(&quote, |quote, page| quote.backdrop_click(page));
            }
        });
    }
    {
        let quote = quote.clone();
        dom::listen_document("keydown", move |event: KeyboardEvent| {
            let key = Key::from_dom(&event.key());
            with(&quote, |quote, page| quote.handle_key(page, key));
        });
    }
    {
        let quote = quote.clone();
        let select = category.clone();
        dom::listen(&category, "change", move |_: Event| {
            let id = select.value();
            with(&quote, |quote, page| quote.category_changed(page, &id));
        });
    }
    {
        let quote = quote.clone();
        dom::listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            let _span = tracing::debug_span!(span_names::SUBMIT, form = "quote").entered();
            with(&quote, |quote, page| quote.submit(page, dom::now()));
        });
    }

    runtime.tick_each_frame(&quote, |quote, page, now| quote.tick(page, now));
    tracing::debug!(target: targets::FORM, "quote dialog installed");
}
