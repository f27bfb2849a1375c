//! `#contact-form` inline validation.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlFormElement, HtmlInputElement};

use enray_site::form::{ContactConfig, ContactForm, ContactSurface, FieldError, FieldKind, FieldSpec, FormValidator};
use enray_site_core::logging::{span_names, targets};

use crate::dom;
use crate::runtime::{Runtime, share, with};

struct ContactDom {
    form: HtmlFormElement,
    fields: Vec<HtmlElement>,
    success: Option<HtmlElement>,
}

impl ContactSurface for ContactDom {
    fn field_value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| dom::value(field))
            .unwrap_or_default()
    }

    fn set_field_error(&mut self, index: usize, error: Option<FieldError>) {
        let Some(field) = self.fields.get(index) else {
            return;
        };
        dom::set_class(field, "error", error.is_some());
        let Some(parent) = field.parent_element() else {
            return;
        };
        if let Some(existing) = dom::find(&parent, ".error-message") {
            existing.remove();
        }
        if let Some(error) = error
            && let Some(message) = dom::create("div")
        {
            message.set_class_name("error-message");
            dom::set_text(&message, error.message());
            let _ = parent.append_child(&message);
        }
    }

    fn show_success(&mut self, message: &str) {
        self.hide_success();
        let Some(element) = dom::create("div") else {
            return;
        };
        element.set_class_name("success-message");
        dom::set_attr(&element, "role", "status");
        dom::set_text(&element, message);
        let _ = self.form.append_child(&element);
        self.success = Some(element);
    }

    fn hide_success(&mut self) {
        if let Some(element) = self.success.take() {
            element.remove();
        }
    }

    fn reset(&mut self) {
        self.form.reset();
    }
}

fn field_spec(field: &HtmlElement) -> FieldSpec {
    let input_type = field
        .dyn_ref::<HtmlInputElement>()
        .map(|input| input.type_())
        .unwrap_or_default();
    FieldSpec::new(
        FieldKind::from_element(&field.tag_name(), &input_type),
        field.has_attribute("required"),
    )
}

pub fn install(config: &ContactConfig, validator: Rc<FormValidator>, runtime: &mut Runtime) {
    let Some(form) = dom::query("#contact-form").and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
    else {
        tracing::debug!(target: targets::FORM, "no contact form");
        return;
    };
    let fields = dom::find_all(&form, "input, textarea, select");
    let specs = fields.iter().map(field_spec).collect();

    let contact = share(
        ContactForm::new(validator, specs, config),
        ContactDom {
            form: form.clone(),
            fields: fields.clone(),
            success: None,
        },
    );

    for (index, field) in fields.iter().enumerate() {
        {
            let contact = contact.clone();
            dom::listen(field, "blur", move |_: Event| {
                with(&contact, |contact, page| contact.blur(page, index));
            });
        }
        {
            let contact = contact.clone();
            dom::listen(field, "input", move |_: Event| {
                with(&contact, |contact, page| contact.input(page, index));
            });
        }
    }
    {
        let contact = contact.clone();
        dom::listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            let _span = tracing::debug_span!(span_names::SUBMIT, form = "contact").entered();
            with(&contact, |contact, page| contact.submit(page, dom::now()));
        });
    }

    runtime.tick_each_frame(&contact, |contact, page, now| contact.tick(page, now));
    tracing::debug!(target: targets::FORM, fields = fields.len(), "contact form installed");
}
