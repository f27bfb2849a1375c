//! Quote request dialog.
//!
//! The dialog offers the catalog's categories and, once one is chosen, the
//! machines pictured in that category. A valid submission is turned into a
//! `mailto:` link; there is no way to learn whether a mail client actually
//! opened, so the status line falls back to the plain address after a short
//! delay.
//!
//! # Signals
//!
//! - `opened(())`, `closed(())`: dialog visibility changed
//! - `submitted(String)`: a valid request was sent, with its `mailto:` URL

use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Signal, Timer, Timestamp};

use crate::gallery::Catalog;
use crate::widget::Key;

use super::validator::FormValidator;

/// Placeholder of the machine select.
pub const MACHINE_PLACEHOLDER: &str = "Select a machine";
/// Status after a submit with missing or invalid fields.
pub const STATUS_INCOMPLETE: &str = "Please complete the required fields.";
/// Status right after navigating to the `mailto:` link.
pub const STATUS_OPENING: &str = "Opening your email client...";

/// The dialog's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    Name,
    Email,
    Phone,
    Company,
    Category,
    Machine,
    Message,
}

impl QuoteField {
    /// Fields that must be filled in.
    pub const REQUIRED: [QuoteField; 4] = [
        QuoteField::Name,
        QuoteField::Email,
        QuoteField::Category,
        QuoteField::Machine,
    ];

    /// Element id of the field.
    pub fn element_id(self) -> &'static str {
        match self {
            QuoteField::Name => "q-name",
            QuoteField::Email => "q-email",
            QuoteField::Phone => "q-phone",
            QuoteField::Company => "q-company",
            QuoteField::Category => "q-category",
            QuoteField::Machine => "q-machine",
            QuoteField::Message => "q-message",
        }
    }
}

/// The page side of a [`QuoteRequestForm`].
pub trait QuoteSurface {
    fn show(&mut self);
    fn hide(&mut self);

    /// Replace the category options after the placeholder with `(id, title)`
    /// pairs.
    fn set_category_options(&mut self, options: &[(&str, &str)]);

    /// Replace the machine options: a disabled, selected placeholder followed
    /// by one option per machine.
    fn set_machine_options(&mut self, placeholder: &str, machines: &[&str]);

    fn set_machine_enabled(&mut self, enabled: bool);
    fn value(&self, field: QuoteField) -> String;
    fn set_field_invalid(&mut self, field: QuoteField, invalid: bool);
    fn set_status(&mut self, text: &str);

    /// Reset every field to its initial value.
    fn reset(&mut self);

    fn focus_field(&mut self, field: QuoteField);

    /// Navigate the page to `url`.
    fn navigate(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Address requests are sent to.
    pub recipient: String,
    /// Delay before the fallback status replaces the opening status.
    pub fallback_ms: u64,
    /// Delay before the name field is focused on open.
    pub focus_delay_ms: u64,
}

impl QuoteConfig {
    /// Status shown when the mail client may not have opened.
    pub fn fallback_status(&self) -> String {
        format!(
            "If your email app did not open, please email us directly at {}.",
            self.recipient
        )
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            recipient: "sales@enray.co.in".to_owned(),
            fallback_ms: 1500,
            focus_delay_ms: 50,
        }
    }
}

/// A validated quote request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub category: String,
    /// Category title, or the id when the catalog does not know it.
    pub category_label: String,
    pub machine: String,
    pub message: String,
}

impl QuoteRequest {
    pub fn subject(&self) -> String {
        let machine = if self.machine.is_empty() {
            "General"
        } else {
            self.machine.as_str()
        };
        format!("Quote Request: {} - {}", self.category_label, machine)
    }

    /// Mail body; optional fields appear only when filled in.
    pub fn body(&self) -> String {
        let mut lines = vec![format!("Name: {}", self.name), format!("Email: {}", self.email)];
        if !self.phone.is_empty() {
            lines.push(format!("Phone: {}", self.phone));
        }
        if !self.company.is_empty() {
            lines.push(format!("Company: {}", self.company));
        }
        lines.push(format!("Category: {}", self.category_label));
        if !self.machine.is_empty() {
            lines.push(format!("Machine: {}", self.machine));
        }
        lines.push(String::new());
        lines.push("Requirements:".to_owned());
        lines.push(if self.message.is_empty() {
            "(none)".to_owned()
        } else {
            self.message.clone()
        });
        lines.join("\n")
    }

    /// Percent-encoded `mailto:` URL.
    pub fn mailto(&self, recipient: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            urlencoding::encode(&self.subject()),
            urlencoding::encode(&self.body())
        )
    }
}

/// Result of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// The request was valid and the page navigated to its `mailto:` URL.
    Sent(QuoteRequest),
    /// These required fields are missing or invalid.
    Invalid(Vec<QuoteField>),
}

pub struct QuoteRequestForm {
    catalog: Rc<Catalog>,
    validator: Rc<FormValidator>,
    config: QuoteConfig,
    open: bool,
    focus_timer: Timer,
    fallback_timer: Timer,

    pub opened: Signal<()>,
    pub closed: Signal<()>,
    pub submitted: Signal<String>,
}

impl QuoteRequestForm {
    pub fn new(catalog: Rc<Catalog>, validator: Rc<FormValidator>, config: QuoteConfig) -> Self {
        Self {
            catalog,
            validator,
            config,
            open: false,
            focus_timer: Timer::new(),
            fallback_timer: Timer::new(),
            opened: Signal::new(),
            closed: Signal::new(),
            submitted: Signal::new(),
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Open the dialog.
    pub fn open<S: QuoteSurface>(&mut self, surface: &mut S, now: Timestamp) {
        surface.set_category_options(&self.catalog.options());
        surface.set_machine_enabled(false);
        surface.show();
        self.open = true;
        self.focus_timer
            .start_one_shot(now, Duration::from_millis(self.config.focus_delay_ms));
        tracing::debug!(target: targets::FORM, "quote dialog opened");
        self.opened.emit(());
    }

    /// Close the dialog, clearing the status and resetting the form.
    ///
    /// Returns `false` if it was not open.
    pub fn close<S: QuoteSurface>(&mut self, surface: &mut S) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.focus_timer.stop();
        self.fallback_timer.stop();
        surface.hide();
        surface.set_status("");
        surface.reset();
        surface.set_machine_enabled(false);
        tracing::debug!(target: targets::FORM, "quote dialog closed");
        self.closed.emit(());
        true
    }

    /// A click landed on the backdrop itself.
    pub fn backdrop_click<S: QuoteSurface>(&mut self, surface: &mut S) -> bool {
        self.close(surface)
    }

    /// Escape closes the dialog.
    pub fn handle_key<S: QuoteSurface>(&mut self, surface: &mut S, key: Key) -> bool {
        key == Key::Escape && self.close(surface)
    }

    /// The category select changed: offer that category's machines.
    pub fn category_changed<S: QuoteSurface>(&mut self, surface: &mut S, category_id: &str) {
        let machines = match self.catalog.get(category_id) {
            Ok(category) => category.machine_names(),
            Err(error) => {
                tracing::debug!(target: targets::FORM, %error, "no machines");
                Vec::new()
            }
        };
        surface.set_machine_options(MACHINE_PLACEHOLDER, &machines);
        surface.set_machine_enabled(!machines.is_empty());
    }

    fn field_valid<S: QuoteSurface>(&self, surface: &S, field: QuoteField) -> bool {
        let value = surface.value(field);
        let value = value.trim();
        !value.is_empty() && (field != QuoteField::Email || self.validator.is_valid_email(value))
    }

    /// Validate and, if valid, navigate to the request's `mailto:` URL.
    pub fn submit<S: QuoteSurface>(&mut self, surface: &mut S, now: Timestamp) -> QuoteOutcome {
        surface.set_status("");
        self.fallback_timer.stop();

        let mut invalid = Vec::new();
        for field in QuoteField::REQUIRED {
            let valid = self.field_valid(surface, field);
            surface.set_field_invalid(field, !valid);
            if !valid {
                invalid.push(field);
            }
        }
        if !invalid.is_empty() {
            tracing::debug!(target: targets::FORM, ?invalid, "quote request incomplete");
            surface.set_status(STATUS_INCOMPLETE);
            return QuoteOutcome::Invalid(invalid);
        }

        let trimmed = |field| surface.value(field).trim().to_owned();
        let category = surface.value(QuoteField::Category);
        let request = QuoteRequest {
            name: trimmed(QuoteField::Name),
            email: trimmed(QuoteField::Email),
            phone: trimmed(QuoteField::Phone),
            company: trimmed(QuoteField::Company),
            category_label: self
                .catalog
                .title_of(&category)
                .unwrap_or(category.as_str())
                .to_owned(),
            category,
            machine: surface.value(QuoteField::Machine),
            message: trimmed(QuoteField::Message),
        };

        let url = request.mailto(&self.config.recipient);
        surface.navigate(&url);
        surface.set_status(STATUS_OPENING);
        self.fallback_timer
            .start_one_shot(now, Duration::from_millis(self.config.fallback_ms));
        self.submitted.emit(url);
        QuoteOutcome::Sent(request)
    }

    pub fn tick<S: QuoteSurface>(&mut self, surface: &mut S, now: Timestamp) {
        if self.focus_timer.poll(now) && self.open {
            surface.focus_field(QuoteField::Name);
        }
        if self.fallback_timer.poll(now) {
            surface.set_status(&self.config.fallback_status());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Dialog {
        visible: bool,
        categories: Vec<String>,
        machines: Vec<String>,
        machine_enabled: bool,
        values: HashMap<QuoteField, String>,
        invalid: Vec<QuoteField>,
        status: String,
        resets: usize,
        focused: Option<QuoteField>,
        url: Option<String>,
    }

    impl Dialog {
        fn fill(&mut self, field: QuoteField, value: &str) {
            self.values.insert(field, value.to_owned());
        }
    }

    impl QuoteSurface for Dialog {
        fn show(&mut self) {
            self.visible = true;
        }
        fn hide(&mut self) {
            self.visible = false;
        }
        fn set_category_options(&mut self, options: &[(&str, &str)]) {
            self.categories = options.iter().map(|(id, _)| id.to_string()).collect();
        }
        fn set_machine_options(&mut self, _placeholder: &str, machines: &[&str]) {
            self.machines = machines.iter().map(|m| m.to_string()).collect();
        }
        fn set_machine_enabled(&mut self, enabled: bool) {
            self.machine_enabled = enabled;
        }
        fn value(&self, field: QuoteField) -> String {
            self.values.get(&field).cloned().unwrap_or_default()
        }
        fn set_field_invalid(&mut self, field: QuoteField, invalid: bool) {
            self.invalid.retain(|f| *f != field);
            if invalid {
                self.invalid.push(field);
            }
        }
        fn set_status(&mut self, text: &str) {
            self.status = text.to_owned();
        }
        fn reset(&mut self) {
            self.values.clear();
            self.resets += 1;
        }
        fn focus_field(&mut self, field: QuoteField) {
            self.focused = Some(field);
        }
        fn navigate(&mut self, url: &str) {
            self.url = Some(url.to_owned());
        }
    }

    fn form() -> QuoteRequestForm {
        QuoteRequestForm::new(
            Rc::new(Catalog::builtin().unwrap()),
            Rc::new(FormValidator::new().unwrap()),
            QuoteConfig::default(),
        )
    }

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_open_populates_and_focuses() {
        let mut dialog = Dialog::default();
        let mut form = form();
        form.open(&mut dialog, ms(0.0));

        assert!(dialog.visible);
        assert_eq!(dialog.categories.len(), 6);
        assert_eq!(dialog.categories[0], "sheet-metal");
        assert!(!dialog.machine_enabled);

        form.tick(&mut dialog, ms(49.0));
        assert_eq!(dialog.focused, None);
        form.tick(&mut dialog, ms(50.0));
        assert_eq!(dialog.focused, Some(QuoteField::Name));
    }

    #[test]
    fn test_dependent_machine_select() {
        let mut dialog = Dialog::default();
        let mut form = form();
        form.open(&mut dialog, ms(0.0));

        form.category_changed(&mut dialog, "tubular");
        assert!(dialog.machine_enabled);
        assert!(!dialog.machines.is_empty());

        form.category_changed(&mut dialog, "infrastructure");
        assert!(dialog.machine_enabled);
        assert_eq!(
            dialog.machines,
            vec!["Powder Coating Room", "Press Shop", "Tool Room"]
        );

        form.category_changed(&mut dialog, "nope");
        assert!(!dialog.machine_enabled);
        assert!(dialog.machines.is_empty());
    }

    #[test]
    fn test_uncaptioned_category_disables_machine_select() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"id":"press","title":"Press","images":[{"src":"p.png","caption":"Press Brake"}]},
                {"id":"site","title":"Site","images":[{"src":"a.png","caption":""},{"src":"b.png"}]}
            ]"#,
        )
        .unwrap();
        let mut form = QuoteRequestForm::new(
            Rc::new(catalog),
            Rc::new(FormValidator::new().unwrap()),
            QuoteConfig::default(),
        );
        let mut dialog = Dialog::default();
        form.open(&mut dialog, ms(0.0));

        form.category_changed(&mut dialog, "press");
        assert!(dialog.machine_enabled);
        assert_eq!(dialog.machines, vec!["Press Brake"]);

        form.category_changed(&mut dialog, "site");
        assert!(!dialog.machine_enabled);
        assert!(dialog.machines.is_empty());
    }

    #[test]
    fn test_incomplete_submit() {
        let mut dialog = Dialog::default();
        let mut form = form();
        form.open(&mut dialog, ms(0.0));
        dialog.fill(QuoteField::Name, "Ravi");
        dialog.fill(QuoteField::Email, "ravi@example");

        let outcome = form.submit(&mut dialog, ms(0.0));
        assert_eq!(
            outcome,
            QuoteOutcome::Invalid(vec![QuoteField::Email, QuoteField::Category, QuoteField::Machine])
        );
        assert_eq!(dialog.status, STATUS_INCOMPLETE);
        assert!(dialog.url.is_none());
    }

    #[test]
    fn test_successful_submit_builds_mailto() {
        let mut dialog = Dialog::default();
        let mut form = form();
        form.open(&mut dialog, ms(0.0));
        dialog.fill(QuoteField::Name, " Ravi ");
        dialog.fill(QuoteField::Email, "ravi@example.com");
        dialog.fill(QuoteField::Category, "welding");
        dialog.fill(QuoteField::Machine, "MIG Welder");

        let QuoteOutcome::Sent(request) = form.submit(&mut dialog, ms(100.0)) else {
            panic!("expected a sent request");
        };
        assert_eq!(request.name, "Ravi");
        assert_eq!(request.category_label, "Robotic and Specialized Welding");
        assert_eq!(
            request.subject(),
            "Quote Request: Robotic and Specialized Welding - MIG Welder"
        );
        assert_eq!(
            request.body(),
            "Name: Ravi\nEmail: ravi@example.com\nCategory: Robotic and Specialized Welding\n\
             Machine: MIG Welder\n\nRequirements:\n(none)"
        );

        let url = dialog.url.clone().unwrap();
        assert!(url.starts_with(
            "mailto:sales@enray.co.in?subject=Quote%20Request%3A%20Robotic%20and%20Specialized%20Welding%20-%20MIG%20Welder&body=Name%3A%20Ravi%0A"
        ));
        assert_eq!(dialog.status, STATUS_OPENING);

        form.tick(&mut dialog, ms(1599.0));
        assert_eq!(dialog.status, STATUS_OPENING);
        form.tick(&mut dialog, ms(1600.0));
        assert_eq!(
            dialog.status,
            "If your email app did not open, please email us directly at sales@enray.co.in."
        );
    }

    #[test]
    fn test_request_formatting_with_optional_fields() {
        let request = QuoteRequest {
            name: "A".into(),
            email: "a@b.co".into(),
            phone: "+91 1234".into(),
            company: "Acme".into(),
            category: "custom".into(),
            category_label: "custom".into(),
            machine: String::new(),
            message: "Need 40 brackets".into(),
        };
        assert_eq!(request.subject(), "Quote Request: custom - General");
        assert_eq!(
            request.body(),
            "Name: A\nEmail: a@b.co\nPhone: +91 1234\nCompany: Acme\nCategory: custom\n\
             \nRequirements:\nNeed 40 brackets"
        );
    }

    #[test]
    fn test_close_resets() {
        let mut dialog = Dialog::default();
        let mut form = form();
        assert!(!form.handle_key(&mut dialog, Key::Escape));

        form.open(&mut dialog, ms(0.0));
        dialog.status = "x".into();
        assert!(!form.handle_key(&mut dialog, Key::Enter));
        assert!(form.handle_key(&mut dialog, Key::Escape));
        assert!(!dialog.visible);
        assert_eq!(dialog.status, "");
        assert_eq!(dialog.resets, 1);
        assert!(!form.backdrop_click(&mut dialog));
    }
}
