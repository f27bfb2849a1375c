//! Contact form.
//!
//! Fields are validated when they lose focus; a field already showing an
//! error is re-validated on every input so the message clears as soon as the
//! value is fixed. Submitting validates every field and, when all pass,
//! shows a success message for a few seconds and resets the form.

use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;
use enray_site_core::{Signal, Timer, Timestamp};

use super::validator::{FieldError, FieldKind, FormValidator};

/// Message shown after a successful submit.
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";

/// Declared shape of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(kind: FieldKind, required: bool) -> Self {
        Self { kind, required }
    }
}

/// The page side of a [`ContactForm`]. Fields are addressed by index.
pub trait ContactSurface {
    fn field_value(&self, index: usize) -> String;

    /// Show or clear a field's error marker and inline message.
    fn set_field_error(&mut self, index: usize, error: Option<FieldError>);

    fn show_success(&mut self, message: &str);
    fn hide_success(&mut self);

    /// Reset every field to its initial value.
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// How long the success message stays.
    pub success_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self { success_ms: 5000 }
    }
}

pub struct ContactForm {
    validator: Rc<FormValidator>,
    fields: Vec<FieldSpec>,
    errors: Vec<Option<FieldError>>,
    success_duration: Duration,
    success_timer: Timer,

    /// Emitted after a submit that passed validation.
    pub submitted: Signal<()>,
}

impl ContactForm {
    pub fn new(validator: Rc<FormValidator>, fields: Vec<FieldSpec>, config: &ContactConfig) -> Self {
        let errors = vec![None; fields.len()];
        Self {
            validator,
            fields,
            errors,
            success_duration: Duration::from_millis(config.success_ms),
            success_timer: Timer::new(),
            submitted: Signal::new(),
        }
    }

    pub fn error(&self, index: usize) -> Option<FieldError> {
        self.errors.get(index).copied().flatten()
    }

    #[inline]
    pub fn is_showing_success(&self) -> bool {
        self.success_timer.is_active()
    }

    fn validate_field<S: ContactSurface>(&mut self, surface: &mut S, index: usize) -> Option<FieldError> {
        let spec = self.fields[index];
        let error = self
            .validator
            .check(spec.kind, spec.required, &surface.field_value(index));
        if self.errors[index] != error || error.is_some() {
            surface.set_field_error(index, error);
        }
        self.errors[index] = error;
        error
    }

    /// A field lost focus.
    pub fn blur<S: ContactSurface>(&mut self, surface: &mut S, index: usize) -> Option<FieldError> {
        if index >= self.fields.len() {
            return None;
        }
        self.validate_field(surface, index)
    }

    /// A field's value changed.
    pub fn input<S: ContactSurface>(&mut self, surface: &mut S, index: usize) {
        if self.error(index).is_some() {
            self.validate_field(surface, index);
        }
    }

    /// Validate everything; on success show the message and reset.
    ///
    /// Returns `true` if the form passed validation.
    pub fn submit<S: ContactSurface>(&mut self, surface: &mut S, now: Timestamp) -> bool {
        let mut valid = true;
        for index in 0..self.fields.len() {
            valid &= self.validate_field(surface, index).is_none();
        }
        if !valid {
            tracing::debug!(target: targets::FORM, errors = self.errors.iter().flatten().count(), "contact form invalid");
            return false;
        }

        surface.show_success(SUCCESS_MESSAGE);
        surface.reset();
        self.success_timer.start_one_shot(now, self.success_duration);
        self.submitted.emit(());
        true
    }

    pub fn tick<S: ContactSurface>(&mut self, surface: &mut S, now: Timestamp) {
        if self.success_timer.poll(now) {
            surface.hide_success();
        }
    }
}
