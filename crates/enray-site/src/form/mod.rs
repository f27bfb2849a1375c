//! Forms: field validation, the contact form and the quote request dialog.

mod contact;
mod quote;
mod validator;

pub use contact::{ContactConfig, ContactForm, ContactSurface, FieldSpec, SUCCESS_MESSAGE};
pub use quote::{
    MACHINE_PLACEHOLDER, QuoteConfig, QuoteField, QuoteOutcome, QuoteRequest, QuoteRequestForm,
    QuoteSurface, STATUS_INCOMPLETE, STATUS_OPENING,
};
pub use validator::{
    EMAIL_PATTERN, FieldError, FieldKind, FormValidator, PHONE_PATTERN, PhoneValidator,
    RegexValidator, ValidationState, Validator,
};
