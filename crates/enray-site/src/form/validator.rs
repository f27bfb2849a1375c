//! Field validation for the site's forms.
//!
//! Validators classify input into three states. Empty input is
//! [`ValidationState::Intermediate`]: whether a blank field is acceptable is
//! decided by the field's `required` flag, not by the validator.
//!
//! # Built-in Validators
//!
//! - [`RegexValidator`]: matches the whole (trimmed) input against a pattern
//! - [`PhoneValidator`]: ignores spaces, dashes and parentheses, then checks
//!   an optional `+` followed by up to 16 ASCII digits not starting with `0`

use std::fmt;

use regex::Regex;

use crate::error::Result;

/// Email shape: something, `@`, something, `.`, something, no whitespace.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Phone number after separators are stripped.
pub const PHONE_PATTERN: &str = r"^\+?[1-9][0-9]{0,15}$";

const PHONE_SEPARATORS: &str = r"[\s\-()]";

/// The result of validating input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationState {
    /// The input is wrong.
    Invalid,
    /// Nothing to judge yet (empty input).
    #[default]
    Intermediate,
    /// The input is valid.
    Acceptable,
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationState::Invalid => write!(f, "Invalid"),
            ValidationState::Intermediate => write!(f, "Intermediate"),
            ValidationState::Acceptable => write!(f, "Acceptable"),
        }
    }
}

/// Trait for input validators.
pub trait Validator {
    /// Validate the input string.
    fn validate(&self, input: &str) -> ValidationState;

    /// Normalize input, if the validator has a canonical form for it.
    fn fixup(&self, _input: &str) -> Option<String> {
        None
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, input: &str) -> ValidationState {
        (**self).validate(input)
    }

    fn fixup(&self, input: &str) -> Option<String> {
        (**self).fixup(input)
    }
}

/// Validator for input matching a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
}

impl RegexValidator {
    /// Compile a validator from a pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// The email validator.
    pub fn email() -> Result<Self> {
        Self::new(EMAIL_PATTERN)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Validator for RegexValidator {
    fn validate(&self, input: &str) -> ValidationState {
        let input = input.trim();
        if input.is_empty() {
            return ValidationState::Intermediate;
        }
        if self.pattern.is_match(input) {
            ValidationState::Acceptable
        } else {
            ValidationState::Invalid
        }
    }
}

/// Validator for phone numbers.
#[derive(Debug, Clone)]
pub struct PhoneValidator {
    number: Regex,
    separators: Regex,
}

impl PhoneValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            number: Regex::new(PHONE_PATTERN)?,
            separators: Regex::new(PHONE_SEPARATORS)?,
        })
    }

    fn strip(&self, input: &str) -> String {
        self.separators.replace_all(input.trim(), "").into_owned()
    }
}

impl Validator for PhoneValidator {
    fn validate(&self, input: &str) -> ValidationState {
        if input.trim().is_empty() {
            return ValidationState::Intermediate;
        }
        if self.number.is_match(&self.strip(input)) {
            ValidationState::Acceptable
        } else {
            ValidationState::Invalid
        }
    }

    fn fixup(&self, input: &str) -> Option<String> {
        let stripped = self.strip(input);
        self.number.is_match(&stripped).then_some(stripped)
    }
}

/// Kind of a form field, as declared by its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
}

impl FieldKind {
    /// Map an element's tag name and `type` attribute.
    pub fn from_element(tag: &str, input_type: &str) -> Self {
        match (tag.to_ascii_lowercase().as_str(), input_type) {
            ("textarea", _) => FieldKind::Textarea,
            ("select", _) => FieldKind::Select,
            (_, "email") => FieldKind::Email,
            (_, "tel") => FieldKind::Tel,
            _ => FieldKind::Text,
        }
    }
}

/// Why a field is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidPhone,
}

impl FieldError {
    /// The inline message shown under the field.
    pub fn message(self) -> &'static str {
        match self {
            FieldError::Required => "This field is required",
            FieldError::InvalidEmail => "Please enter a valid email address",
            FieldError::InvalidPhone => "Please enter a valid phone number",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-field checks shared by the contact and quote forms.
#[derive(Debug, Clone)]
pub struct FormValidator {
    email: RegexValidator,
    phone: PhoneValidator,
}

impl FormValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: RegexValidator::email()?,
            phone: PhoneValidator::new()?,
        })
    }

    /// Check one field's value.
    pub fn check(&self, kind: FieldKind, required: bool, value: &str) -> Option<FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return required.then_some(FieldError::Required);
        }
        match kind {
            FieldKind::Email if self.email.validate(value) != ValidationState::Acceptable => {
                Some(FieldError::InvalidEmail)
            }
            FieldKind::Tel if self.phone.validate(value) != ValidationState::Acceptable => {
                Some(FieldError::InvalidPhone)
            }
            _ => None,
        }
    }

    pub fn is_valid_email(&self, value: &str) -> bool {
        self.email.validate(value) == ValidationState::Acceptable
    }

    pub fn is_valid_phone(&self, value: &str) -> bool {
        self.phone.validate(value) == ValidationState::Acceptable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        let v = RegexValidator::email().unwrap();
        assert_eq!(v.validate(""), ValidationState::Intermediate);
        assert_eq!(v.validate("a@b"), ValidationState::Invalid);
        assert_eq!(v.validate("a@b.com"), ValidationState::Acceptable);
        assert_eq!(v.validate("  a@b.com "), ValidationState::Acceptable);
        assert_eq!(v.validate("a b@c.com"), ValidationState::Invalid);
    }

    #[test]
    fn test_phone() {
        let v = PhoneValidator::new().unwrap();
        assert_eq!(v.validate("+1234567"), ValidationState::Acceptable);
        assert_eq!(v.validate("(022) 555-1234"), ValidationState::Invalid);
        assert_eq!(v.validate("+91 98765 43210"), ValidationState::Acceptable);
        assert_eq!(v.validate("abc"), ValidationState::Invalid);
        assert_eq!(v.fixup("+91 (98) 765-43210").as_deref(), Some("+919876543210"));
        assert_eq!(v.fixup("abc"), None);
    }

    #[test]
    fn test_phone_rejects_non_ascii_digits() {
        let v = PhoneValidator::new().unwrap();
        // Arabic-Indic and fullwidth digits
        assert_eq!(
            v.validate("+1\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}"),
            ValidationState::Invalid
        );
        assert_eq!(
            v.validate("\u{ff11}\u{ff12}\u{ff13}\u{ff14}"),
            ValidationState::Invalid
        );
        assert_eq!(v.validate("+1234567"), ValidationState::Acceptable);
    }

    #[test]
    fn test_field_checks() {
        let form = FormValidator::new().unwrap();
        assert_eq!(form.check(FieldKind::Text, true, "   "), Some(FieldError::Required));
        assert_eq!(form.check(FieldKind::Text, false, ""), None);
        assert_eq!(form.check(FieldKind::Email, false, ""), None);
        assert_eq!(form.check(FieldKind::Email, true, "a@b"), Some(FieldError::InvalidEmail));
        assert_eq!(form.check(FieldKind::Tel, false, "abc"), Some(FieldError::InvalidPhone));
        assert_eq!(form.check(FieldKind::Select, true, "welding"), None);
        assert_eq!(FieldError::Required.to_string(), "This field is required");
    }

    #[test]
    fn test_field_kind_from_element() {
        assert_eq!(FieldKind::from_element("INPUT", "email"), FieldKind::Email);
        assert_eq!(FieldKind::from_element("input", "tel"), FieldKind::Tel);
        assert_eq!(FieldKind::from_element("TEXTAREA", ""), FieldKind::Textarea);
        assert_eq!(FieldKind::from_element("SELECT", ""), FieldKind::Select);
        assert_eq!(FieldKind::from_element("input", "text"), FieldKind::Text);
    }
}
