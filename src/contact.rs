//! Contact form model and validation.
//!
//! The form is validated synchronously and never transmitted anywhere; a
//! valid submission is logged and the form resets.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How long the "Message sent successfully!" banner stays up.
pub const DEFAULT_CONFIRMATION_DURATION: Duration = Duration::from_secs(5);

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Fields of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Contact name.
    Name,
    /// Contact email.
    Email,
    /// Company name.
    Company,
    /// Selected license category.
    LicenseType,
    /// Free text.
    Message,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Company,
        Field::LicenseType,
        Field::Message,
    ];

    /// Form control name / DOM id.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::LicenseType => "licenseType",
            Self::Message => "message",
        }
    }
}

/// License categories offered in the select box.
pub const LICENSE_TYPES: [(&str, &str); 5] = [
    ("enterprise", "Enterprise Software"),
    ("design", "Design Tools"),
    ("development", "Development Environments"),
    ("crm", "CRM Solutions"),
    ("other", "Other"),
];

/// Raw form values as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Company name.
    pub company: String,
    /// One of the keys in [`LICENSE_TYPES`], empty when unselected.
    pub license_type: String,
    /// Free text.
    pub message: String,
}

/// Validation messages keyed by field.
pub type FieldErrors = BTreeMap<Field, &'static str>;

impl ContactForm {
    /// Current value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::LicenseType => &self.license_type,
            Field::Message => &self.message,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::LicenseType => &mut self.license_type,
            Field::Message => &mut self.message,
        }
    }

    /// Check every rule and collect one message per failing field.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(Field::Name, "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.insert(Field::Email, "Please enter a valid email");
        }
        if self.company.trim().is_empty() {
            errors.insert(Field::Company, "Company is required");
        }
        if !LICENSE_TYPES.iter().any(|(key, _)| *key == self.license_type) {
            errors.insert(Field::LicenseType, "Please select a license type");
        }
        if self.message.trim().is_empty() {
            errors.insert(Field::Message, "Message is required");
        }

        errors
    }
}

/// Whether `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Form values, their errors, and whether the confirmation banner is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormState {
    /// Current values.
    pub form: ContactForm,
    /// Errors from the last submit, minus fields edited since.
    pub errors: FieldErrors,
    /// A valid submission just happened.
    pub submitted: bool,
}

impl ContactFormState {
    /// State seeded with posted values, not yet validated.
    #[must_use]
    pub fn with_form(form: ContactForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Edit one field; its pending error goes away.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.form.value_mut(field) = value.into();
        self.errors.remove(&field);
    }

    /// Validate and, when clean, accept the submission and reset the form.
    ///
    /// Returns `true` when the submission was accepted.
    pub fn submit(&mut self) -> bool {
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            return false;
        }

        tracing::info!(
            name: "contact.submitted",
            email = %self.form.email,
            company = %self.form.company,
            license_type = %self.form.license_type,
            message_length = self.form.message.len(),
            "Contact form submitted"
        );
        self.form = ContactForm::default();
        self.submitted = true;
        true
    }
}
