//! Ticket form input and its validation rules.

use std::path::Path;
use std::sync::LazyLock;

use chrono::DateTime;
use chrono::Utc;
use regex::Regex;

use super::PreferredContact;
use super::Ticket;
use crate::error::FieldValidationError;
use crate::error::ValidationErrors;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// File extensions accepted for ticket attachments.
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Collects per-field validation failures.
///
/// Each field keeps only its first failing rule.
///
/// # Example
///
/// ```
/// use tatua_lib::tickets::Validator;
///
/// let result = Validator::new()
///     .field("name", "")
///         .required("Name is required")
///     .field("email", "ann@example")
///         .required("Email is required")
///         .email("Invalid email format")
///     .validate();
///
/// let errors = result.unwrap_err();
/// assert_eq!(errors.message("email"), Some("Invalid email format"));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts rules for a text field.
    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            validator: self,
            name: name.into(),
            value: value.into(),
            error: None,
        }
    }

    /// Requires a flag to be set.
    pub fn checked(mut self, name: impl Into<String>, value: bool, msg: impl Into<String>) -> Self {
        if !value {
            self.errors.push(FieldValidationError::new(name, msg));
        }
        self
    }

    /// Returns every failure found.
    pub fn validate(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

/// Rules for a single text field.
#[derive(Debug)]
pub struct FieldBuilder {
    validator: Validator,
    name: String,
    value: String,
    error: Option<String>,
}

impl FieldBuilder {
    /// Adds a custom rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: FnOnce(&str) -> bool,
    {
        if self.error.is_none() && !f(&self.value) {
            self.error = Some(msg.into());
        }
        self
    }

    /// Requires non-blank text.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Requires the text to match a pattern. Blank text passes.
    pub fn pattern(self, re: &Regex, msg: impl Into<String>) -> Self {
        self.rule(|v| v.is_empty() || re.is_match(v), msg)
    }

    /// Requires an address shaped like `local@domain.tld`. Blank text passes.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.pattern(&EMAIL, msg)
    }

    /// Requires a file name with one of the given extensions. Blank text passes.
    pub fn extension(self, allowed: &[&str], msg: impl Into<String>) -> Self {
        self.rule(
            |v| {
                v.is_empty()
                    || Path::new(v)
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| allowed.iter().any(|a| a.eq_ignore_ascii_case(e)))
            },
            msg,
        )
    }

    /// Continues to the next field.
    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> FieldBuilder {
        self.finalize().field(name, value)
    }

    /// Continues to a flag.
    pub fn checked(self, name: impl Into<String>, value: bool, msg: impl Into<String>) -> Validator {
        self.finalize().checked(name, value, msg)
    }

    /// Finishes and returns every failure found.
    pub fn validate(self) -> Result<(), ValidationErrors> {
        self.finalize().validate()
    }

    fn finalize(self) -> Validator {
        let mut validator = self.validator;
        if let Some(msg) = self.error {
            validator
                .errors
                .push(FieldValidationError::new(self.name, msg));
        }
        validator
    }
}

/// Input collected when raising a ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub preferred_contact: PreferredContact,
    pub terms_accepted: bool,
    /// File name of the attachment, if one is attached.
    pub attachment: Option<String>,
}

impl TicketForm {
    /// Checks every rule and reports all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .field("fullName", self.full_name.as_str())
            .required("Full name is required")
            .field("email", self.email.as_str())
            .required("Email is required")
            .email("Invalid email format")
            .field("phone", self.phone.as_str())
            .required("Phone number is required")
            .field("subject", self.subject.as_str())
            .required("Subject is required")
            .field("message", self.message.as_str())
            .required("Message is required")
            .field("attachment", self.attachment.clone().unwrap_or_default())
            .extension(ATTACHMENT_EXTENSIONS, "Only PDF, PNG, and JPG files are allowed")
            .checked(
                "termsAccepted",
                self.terms_accepted,
                "You must accept the terms and conditions",
            )
            .validate()
    }

    /// Validates the form and builds a ticket from it.
    pub fn into_ticket(self, id: u64, now: DateTime<Utc>) -> Result<Ticket, ValidationErrors> {
        self.validate()?;
        Ok(Ticket {
            id,
            subject: self.subject,
            description: self.message,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            preferred_contact: self.preferred_contact,
            attachment: self.attachment,
            attachment_url: None,
            created_at: now,
        })
    }
}

/// Field overrides applied when editing a ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub preferred_contact: Option<PreferredContact>,
    pub attachment: Option<String>,
}

impl TicketPatch {
    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates the overridden fields that carry a format.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .field("email", self.email.clone().unwrap_or_default())
            .email("Invalid email format")
            .field("attachment", self.attachment.clone().unwrap_or_default())
            .extension(ATTACHMENT_EXTENSIONS, "Only PDF, PNG, and JPG files are allowed")
            .validate()
    }

    /// Writes the overrides into a ticket.
    pub fn apply(self, ticket: &mut Ticket) {
        if let Some(v) = self.full_name {
            ticket.full_name = v;
        }
        if let Some(v) = self.email {
            ticket.email = v;
        }
        if let Some(v) = self.phone {
            ticket.phone = v;
        }
        if let Some(v) = self.subject {
            ticket.subject = v;
        }
        if let Some(v) = self.description {
            ticket.description = v;
        }
        if let Some(v) = self.preferred_contact {
            ticket.preferred_contact = v;
        }
        if let Some(v) = self.attachment {
            ticket.attachment = Some(v);
            ticket.attachment_url = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> TicketForm {
        TicketForm {
            full_name: "Ann Lee".into(),
            email: "ann@example.com".into(),
            phone: "555-0100".into(),
            subject: "Printer jam".into(),
            message: "Tray 2 is stuck".into(),
            preferred_contact: PreferredContact::Email,
            terms_accepted: true,
            attachment: Some("photo.JPG".into()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_all_failures_collected() {
        let form = TicketForm {
            terms_accepted: false,
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.message("fullName"), Some("Full name is required"));
        assert_eq!(errors.message("email"), Some("Email is required"));
        assert_eq!(
            errors.message("termsAccepted"),
            Some("You must accept the terms and conditions")
        );
        assert!(errors.message("attachment").is_none());
    }

    #[test]
    fn test_email_shape() {
        for bad in ["ann", "ann@example", "a b@example.com", "@example.com"] {
            let form = TicketForm {
                email: bad.into(),
                ..valid_form()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.message("email"), Some("Invalid email format"), "{}", bad);
        }
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        let form = TicketForm {
            subject: "   ".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.message("subject"), Some("Subject is required"));
    }

    #[test]
    fn test_attachment_extensions() {
        let form = TicketForm {
            attachment: Some("notes.docx".into()),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message("attachment"),
            Some("Only PDF, PNG, and JPG files are allowed")
        );

        let form = TicketForm {
            attachment: None,
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_into_ticket_maps_message() {
        let now = Utc::now();
        let ticket = valid_form().into_ticket(7, now).unwrap();
        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.description, "Tray 2 is stuck");
        assert_eq!(ticket.created_at, now);
    }

    #[test]
    fn test_patch_apply() {
        let mut ticket = valid_form().into_ticket(1, Utc::now()).unwrap();
        ticket.attachment_url = Some("https://files.example.com/1".into());

        let patch = TicketPatch {
            subject: Some("Scanner".into()),
            attachment: Some("scan.pdf".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        patch.apply(&mut ticket);

        assert_eq!(ticket.subject, "Scanner");
        assert_eq!(ticket.attachment.as_deref(), Some("scan.pdf"));
        assert!(ticket.attachment_url.is_none());
        assert!(TicketPatch::default().is_empty());
    }
}
