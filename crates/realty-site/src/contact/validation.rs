use std::sync::OnceLock;

use regex::Regex;

use super::domain::ContactSubmission;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_MESSAGE_CHARS: usize = 5000;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9\s\-().]{5,19}$").expect("phone pattern compiles")
    })
}

/// A submission that passed validation, with blank optionals collapsed to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub agent_id: Option<String>,
    pub subject: Option<String>,
    pub property_type: Option<String>,
    pub budget: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_submission(submission: ContactSubmission) -> Result<ValidContact, FieldError> {
    let name = required("name", submission.name)?;
    let email = required("email", submission.email)?;
    let message = required("message", submission.message)?;

    if name.chars().count() > MAX_NAME_CHARS {
        return Err(FieldError::new(
            "name",
            format!("name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    if !email_regex().is_match(&email) {
        return Err(FieldError::new("email", "email address is not valid"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(FieldError::new(
            "message",
            format!("message must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    let phone = optional(submission.phone);
    if let Some(phone) = phone.as_deref() {
        if !phone_regex().is_match(phone) {
            return Err(FieldError::new("phone", "phone number is not valid"));
        }
    }

    Ok(ValidContact {
        name,
        email: email.to_lowercase(),
        phone,
        message,
        agent_id: optional(submission.agent_id),
        subject: optional(submission.subject),
        property_type: optional(submission.property_type),
        budget: optional(submission.budget),
    })
}

fn required(field: &'static str, value: Option<String>) -> Result<String, FieldError> {
    optional(value).ok_or_else(|| FieldError::new(field, format!("{field} is required")))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
