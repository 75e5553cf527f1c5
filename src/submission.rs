//! Contact-form submission model and validation.
//!
//! Validation is a pure function of its input: no network, no disk, no
//! side effects. A submission that fails any check never reaches the
//! dispatcher.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Minimum trimmed length of the submitter's name.
pub const MIN_NAME_LEN: usize = 2;
/// Minimum trimmed length of the message body.
pub const MIN_MESSAGE_LEN: usize = 10;

/// A contact-form submission as received from the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }
}

/// Per-field validation failures.
///
/// All checks are independent; a single validation pass reports every
/// failing field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in [&self.name, &self.email, &self.message].into_iter().flatten() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
            first = false;
        }
        Ok(())
    }
}

/// The deliberately loose email shape check: `local@domain.tld` with no
/// whitespace or extra @ signs. Not RFC 5322; multi-label or
/// internationalized addresses that a strict parser would reject can pass
/// here, and that is the documented behavior.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Validate a submission, reporting every failing field.
///
/// Rules:
/// - `name`: required, trimmed length >= 2
/// - `email`: required, matches the loose `local@domain.tld` pattern
/// - `message`: required, trimmed length >= 10
pub fn validate(submission: &ContactSubmission) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = submission.name.trim();
    if name.is_empty() {
        errors.name = Some("Name is required".to_string());
    } else if name.chars().count() < MIN_NAME_LEN {
        errors.name = Some("Name must be at least 2 characters".to_string());
    }

    let email = submission.email.trim();
    if email.is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !email_pattern().is_match(email) {
        errors.email = Some("Please enter a valid email address".to_string());
    }

    let message = submission.message.trim();
    if message.is_empty() {
        errors.message = Some("Message is required".to_string());
    } else if message.chars().count() < MIN_MESSAGE_LEN {
        errors.message = Some("Message must be at least 10 characters".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
