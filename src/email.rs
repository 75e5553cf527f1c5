//! Notification message model with builder pattern.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// An outbound notification email.
///
/// Use the builder pattern to construct messages:
///
/// ```
/// use herald::Email;
///
/// let email = Email::new()
///     .from("noreply@example.com")
///     .to("owner@example.com")
///     .reply_to(("Visitor", "visitor@example.com"))
///     .subject("New contact")
///     .text_body("Hello");
/// ```
///
/// Contact notifications are plain text; there is no HTML or attachment
/// surface here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    /// Sender address
    pub from: Option<Address>,
    /// Primary recipients
    pub to: Vec<Address>,
    /// Reply-to address (the submitter, so the operator can answer directly)
    pub reply_to: Option<Address>,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text_body: Option<String>,
}

impl Email {
    /// Create a new empty email.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address.
    pub fn from(mut self, addr: impl Into<Address>) -> Self {
        self.from = Some(addr.into());
        self
    }

    /// Add a recipient. Can be called multiple times.
    pub fn to(mut self, addr: impl Into<Address>) -> Self {
        self.to.push(addr.into());
        self
    }

    /// Set the reply-to address.
    pub fn reply_to(mut self, addr: impl Into<Address>) -> Self {
        self.reply_to = Some(addr.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the plain text body.
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Check if the email has all fields required for sending.
    pub fn is_sendable(&self) -> bool {
        self.from.is_some() && !self.to.is_empty()
    }
}
