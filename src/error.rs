//! Error taxonomy for contact-notification dispatch.
//!
//! Every provider-specific failure is reduced to one of a small set of
//! classified variants before it leaves the dispatcher. The full detail
//! stays available through `Display` for server-side logs;
//! [`DispatchError::user_message`] produces the stable, user-safe string
//! that crosses the HTTP boundary.

use std::time::Duration;
use thiserror::Error;

/// Classified failure of a dispatch attempt.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No provider credentials were present at startup.
    #[error("email provider not configured")]
    NotConfigured,

    /// The overall deadline elapsed before the provider responded.
    #[error("send deadline of {0:?} elapsed before the provider responded")]
    Timeout(Duration),

    /// The provider rejected the configured credentials.
    #[error("email authentication failed: {0}")]
    Auth(String),

    /// Network, DNS, or connection-level failure reaching the provider.
    #[error("cannot connect to email server: {0}")]
    Connection(String),

    /// The provider returned a structured error response.
    #[error("provider error ({provider}): {message}")]
    Provider {
        provider: &'static str,
        message: String,
        /// Optional HTTP status or SMTP reply code
        status: Option<u16>,
    },

    /// A message was assembled without a required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Uncategorized failure.
    #[error("{0}")]
    Unknown(String),
}

impl DispatchError {
    /// Create a provider-specific error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status: None,
        }
    }

    /// Create a provider error with a status code.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }

    /// The stable, user-safe message for this failure.
    ///
    /// Never carries stack traces, credentials, or internal hostnames;
    /// the provider's own message is the only pass-through, and only for
    /// structured provider responses.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => "Email service is not configured".to_string(),
            Self::Timeout(_) => {
                "Email service is taking too long. Please try again later.".to_string()
            }
            Self::Auth(_) => {
                "Email authentication failed. Please check SMTP credentials.".to_string()
            }
            Self::Connection(_) => {
                "Cannot connect to email server. This may be due to network restrictions."
                    .to_string()
            }
            Self::Provider { message, .. } => format!("Email service error: {}", message),
            Self::MissingField(_) | Self::Unknown(_) => {
                "Failed to send message. Please try again later.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            // without_url keeps provider endpoints out of the message
            Self::Connection(err.without_url().to_string())
        } else {
            Self::Unknown(err.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<lettre::error::Error> for DispatchError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Unknown(format!("message build: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_stable() {
        assert_eq!(
            DispatchError::NotConfigured.user_message(),
            "Email service is not configured"
        );
        assert_eq!(
            DispatchError::Timeout(Duration::from_secs(45)).user_message(),
            "Email service is taking too long. Please try again later."
        );
        assert_eq!(
            DispatchError::Auth("535 bad credentials".into()).user_message(),
            "Email authentication failed. Please check SMTP credentials."
        );
        assert_eq!(
            DispatchError::Connection("dns error".into()).user_message(),
            "Cannot connect to email server. This may be due to network restrictions."
        );
        assert_eq!(
            DispatchError::Unknown("boom".into()).user_message(),
            "Failed to send message. Please try again later."
        );
    }

    #[test]
    fn test_provider_message_passes_through() {
        let err = DispatchError::provider_with_status("resend", "rate limited", 429);
        assert_eq!(err.user_message(), "Email service error: rate limited");
        assert!(err.to_string().contains("resend"));
    }

    #[test]
    fn test_auth_detail_does_not_leak() {
        let err = DispatchError::Auth("535 authentication failed for user smtp://internal".into());
        assert!(!err.user_message().contains("internal"));
        // the full detail stays visible to server-side logs
        assert!(err.to_string().contains("535"));
    }

    #[test]
    fn test_missing_field_maps_to_generic_message() {
        let err = DispatchError::MissingField("from");
        assert_eq!(
            err.user_message(),
            "Failed to send message. Please try again later."
        );
    }
}
