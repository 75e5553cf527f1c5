//! The contact-notification dispatcher.
//!
//! Turns a validated submission into one provider send attempt, raced
//! against a wall-clock deadline, with a detached best-effort record write
//! after delivery. Exactly one outcome is produced per call; a provider
//! response arriving after the deadline is discarded with its dropped
//! future.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::address::Address;
use crate::config::{MailConfig, ProviderConfig};
use crate::email::Email;
use crate::error::DispatchError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::providers::{ResendMailer, SmtpMailer};
use crate::store::{SubmissionRecord, SubmissionStore};
use crate::submission::ContactSubmission;

/// Dispatches contact notifications over the startup-selected provider.
///
/// Construct once and share (`Arc`); all fields are immutable after
/// construction. Tests substitute a fake provider through [`Dispatcher::new`].
pub struct Dispatcher {
    mailer: Option<Arc<dyn Mailer>>,
    store: Arc<dyn SubmissionStore>,
    from: Address,
    recipient: Address,
    deadline: Duration,
}

impl Dispatcher {
    /// Build a dispatcher from startup configuration.
    ///
    /// A missing provider is a warning here and a `NotConfigured` failure
    /// per send, never a crash.
    pub fn from_config(config: &MailConfig, store: Arc<dyn SubmissionStore>) -> Self {
        let mailer: Option<Arc<dyn Mailer>> = match &config.provider {
            ProviderConfig::Api { api_key } => {
                Some(Arc::new(ResendMailer::new(api_key.clone())))
            }
            ProviderConfig::Smtp(smtp) => Some(Arc::new(
                SmtpMailer::new(&smtp.host, smtp.port)
                    .credentials(&smtp.username, &smtp.password)
                    .timeouts(smtp.timeouts)
                    .build(),
            )),
            ProviderConfig::Disabled => None,
        };

        match &mailer {
            Some(m) => {
                if let Err(e) = m.validate_config() {
                    tracing::warn!(provider = m.provider_name(), error = %e, "Email provider misconfigured");
                } else {
                    tracing::info!(provider = m.provider_name(), "Email provider active");
                }
            }
            None => {
                tracing::warn!(
                    "No email provider credentials found; contact sends will fail with NotConfigured"
                );
            }
        }

        Self {
            mailer,
            store,
            from: config.from.clone(),
            recipient: config.recipient.clone(),
            deadline: config.deadline,
        }
    }

    /// Build a dispatcher around an explicit mailer (test substitution).
    pub fn new(
        mailer: impl Mailer + 'static,
        store: Arc<dyn SubmissionStore>,
        from: Address,
        recipient: Address,
        deadline: Duration,
    ) -> Self {
        Self {
            mailer: Some(Arc::new(mailer)),
            store,
            from,
            recipient,
            deadline,
        }
    }

    /// Build a dispatcher with no provider, for exercising the
    /// `NotConfigured` path.
    pub fn disabled(store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            mailer: None,
            store,
            from: Address::new(crate::config::DEFAULT_FROM),
            recipient: Address::new(crate::config::DEFAULT_RECIPIENT),
            deadline: crate::config::DEFAULT_DEADLINE,
        }
    }

    /// Whether a provider was selected at startup.
    pub fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send a notification for a validated submission.
    ///
    /// One provider attempt, no retry, raced against the configured
    /// deadline; the losing side of the race is dropped, not awaited. On
    /// delivery the record write is scheduled detached and cannot affect
    /// the returned outcome.
    pub async fn send(
        &self,
        submission: &ContactSubmission,
    ) -> Result<DeliveryResult, DispatchError> {
        let Some(mailer) = &self.mailer else {
            tracing::error!("Contact dispatch attempted without a configured provider");
            return Err(DispatchError::NotConfigured);
        };

        let email = self.notification_email(submission);
        let provider = mailer.provider_name();

        tracing::debug!(
            provider,
            reply_to = %submission.email.trim(),
            "Dispatching contact notification"
        );

        let result = match tokio::time::timeout(self.deadline, mailer.deliver(&email)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(DispatchError::Timeout(self.deadline)),
        };

        match &result {
            Ok(delivery) => {
                tracing::info!(
                    provider,
                    message_id = %delivery.message_id,
                    "Contact notification delivered"
                );
                self.spawn_record(submission);
            }
            Err(error) => {
                tracing::error!(provider, error = %error, "Contact notification failed");
            }
        }

        result
    }

    /// Compose the notification email for a submission.
    ///
    /// Reply-to is the submitter so the operator can answer directly.
    fn notification_email(&self, submission: &ContactSubmission) -> Email {
        let name = submission.name.trim();
        let reply_email = submission.email.trim();
        let received_at = Utc::now();

        let body = format!(
            "Name: {}\nEmail: {}\nDate: {}\n\n{}\n",
            name,
            reply_email,
            received_at.to_rfc3339(),
            submission.message.trim(),
        );

        Email::new()
            .from(self.from.clone())
            .to(self.recipient.clone())
            .reply_to(Address::with_name(name, reply_email))
            .subject(format!("Portfolio contact from {}", name))
            .text_body(body)
    }

    /// Schedule the durable record write without blocking the response.
    ///
    /// The task is detached: its handle is dropped immediately so nothing
    /// upstream can accidentally await it, and any store failure is logged
    /// and swallowed.
    fn spawn_record(&self, submission: &ContactSubmission) {
        let store = Arc::clone(&self.store);
        let record = SubmissionRecord::from_submission(submission);
        let record_id = record.id.clone();

        tokio::spawn(async move {
            match store.insert(record).await {
                Ok(()) => {
                    tracing::debug!(record_id = %record_id, "Contact submission archived");
                }
                Err(error) => {
                    tracing::warn!(record_id = %record_id, error = %error, "Failed to archive contact submission");
                }
            }
        });
    }
}
