//! SMTP provider using lettre - the fallback transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald::providers::SmtpMailer;
//!
//! let mailer = SmtpMailer::new("smtp.gmail.com", 587)
//!     .credentials("username", "password")
//!     .build();
//! ```
//!
//! The transport speaks STARTTLS on the configured port and enforces
//! per-stage timeouts distinct from the dispatcher's overall deadline:
//! the connect + greeting handshake is bounded before the send, and the
//! socket timeout caps each subsequent read/write.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::address::Address;
use crate::email::Email;
use crate::error::DispatchError;
use crate::mailer::{DeliveryResult, Mailer};

/// Per-stage SMTP timeouts.
///
/// `connection` and `greeting` bound the initial handshake; `socket` caps
/// every read/write after that.
#[derive(Debug, Clone, Copy)]
pub struct SmtpTimeouts {
    pub connection: Duration,
    pub greeting: Duration,
    pub socket: Duration,
}

impl Default for SmtpTimeouts {
    fn default() -> Self {
        Self {
            connection: Duration::from_secs(10),
            greeting: Duration::from_secs(10),
            socket: Duration::from_secs(30),
        }
    }
}

/// SMTP email provider.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeouts: SmtpTimeouts,
    has_credentials: bool,
}

impl SmtpMailer {
    /// Create a new SMTP mailer builder with STARTTLS.
    pub fn new(host: &str, port: u16) -> SmtpBuilder {
        SmtpBuilder {
            host: host.to_string(),
            port,
            credentials: None,
            timeouts: SmtpTimeouts::default(),
        }
    }

    /// Build a lettre Message from our Email struct.
    fn build_message(&self, email: &Email) -> Result<Message, DispatchError> {
        let from = email
            .from
            .as_ref()
            .ok_or(DispatchError::MissingField("from"))?;

        if email.to.is_empty() {
            return Err(DispatchError::MissingField("to"));
        }

        let mut builder = Message::builder()
            .from(address_to_mailbox(from)?)
            .subject(&email.subject);

        for to in &email.to {
            builder = builder.to(address_to_mailbox(to)?);
        }

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(address_to_mailbox(reply_to)?);
        }

        let message = builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone().unwrap_or_default())?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, DispatchError> {
        let message = self.build_message(email)?;

        // Bound connect + EHLO separately from per-command socket reads;
        // the pooled connection established here is reused by the send.
        let handshake = self.timeouts.connection + self.timeouts.greeting;
        match tokio::time::timeout(handshake, self.transport.test_connection()).await {
            Err(_) => {
                return Err(DispatchError::Connection(format!(
                    "SMTP handshake did not complete within {:?}",
                    handshake
                )));
            }
            Ok(Err(e)) => return Err(classify_smtp_error(e)),
            Ok(Ok(false)) => {
                return Err(DispatchError::Connection(
                    "SMTP server did not accept the connection".to_string(),
                ));
            }
            Ok(Ok(true)) => {}
        }

        let response = self
            .transport
            .send(message)
            .await
            .map_err(classify_smtp_error)?;

        // Extract message ID from SMTP response, or generate one
        let message_id = response
            .message()
            .next()
            .and_then(|m| m.lines().next())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }

    fn validate_config(&self) -> Result<(), DispatchError> {
        if !self.has_credentials {
            return Err(DispatchError::NotConfigured);
        }
        Ok(())
    }
}

/// Builder for SmtpMailer.
pub struct SmtpBuilder {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    timeouts: SmtpTimeouts,
}

impl SmtpBuilder {
    /// Set SMTP credentials.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    /// Set per-stage timeouts.
    pub fn timeouts(mut self, timeouts: SmtpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Build the SmtpMailer.
    pub fn build(self) -> SmtpMailer {
        let has_credentials = self.credentials.is_some();
        let mut t = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .unwrap_or_else(|_| AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host))
            .port(self.port)
            .timeout(Some(self.timeouts.socket));
        if let Some(creds) = self.credentials {
            t = t.credentials(creds);
        }

        SmtpMailer {
            transport: t.build(),
            timeouts: self.timeouts,
            has_credentials,
        }
    }
}

/// Convert our Address to lettre's Mailbox.
fn address_to_mailbox(addr: &Address) -> Result<Mailbox, DispatchError> {
    let email = addr
        .email
        .parse()
        .map_err(|e: lettre::address::AddressError| {
            DispatchError::Unknown(format!("invalid address '{}': {}", addr.email, e))
        })?;

    Ok(Mailbox::new(addr.name.clone(), email))
}

/// Reduce a lettre SMTP error to the dispatch taxonomy.
///
/// Reply codes 530/534/535 are the credential-rejection family; anything
/// that carries a reply code is a provider-side error; failures below the
/// protocol layer (connect, TLS, DNS, stage timeout) are connection
/// failures.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> DispatchError {
    if err.is_client() {
        return DispatchError::Unknown(err.to_string());
    }
    if err.is_timeout() {
        return DispatchError::Connection(err.to_string());
    }
    match err.status() {
        Some(code) => {
            let digits = code.to_string();
            if matches!(digits.as_str(), "530" | "534" | "535") {
                DispatchError::Auth(err.to_string())
            } else {
                DispatchError::Provider {
                    provider: "smtp",
                    message: err.to_string(),
                    status: digits.parse().ok(),
                }
            }
        }
        None => DispatchError::Connection(err.to_string()),
    }
}
