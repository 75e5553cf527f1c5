//! Process configuration, read once at startup.
//!
//! Provider selection follows credential presence: an API key selects the
//! primary HTTP provider, SMTP credentials select the fallback transport,
//! and neither leaves dispatch disabled (a startup warning, not a crash).
//! Nothing here is re-read at request time.

use std::env;
use std::time::Duration;

use crate::address::Address;
use crate::providers::SmtpTimeouts;

/// Operator inbox used when `CONTACT_RECIPIENT` is not set.
pub const DEFAULT_RECIPIENT: &str = "winpaingse25@gmail.com";
/// Envelope sender used when `EMAIL_FROM` is not set.
pub const DEFAULT_FROM: &str = "onboarding@resend.dev";
/// Overall dispatch deadline used when `SEND_DEADLINE_SECS` is not set.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(45);
/// HTTP listen port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port.
    pub port: u16,
    pub mail: MailConfig,
}

/// Everything the dispatcher needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub provider: ProviderConfig,
    /// Envelope sender for notification emails.
    pub from: Address,
    /// Operator inbox receiving notifications.
    pub recipient: Address,
    /// Overall wall-clock deadline for one dispatch attempt.
    pub deadline: Duration,
}

/// The active provider, selected once from credential presence.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Primary HTTP email API.
    Api { api_key: String },
    /// Fallback SMTP transport.
    Smtp(SmtpConfig),
    /// No credentials found; every dispatch fails with `NotConfigured`.
    Disabled,
}

/// SMTP connection parameters.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeouts: SmtpTimeouts,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Call once at startup; the result is immutable afterwards.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            mail: MailConfig::from_env(),
        }
    }
}

impl MailConfig {
    /// Read mail configuration from the environment.
    pub fn from_env() -> Self {
        let smtp_host =
            env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port: u16 = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let smtp_username = env::var("SMTP_USERNAME").ok();
        let smtp_password = env::var("SMTP_PASSWORD").ok();

        let provider = ProviderConfig::select(
            env::var("RESEND_API_KEY").ok(),
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
        );

        let recipient = env::var("CONTACT_RECIPIENT")
            .map(Address::new)
            .unwrap_or_else(|_| Address::new(DEFAULT_RECIPIENT));
        let from = env::var("EMAIL_FROM")
            .map(|email| Address::with_name("Portfolio Contact", email))
            .unwrap_or_else(|_| Address::with_name("Portfolio Contact", DEFAULT_FROM));

        let deadline = env::var("SEND_DEADLINE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DEADLINE);

        Self {
            provider,
            from,
            recipient,
            deadline,
        }
    }
}

impl ProviderConfig {
    /// Select the active provider from available credentials.
    ///
    /// The API key wins when both are present; a partial SMTP credential
    /// pair counts as absent.
    pub fn select(
        api_key: Option<String>,
        smtp_host: String,
        smtp_port: u16,
        smtp_username: Option<String>,
        smtp_password: Option<String>,
    ) -> Self {
        if let Some(api_key) = api_key.filter(|k| !k.is_empty()) {
            return Self::Api { api_key };
        }

        match (smtp_username, smtp_password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Self::Smtp(SmtpConfig {
                    host: smtp_host,
                    port: smtp_port,
                    username,
                    password,
                    timeouts: SmtpTimeouts::default(),
                })
            }
            _ => Self::Disabled,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}
