//! Resend API provider - the primary transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald::providers::ResendMailer;
//!
//! let mailer = ResendMailer::new("re_xxxxx");
//! ```
//!
//! One `deliver` call issues exactly one HTTP request; there is no retry.
//! Error responses are classified: 401/403 become [`DispatchError::Auth`],
//! anything else with a body becomes [`DispatchError::Provider`], and
//! connection-level failures become [`DispatchError::Connection`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::error::DispatchError;
use crate::mailer::{DeliveryResult, Mailer};

const RESEND_API_URL: &str = "https://api.resend.com";

/// Resend API email provider.
pub struct ResendMailer {
    api_key: String,
    client: Client,
    base_url: String,
}

impl ResendMailer {
    /// Create a new Resend mailer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            base_url: RESEND_API_URL.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, email: &Email) -> Result<ResendRequest, DispatchError> {
        let from = email
            .from
            .as_ref()
            .ok_or(DispatchError::MissingField("from"))?;

        if email.to.is_empty() {
            return Err(DispatchError::MissingField("to"));
        }

        Ok(ResendRequest {
            from: from.formatted(),
            to: email.to.iter().map(|a| a.formatted()).collect(),
            subject: if email.subject.is_empty() {
                None
            } else {
                Some(email.subject.clone())
            },
            text: email.text_body.clone(),
            reply_to: email.reply_to.as_ref().map(|a| a.formatted()),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, DispatchError> {
        let request = self.build_request(email)?;

        let url = format!("{}/emails", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("User-Agent", format!("herald/{}", crate::VERSION))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let result: ResendResponse = response.json().await?;
            Ok(DeliveryResult::with_response(
                result.id,
                serde_json::json!({ "provider": "resend" }),
            ))
        } else {
            let error: ResendError = response.json().await.unwrap_or(ResendError {
                message: "Unknown error".to_string(),
                name: None,
            });
            match status.as_u16() {
                401 | 403 => Err(DispatchError::Auth(error.message)),
                code => Err(DispatchError::provider_with_status(
                    "resend",
                    error.message,
                    code,
                )),
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "resend"
    }

    fn validate_config(&self) -> Result<(), DispatchError> {
        if self.api_key.is_empty() {
            return Err(DispatchError::NotConfigured);
        }
        Ok(())
    }
}

// ============================================================================
// Resend API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResendRequest {
    from: String,
    to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendError {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
}
