//! Mailer trait and delivery result types.
//!
//! # Architecture: Why `async_trait`?
//!
//! This module uses `#[async_trait]` instead of native async traits because
//! the dispatcher requires dynamic dispatch via `Arc<dyn Mailer>`: the
//! active provider is selected once at startup from configuration, and the
//! same dispatcher code drives whichever variant was chosen. Native async
//! traits are not object-safe; the macro boxes futures, enabling dynamic
//! dispatch at the cost of one heap allocation per call. Email sending is
//! I/O-bound, so network latency dominates that allocation by orders of
//! magnitude.
//!
//! Tests substitute a fake provider by constructing the dispatcher with a
//! [`LocalMailer`](crate::providers::LocalMailer).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::error::DispatchError;

/// Result of a successful email delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Message ID assigned by the provider
    pub message_id: String,
    /// Optional provider-specific response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_response: Option<serde_json::Value>,
}

impl DeliveryResult {
    /// Create a new delivery result with just a message ID.
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            provider_response: None,
        }
    }

    /// Create a delivery result with provider response.
    pub fn with_response(message_id: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            message_id: message_id.into(),
            provider_response: Some(response),
        }
    }
}

/// Trait for email delivery providers.
///
/// Both transports (the primary HTTP API and the SMTP fallback) implement
/// this trait; the dispatcher holds whichever one configuration selected.
///
/// A single `deliver` call is a single attempt: providers do not retry,
/// and the caller enforces the overall deadline.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email.
    ///
    /// Returns the provider-assigned message ID on success; failures are
    /// already classified into [`DispatchError`] variants.
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, DispatchError>;

    /// Get the provider name (for logging/debugging).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }

    /// Validate configuration.
    ///
    /// Called at startup to verify required configuration is present.
    /// Override in providers that require specific config (API keys, etc.).
    fn validate_config(&self) -> Result<(), DispatchError> {
        Ok(())
    }
}
