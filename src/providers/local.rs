//! Local mailer for development and testing.
//!
//! Captures emails in memory instead of sending them, and can be told to
//! fail so error paths are exercisable without a real provider.
//!
//! ```rust,ignore
//! use herald::providers::LocalMailer;
//!
//! let mailer = LocalMailer::new();
//! dispatcher_under_test(mailer.clone()).send(&submission).await?;
//!
//! assert_eq!(mailer.email_count(), 1);
//! assert!(mailer.sent_to("owner@example.com"));
//! ```

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::email::Email;
use crate::error::DispatchError;
use crate::mailer::{DeliveryResult, Mailer};

/// Local mailer that stores emails in memory.
pub struct LocalMailer {
    captured: Arc<RwLock<Vec<Email>>>,
    /// If set, deliver() will return this error (for testing error paths).
    fail_with: Arc<RwLock<Option<DispatchError>>>,
}

impl LocalMailer {
    /// Create a new local mailer with fresh storage.
    pub fn new() -> Self {
        Self {
            captured: Arc::new(RwLock::new(Vec::new())),
            fail_with: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure the mailer to fail with the given error.
    pub fn set_failure(&self, error: DispatchError) {
        *self.fail_with.write().unwrap() = Some(error);
    }

    /// Clear the failure state.
    pub fn clear_failure(&self) {
        *self.fail_with.write().unwrap() = None;
    }

    /// Get all captured emails, newest first.
    pub fn emails(&self) -> Vec<Email> {
        let captured = self.captured.read().unwrap();
        captured.iter().rev().cloned().collect()
    }

    /// Get the most recently captured email.
    pub fn last_email(&self) -> Option<Email> {
        self.captured.read().unwrap().last().cloned()
    }

    /// Get the count of captured emails.
    pub fn email_count(&self) -> usize {
        self.captured.read().unwrap().len()
    }

    /// Check if an email was captured for a specific address.
    pub fn sent_to(&self, email: &str) -> bool {
        self.captured
            .read()
            .unwrap()
            .iter()
            .any(|e| e.to.iter().any(|a| a.email.eq_ignore_ascii_case(email)))
    }

    /// Clear all captured emails.
    pub fn clear(&self) {
        self.captured.write().unwrap().clear();
    }
}

impl Default for LocalMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LocalMailer {
    fn clone(&self) -> Self {
        Self {
            captured: Arc::clone(&self.captured),
            fail_with: Arc::clone(&self.fail_with),
        }
    }
}

#[async_trait]
impl Mailer for LocalMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, DispatchError> {
        if let Some(ref error) = *self.fail_with.read().unwrap() {
            return Err(error.clone());
        }

        self.captured.write().unwrap().push(email.clone());
        Ok(DeliveryResult::new(uuid::Uuid::new_v4().to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
