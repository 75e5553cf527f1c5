//! Durable submission records and the storage seam.
//!
//! The real database is an external collaborator; the dispatcher only sees
//! the [`SubmissionStore`] trait. Records are best-effort telemetry: they
//! are written after the delivery outcome is already decided, and a failed
//! write is logged and dropped, never surfaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::submission::ContactSubmission;

/// A persisted contact submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmissionRecord {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// When the submission was accepted.
    pub received_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Create a record from a delivered submission, stamping id and time.
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: submission.name.trim().to_string(),
            email: submission.email.trim().to_string(),
            message: submission.message.trim().to_string(),
            received_at: Utc::now(),
        }
    }
}

/// Failure to persist a record.
#[derive(Debug, Clone, Error)]
#[error("submission store error: {0}")]
pub struct StoreError(pub String);

/// Trait for submission record storage backends.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert a record. A single independent write; no read-modify-write.
    async fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError>;
}

/// Thread-safe in-memory store.
///
/// The in-process default; a relational backend would implement
/// [`SubmissionStore`] behind the same seam.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SubmissionRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped in an Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get all stored records, newest first.
    pub fn all(&self) -> Vec<SubmissionRecord> {
        let records = self.records.read().unwrap();
        records.iter().rev().cloned().collect()
    }

    /// Get the count of stored records.
    pub fn count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        self.records.write().unwrap().push(record);
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for Arc<MemoryStore> {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        (**self).insert(record).await
    }
}
