//! Dispatcher behavior: deadline race, outcome classification, and the
//! detached record write.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use herald::providers::LocalMailer;
use herald::{
    Address, ContactSubmission, DeliveryResult, DispatchError, Dispatcher, Email, Mailer,
    MemoryStore, StoreError, SubmissionRecord, SubmissionStore,
};
use tokio::sync::Notify;

// ============================================================================
// Test Doubles
// ============================================================================

/// Store that signals every insert, so tests can await the detached write.
struct SignallingStore {
    inner: Arc<MemoryStore>,
    notify: Notify,
}

impl SignallingStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::shared(),
            notify: Notify::new(),
        })
    }
}

#[async_trait]
impl SubmissionStore for SignallingStore {
    async fn insert(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        let result = self.inner.insert(record).await;
        self.notify.notify_one();
        result
    }
}

/// Store whose every insert fails.
struct FailingStore {
    attempts: AtomicUsize,
    notify: Notify,
}

impl FailingStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicUsize::new(0),
            notify: Notify::new(),
        })
    }
}

#[async_trait]
impl SubmissionStore for FailingStore {
    async fn insert(&self, _record: SubmissionRecord) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_one();
        Err(StoreError("connection refused".to_string()))
    }
}

/// Mailer whose send never resolves.
struct StalledMailer;

#[async_trait]
impl Mailer for StalledMailer {
    async fn deliver(&self, _email: &Email) -> Result<DeliveryResult, DispatchError> {
        std::future::pending().await
    }

    fn provider_name(&self) -> &'static str {
        "stalled"
    }
}

/// Mailer that responds successfully, but only after a fixed delay.
struct SlowMailer {
    delay: Duration,
    delivered: Arc<AtomicUsize>,
}

#[async_trait]
impl Mailer for SlowMailer {
    async fn deliver(&self, _email: &Email) -> Result<DeliveryResult, DispatchError> {
        tokio::time::sleep(self.delay).await;
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(DeliveryResult::new("late-response"))
    }

    fn provider_name(&self) -> &'static str {
        "slow"
    }
}

fn submission() -> ContactSubmission {
    ContactSubmission::new("Jo", "jo@x.com", "Hello there, this is long enough.")
}

fn dispatcher_with(
    mailer: impl Mailer + 'static,
    store: Arc<dyn SubmissionStore>,
    deadline: Duration,
) -> Dispatcher {
    Dispatcher::new(
        mailer,
        store,
        Address::with_name("Portfolio Contact", "noreply@example.com"),
        Address::new("owner@example.com"),
        deadline,
    )
}

// ============================================================================
// Delivery and Recording
// ============================================================================

#[tokio::test]
async fn delivered_outcome_carries_message_id_and_schedules_one_record() {
    let store = SignallingStore::new();
    let mailer = LocalMailer::new();
    let dispatcher = dispatcher_with(
        mailer.clone(),
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Duration::from_secs(45),
    );

    let result = dispatcher.send(&submission()).await.unwrap();
    assert!(!result.message_id.is_empty());

    // The record write is detached; wait for it to land.
    tokio::time::timeout(Duration::from_secs(1), store.notify.notified())
        .await
        .expect("record write was never scheduled");

    assert_eq!(store.inner.count(), 1);
    let records = store.inner.all();
    assert_eq!(records[0].name, "Jo");
    assert_eq!(records[0].email, "jo@x.com");
}

#[tokio::test]
async fn notification_email_carries_submission_fields() {
    let mailer = LocalMailer::new();
    let dispatcher = dispatcher_with(
        mailer.clone(),
        MemoryStore::shared(),
        Duration::from_secs(45),
    );

    dispatcher.send(&submission()).await.unwrap();

    let email = mailer.last_email().unwrap();
    assert_eq!(email.from.as_ref().unwrap().email, "noreply@example.com");
    assert_eq!(email.to[0].email, "owner@example.com");

    let reply_to = email.reply_to.as_ref().unwrap();
    assert_eq!(reply_to.email, "jo@x.com");
    assert_eq!(reply_to.name.as_deref(), Some("Jo"));

    assert!(email.subject.contains("Jo"));
    let body = email.text_body.as_deref().unwrap();
    assert!(body.contains("Jo"));
    assert!(body.contains("jo@x.com"));
    assert!(body.contains("Hello there, this is long enough."));
}

#[tokio::test]
async fn failed_send_schedules_no_record() {
    let store = SignallingStore::new();
    let mailer = LocalMailer::new();
    mailer.set_failure(DispatchError::Connection("refused".into()));

    let dispatcher = dispatcher_with(
        mailer,
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Duration::from_secs(45),
    );

    let result = dispatcher.send(&submission()).await;
    assert!(matches!(result, Err(DispatchError::Connection(_))));

    tokio::task::yield_now().await;
    assert_eq!(store.inner.count(), 0);
}

#[tokio::test]
async fn record_failure_does_not_disturb_delivered_outcome() {
    let store = FailingStore::new();
    let mailer = LocalMailer::new();
    let dispatcher = dispatcher_with(
        mailer,
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Duration::from_secs(45),
    );

    // The outcome is fixed before the recorder resolves.
    let result = dispatcher.send(&submission()).await;
    assert!(result.is_ok());

    tokio::time::timeout(Duration::from_secs(1), store.notify.notified())
        .await
        .expect("record write was never attempted");
    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Deadline Race
// ============================================================================

#[tokio::test(start_paused = true)]
async fn stalled_provider_yields_timeout() {
    let store = SignallingStore::new();
    let dispatcher = dispatcher_with(
        StalledMailer,
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Duration::from_secs(45),
    );

    let result = dispatcher.send(&submission()).await;
    match result {
        Err(DispatchError::Timeout(deadline)) => {
            assert_eq!(deadline, Duration::from_secs(45));
        }
        other => panic!("expected timeout, got {:?}", other.map(|r| r.message_id)),
    }

    assert_eq!(store.inner.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn late_provider_response_is_discarded() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let store = SignallingStore::new();
    let dispatcher = dispatcher_with(
        SlowMailer {
            delay: Duration::from_secs(60),
            delivered: Arc::clone(&delivered),
        },
        Arc::clone(&store) as Arc<dyn SubmissionStore>,
        Duration::from_secs(45),
    );

    let result = dispatcher.send(&submission()).await;
    assert!(matches!(result, Err(DispatchError::Timeout(_))));

    // Run past the provider's own completion time: the losing future was
    // dropped at the deadline, so it neither delivers nor records.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(delivered.load(Ordering::SeqCst), 0);
    assert_eq!(store.inner.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn provider_faster_than_deadline_wins_the_race() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let dispatcher = dispatcher_with(
        SlowMailer {
            delay: Duration::from_secs(1),
            delivered: Arc::clone(&delivered),
        },
        MemoryStore::shared(),
        Duration::from_secs(45),
    );

    let result = dispatcher.send(&submission()).await.unwrap();
    assert_eq!(result.message_id, "late-response");
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn disabled_dispatcher_fails_with_not_configured() {
    let dispatcher = Dispatcher::disabled(MemoryStore::shared());
    assert!(!dispatcher.is_configured());

    let result = dispatcher.send(&submission()).await;
    match result {
        Err(error @ DispatchError::NotConfigured) => {
            assert_eq!(error.user_message(), "Email service is not configured");
        }
        other => panic!("expected NotConfigured, got {:?}", other.map(|r| r.message_id)),
    }
}

#[tokio::test]
async fn provider_error_surfaces_classified() {
    let mailer = LocalMailer::new();
    mailer.set_failure(DispatchError::provider_with_status(
        "resend",
        "rate limited",
        429,
    ));

    let dispatcher = dispatcher_with(mailer, MemoryStore::shared(), Duration::from_secs(45));
    let result = dispatcher.send(&submission()).await;

    match result {
        Err(error @ DispatchError::Provider { .. }) => {
            assert_eq!(error.user_message(), "Email service error: rate limited");
        }
        other => panic!("expected provider error, got {:?}", other.map(|r| r.message_id)),
    }
}
