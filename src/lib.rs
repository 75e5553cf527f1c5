//! # Herald
//!
//! Contact-form notification dispatcher: validate a submission, relay it
//! over the startup-selected email provider under a hard deadline, and
//! archive it best-effort.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! RESEND_API_KEY=re_xxxxx
//! CONTACT_RECIPIENT=you@example.com
//! ```
//!
//! Wire the dispatcher into the router:
//! ```rust,ignore
//! use herald::{routes, AppState, Config, Dispatcher, MemoryStore};
//!
//! let config = Config::from_env();
//! let dispatcher = Dispatcher::from_config(&config.mail, MemoryStore::shared());
//! let app = routes::router(AppState::new(Arc::new(dispatcher)));
//! ```
//!
//! ## Provider selection
//!
//! Exactly one provider is active per process, chosen once at startup:
//! an API key selects the primary HTTP provider, SMTP credentials select
//! the fallback transport, and neither leaves dispatch disabled (every
//! send fails with `NotConfigured`; the process still serves requests).
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `RESEND_API_KEY` | presence selects the primary API provider |
//! | `SMTP_HOST` | fallback SMTP host (default: smtp.gmail.com) |
//! | `SMTP_PORT` | fallback SMTP port (default: 587) |
//! | `SMTP_USERNAME` | SMTP credential; with password, selects SMTP |
//! | `SMTP_PASSWORD` | SMTP credential |
//! | `CONTACT_RECIPIENT` | operator inbox for notifications |
//! | `EMAIL_FROM` | envelope sender |
//! | `SEND_DEADLINE_SECS` | overall dispatch deadline (default: 45) |
//! | `PORT` | HTTP listen port (default: 5000) |

/// The version of the herald crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod config;
mod dispatch;
mod email;
mod error;
mod mailer;
mod store;
mod submission;

pub mod providers;
pub mod routes;

// Re-exports
pub use address::Address;
pub use config::{Config, MailConfig, ProviderConfig, SmtpConfig};
pub use dispatch::Dispatcher;
pub use email::Email;
pub use error::DispatchError;
pub use mailer::{DeliveryResult, Mailer};
pub use routes::AppState;
pub use store::{MemoryStore, StoreError, SubmissionRecord, SubmissionStore};
pub use submission::{validate, ContactSubmission, FieldErrors, MIN_MESSAGE_LEN, MIN_NAME_LEN};
