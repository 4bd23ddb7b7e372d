//! Outbound email delivery.
//!
//! `EmailSender` abstracts the transactional email provider. Two
//! implementations exist: the HTTP provider used in production and a noop
//! sender that only logs. `mail.backend` selects one at startup.

mod http;
mod noop;
mod types;

use async_trait::async_trait;

pub use http::HttpEmailSender;
pub use noop::NoopEmailSender;
pub use types::{DispatchError, OutboundEmail};

/// Email delivery trait
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Submit one message. Attempted exactly once.
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}
