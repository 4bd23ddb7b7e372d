//! Noop sender: logs the message instead of delivering it.

use async_trait::async_trait;

use super::{DispatchError, EmailSender, OutboundEmail};

#[derive(Debug, Clone, Default)]
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "Noop: skipping email delivery"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_always_succeeds() {
        let email = OutboundEmail {
            from: "shop@example.com".to_string(),
            to: "buyer@example.com".to_string(),
            subject: "Thanks".to_string(),
            text: "Body".to_string(),
        };

        assert!(NoopEmailSender.send(&email).await.is_ok());
    }
}
