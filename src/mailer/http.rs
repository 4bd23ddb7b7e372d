//! Transactional email provider over HTTP.
//!
//! `POST {api_base_url}/messages` with Basic authorization and a
//! form-encoded `from`/`to`/`subject`/`text` body. Only a 200 counts as sent.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

use crate::codec::encode_base64;
use crate::metrics::UpstreamTimer;

use super::{DispatchError, EmailSender, OutboundEmail};

const UPSTREAM: &str = "email_provider";

pub struct HttpEmailSender {
    client: reqwest::Client,
    messages_url: String,
    authorization: String,
}

impl HttpEmailSender {
    /// `api_key` is the raw credential (e.g. `api:key-...`); it is
    /// base64-encoded into the Basic header here.
    pub fn new(client: reqwest::Client, api_base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            messages_url: format!("{}/messages", api_base_url.trim_end_matches('/')),
            authorization: format!("Basic {}", encode_base64(api_key)),
        }
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    async fn post(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.messages_url)
            .header(AUTHORIZATION, &self.authorization)
            .form(email)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {}>", e),
        };
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let timer = UpstreamTimer::start(UPSTREAM);
        let result = self.post(email).await;
        timer.finish(result.is_ok());

        match &result {
            Ok(()) => tracing::info!(to = %email.to, subject = %email.subject, "Email accepted"),
            Err(e) => tracing::warn!(to = %email.to, error = %e, "Email rejected"),
        }

        result
    }
}
