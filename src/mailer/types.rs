use serde::Serialize;
use thiserror::Error;

/// Rendered message handed to the provider, form-encoded as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider responded with {status}: {body}")]
    Rejected { status: u16, body: String },
}
