use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::event::DecodeError;
use crate::mailer::DispatchError;
use crate::template::{RenderError, RepositoryError};

/// Successful end states of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Email accepted by the provider
    Sent { template: String, recipient: String },
    /// Event type is not one this notifier reacts to
    NotHandled { event_type: String },
    /// No template variant exists for the event's market
    TemplateNotFound { market: String },
}

impl Outcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Sent { .. } => "sent",
            Outcome::NotHandled { .. } => "not_handled",
            Outcome::TemplateNotFound { .. } => "template_not_found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent { .. } => write!(f, "sent!"),
            Outcome::NotHandled { event_type } => write!(f, "does not handle event {}", event_type),
            Outcome::TemplateNotFound { market } => {
                write!(f, "Country template not found: {}", market)
            }
        }
    }
}

/// Failed end states. None of them are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("event not as expected: eventDetails.{0} is missing")]
    MissingField(&'static str),

    #[error("template lookup failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("template render failed: {0}")]
    Render(#[from] RenderError),

    #[error("not sent! {0}")]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) | PipelineError::MissingField(_) => "decode_error",
            PipelineError::Repository(_) => "repository_error",
            PipelineError::Render(_) => "render_error",
            PipelineError::Dispatch(_) => "dispatch_error",
        }
    }
}

/// Verdict reported to the trigger: exactly one of succeed or fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum Completion {
    Succeeded(String),
    Failed(String),
}

impl Completion {
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Succeeded(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Completion::Succeeded(message) | Completion::Failed(message) => message,
        }
    }
}

impl From<&Result<Outcome, PipelineError>> for Completion {
    fn from(result: &Result<Outcome, PipelineError>) -> Self {
        match result {
            Ok(outcome) => Completion::Succeeded(outcome.to_string()),
            Err(err) => Completion::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let sent = Outcome::Sent {
            template: "welcomecustomer-IT-v1".to_string(),
            recipient: "a@example.com".to_string(),
        };
        assert_eq!(sent.to_string(), "sent!");

        let skipped = Outcome::NotHandled {
            event_type: "order.shipped".to_string(),
        };
        assert_eq!(skipped.to_string(), "does not handle event order.shipped");

        let missing = Outcome::TemplateNotFound {
            market: "IT".to_string(),
        };
        assert_eq!(missing.to_string(), "Country template not found: IT");
    }

    #[test]
    fn test_dispatch_failure_message() {
        let err = PipelineError::from(DispatchError::Rejected {
            status: 500,
            body: "internal".to_string(),
        });
        assert_eq!(err.to_string(), "not sent! provider responded with 500: internal");
        assert_eq!(err.label(), "dispatch_error");
    }

    #[test]
    fn test_completion_serialization() {
        let completion = Completion::Failed("event not as expected: no records".to_string());
        assert_eq!(
            serde_json::to_value(&completion).unwrap(),
            serde_json::json!({
                "status": "failed",
                "message": "event not as expected: no records"
            })
        );
        assert!(!completion.is_success());
    }
}
