//! Order email pipeline.
//!
//! One invocation walks a fixed sequence:
//!
//! ```text
//! decode -> classify -> list templates -> select -> fetch -> render -> send
//! ```
//!
//! Network calls happen strictly one after another and each is attempted
//! once. Every path ends in an [`Outcome`] or a [`PipelineError`]; an
//! unhandled event type or a market without a template is an outcome, not
//! an error. The template directory is fetched fresh for each invocation and
//! never shared between invocations.

mod outcome;

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::event::{decode_envelope, NotificationFlow};
use crate::mailer::{EmailSender, OutboundEmail};
use crate::metrics::InvocationMetrics;
use crate::template::{select_template, Renderer, TemplateRepository};

pub use outcome::{Completion, Outcome, PipelineError};

pub struct OrderEmailPipeline {
    repository: Arc<dyn TemplateRepository>,
    sender: Arc<dyn EmailSender>,
    renderer: Renderer,
}

impl OrderEmailPipeline {
    pub fn new(
        repository: Arc<dyn TemplateRepository>,
        sender: Arc<dyn EmailSender>,
        renderer: Renderer,
    ) -> Self {
        Self {
            repository,
            sender,
            renderer,
        }
    }

    /// Run one envelope through the pipeline.
    pub async fn handle(&self, envelope: &serde_json::Value) -> Result<Outcome, PipelineError> {
        let event = decode_envelope(envelope)?;

        let flow = match NotificationFlow::from_event_type(&event.event_type) {
            Some(flow) => flow,
            None => {
                return Ok(Outcome::NotHandled {
                    event_type: event.event_type,
                })
            }
        };

        let details = &event.event_details;
        let market = details
            .market
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or(PipelineError::MissingField("market"))?;
        let recipient = details
            .ship_to_email
            .as_deref()
            .filter(|to| !to.trim().is_empty())
            .ok_or(PipelineError::MissingField("shipToEmail"))?;

        tracing::info!(
            event_type = %event.event_type,
            flow = ?flow,
            market = %market,
            "Processing order event"
        );

        let directory = self.repository.list_templates().await?;

        let descriptor = match select_template(&directory, flow.purpose_tag(), market) {
            Some(descriptor) => descriptor,
            None => {
                tracing::info!(
                    market = %market,
                    purpose = flow.purpose_tag(),
                    templates = directory.len(),
                    "No template for market"
                );
                return Ok(Outcome::TemplateNotFound {
                    market: market.to_string(),
                });
            }
        };

        tracing::debug!(template = %descriptor.name, "Selected template");

        let content = self.repository.fetch_template(&descriptor.name).await?;
        let text = self
            .renderer
            .render(&content.body, &details.render_context())?;

        let email = OutboundEmail {
            from: content.from,
            to: recipient.to_string(),
            subject: content.subject,
            text,
        };
        self.sender.send(&email).await?;

        Ok(Outcome::Sent {
            template: descriptor.name.clone(),
            recipient: email.to,
        })
    }

    /// Run one envelope and reduce the result to a [`Completion`].
    pub async fn invoke(&self, invocation_id: Uuid, envelope: &serde_json::Value) -> Completion {
        let span = tracing::info_span!("invocation", invocation_id = %invocation_id);

        async {
            let result = self.handle(envelope).await;
            let completion = Completion::from(&result);

            match &result {
                Ok(outcome) => {
                    InvocationMetrics::record(outcome.label());
                    tracing::info!(outcome = outcome.label(), message = %outcome, "Invocation succeeded");
                }
                Err(err) => {
                    InvocationMetrics::record(err.label());
                    tracing::error!(error = %err, "Invocation failed");
                }
            }

            completion
        }
        .instrument(span)
        .await
    }
}
