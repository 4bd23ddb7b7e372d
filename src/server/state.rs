use std::sync::Arc;
use std::time::Instant;

use crate::config::{MailBackend, Settings};
use crate::error::AppError;
use crate::http::build_client;
use crate::mailer::{EmailSender, HttpEmailSender, NoopEmailSender};
use crate::pipeline::OrderEmailPipeline;
use crate::template::{HttpTemplateRepository, Renderer};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pipeline: Arc<OrderEmailPipeline>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let client = build_client(&settings.http)?;

        let repository = Arc::new(HttpTemplateRepository::new(
            client.clone(),
            &settings.template_repo,
        ));
        let sender = build_sender(&settings, client)?;
        let renderer = Renderer::new(settings.render.escape_html);

        let pipeline = Arc::new(OrderEmailPipeline::new(repository, sender, renderer));

        Ok(Self::with_pipeline(settings, pipeline))
    }

    /// State around an already assembled pipeline
    pub fn with_pipeline(settings: Settings, pipeline: Arc<OrderEmailPipeline>) -> Self {
        Self {
            settings: Arc::new(settings),
            pipeline,
            start_time: Instant::now(),
        }
    }
}

fn build_sender(
    settings: &Settings,
    client: reqwest::Client,
) -> Result<Arc<dyn EmailSender>, AppError> {
    match settings.mail.backend {
        MailBackend::Http => {
            let (Some(base_url), Some(api_key)) =
                (&settings.mail.api_base_url, &settings.mail.api_key)
            else {
                return Err(AppError::Internal(
                    "http mail backend requires api_base_url and api_key".to_string(),
                ));
            };
            Ok(Arc::new(HttpEmailSender::new(client, base_url, api_key)))
        }
        MailBackend::Noop => {
            tracing::warn!("Mail backend is noop, emails will only be logged");
            Ok(Arc::new(NoopEmailSender))
        }
    }
}
