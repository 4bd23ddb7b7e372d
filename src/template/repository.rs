//! Remote template repository: directory listing and per-file content.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::codec;
use crate::config::TemplateRepoConfig;
use crate::metrics::UpstreamTimer;

use super::{TemplateContent, TemplateDescriptor};

const UPSTREAM: &str = "template_repository";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("template repository unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("template repository responded with {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("template repository returned an unreadable body: {0}")]
    Decode(String),
}

/// Source of email templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Current directory listing, in repository order
    async fn list_templates(&self) -> Result<Vec<TemplateDescriptor>, RepositoryError>;

    /// Content of one template file
    async fn fetch_template(&self, name: &str) -> Result<TemplateContent, RepositoryError>;
}

/// File object returned for a single path; `content` is base64 JSON.
#[derive(Debug, Deserialize)]
struct RepositoryFile {
    content: String,
}

/// Token-authenticated HTTP template repository
pub struct HttpTemplateRepository {
    client: reqwest::Client,
    base_url: String,
    token: String,
    user_agent: String,
}

impl HttpTemplateRepository {
    pub fn new(client: reqwest::Client, config: &TemplateRepoConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn directory_url(&self) -> &str {
        &self.base_url
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// GET `url` once and return the body of a 200 response.
    async fn get(&self, url: &str) -> Result<String, RepositoryError> {
        let timer = UpstreamTimer::start(UPSTREAM);
        let result = self.send_get(url).await;
        timer.finish(result.is_ok());
        result
    }

    async fn send_get(&self, url: &str) -> Result<String, RepositoryError> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "Template repository request failed"
            );
            return Err(RepositoryError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl TemplateRepository for HttpTemplateRepository {
    async fn list_templates(&self) -> Result<Vec<TemplateDescriptor>, RepositoryError> {
        let body = self.get(self.directory_url()).await?;
        let templates: Vec<TemplateDescriptor> = serde_json::from_str(&body)
            .map_err(|e| RepositoryError::Decode(format!("directory listing: {}", e)))?;

        tracing::debug!(count = templates.len(), "Loaded template directory");
        Ok(templates)
    }

    async fn fetch_template(&self, name: &str) -> Result<TemplateContent, RepositoryError> {
        let body = self.get(&self.file_url(name)).await?;
        let file: RepositoryFile = serde_json::from_str(&body)
            .map_err(|e| RepositoryError::Decode(format!("file {}: {}", name, e)))?;

        codec::decode_base64_json(&file.content)
            .map_err(|e| RepositoryError::Decode(format!("file {} content: {}", name, e)))
    }
}
