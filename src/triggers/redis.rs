use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::pipeline::{Completion, OrderEmailPipeline};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Redis Pub/Sub trigger: every message payload is one stream envelope.
pub struct RedisTrigger {
    config: RedisConfig,
    pipeline: Arc<OrderEmailPipeline>,
    shutdown: broadcast::Sender<()>,
}

impl RedisTrigger {
    pub fn new(config: RedisConfig, pipeline: Arc<OrderEmailPipeline>) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            config,
            pipeline,
            shutdown,
        }
    }

    /// Get a shutdown signal sender
    pub fn shutdown_signal(&self) -> broadcast::Sender<()> {
        self.shutdown.clone()
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.channels.is_empty()
    }

    /// Subscribe and process messages until shutdown.
    /// Returns immediately when no channels are configured.
    pub async fn start(&self) -> anyhow::Result<()> {
        if !self.is_enabled() {
            tracing::info!("No Redis channels configured, Redis trigger disabled");
            return Ok(());
        }

        let channels = &self.config.channels;
        tracing::info!(channels = ?channels, "Starting Redis trigger");

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            match self.run_subscription_loop(channels, &mut shutdown_rx).await {
                Ok(()) => {
                    tracing::info!("Redis trigger stopped gracefully");
                    break;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Redis subscription error, reconnecting in {} seconds...",
                        RECONNECT_DELAY.as_secs()
                    );
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_subscription_loop(
        &self,
        channels: &[String],
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let mut pubsub = tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::info!("Received shutdown signal while connecting");
                return Ok(());
            }
            pubsub = self.subscribe(channels) => pubsub?,
        };

        tracing::info!("Redis subscription established");

        let mut message_stream = pubsub.on_message();

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Received shutdown signal");
                    return Ok(());
                }
                msg = message_stream.next() => {
                    let Some(msg) = msg else {
                        anyhow::bail!("Redis message stream ended");
                    };

                    let channel = msg.get_channel_name().to_string();
                    let payload: String = match msg.get_payload() {
                        Ok(p) => p,
                        Err(e) => {
                            tracing::warn!(error = %e, channel = %channel, "Failed to get message payload");
                            continue;
                        }
                    };

                    self.handle_message(&channel, &payload).await;
                }
            }
        }
    }

    async fn subscribe(&self, channels: &[String]) -> anyhow::Result<redis::aio::PubSub> {
        let client = redis::Client::open(self.config.url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        for channel in channels {
            if is_pattern(channel) {
                pubsub.psubscribe(channel).await?;
                tracing::debug!(pattern = %channel, "Subscribed to pattern");
            } else {
                pubsub.subscribe(channel).await?;
                tracing::debug!(channel = %channel, "Subscribed to channel");
            }
        }

        Ok(pubsub)
    }

    /// Messages are processed one at a time, in arrival order.
    async fn handle_message(&self, channel: &str, payload: &str) -> Option<Completion> {
        let envelope: serde_json::Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    channel = %channel,
                    "Redis message is not a JSON envelope"
                );
                return None;
            }
        };

        let invocation_id = Uuid::new_v4();
        let completion = self.pipeline.invoke(invocation_id, &envelope).await;

        tracing::debug!(
            channel = %channel,
            invocation_id = %invocation_id,
            success = completion.is_success(),
            message = %completion.message(),
            "Processed envelope from Redis"
        );

        Some(completion)
    }
}

fn is_pattern(channel: &str) -> bool {
    channel.contains('*') || channel.contains('?') || channel.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::mailer::NoopEmailSender;
    use crate::template::{
        Renderer, RepositoryError, TemplateContent, TemplateDescriptor, TemplateRepository,
    };

    struct EmptyRepository;

    #[async_trait]
    impl TemplateRepository for EmptyRepository {
        async fn list_templates(&self) -> Result<Vec<TemplateDescriptor>, RepositoryError> {
            Ok(vec![])
        }

        async fn fetch_template(&self, name: &str) -> Result<TemplateContent, RepositoryError> {
            Err(RepositoryError::UnexpectedStatus {
                status: 404,
                body: name.to_string(),
            })
        }
    }

    fn trigger(channels: Vec<String>) -> RedisTrigger {
        let pipeline = Arc::new(OrderEmailPipeline::new(
            Arc::new(EmptyRepository),
            Arc::new(NoopEmailSender),
            Renderer::default(),
        ));
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            channels,
        };
        RedisTrigger::new(config, pipeline)
    }

    fn trigger_at(url: String, channels: Vec<String>) -> RedisTrigger {
        let mut trigger = trigger(channels);
        trigger.config.url = url;
        trigger
    }

    #[test]
    fn test_pattern_detection() {
        assert!(is_pattern("orders:*"));
        assert!(is_pattern("orders:?"));
        assert!(is_pattern("orders:[ab]"));
        assert!(!is_pattern("orders:created"));
    }

    #[tokio::test]
    async fn test_start_without_channels_returns() {
        let trigger = trigger(vec![]);
        assert!(!trigger.is_enabled());
        assert!(trigger.start().await.is_ok());
    }

    #[tokio::test]
    async fn test_non_json_message_is_skipped() {
        let trigger = trigger(vec!["orders".to_string()]);
        assert!(trigger.handle_message("orders", "not json").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_envelope_fails() {
        let trigger = trigger(vec!["orders".to_string()]);
        let completion = trigger
            .handle_message("orders", r#"{"Records": []}"#)
            .await
            .unwrap();

        assert!(!completion.is_success());
        assert!(completion.message().starts_with("event not as expected"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_reconnect_loop() {
        let trigger = Arc::new(trigger(vec!["orders".to_string()]));
        let shutdown = trigger.shutdown_signal();

        let running = trigger.clone();
        let handle = tokio::spawn(async move { running.start().await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = shutdown.send(());

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }

    #[tokio::test]
    async fn test_shutdown_while_subscribing_is_not_missed() {
        // Accepts connections but never answers, so SUBSCRIBE hangs
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("redis://{}", listener.local_addr().unwrap());

        let trigger = Arc::new(trigger_at(url, vec!["orders".to_string()]));
        let shutdown = trigger.shutdown_signal();

        let running = trigger.clone();
        let handle = tokio::spawn(async move { running.start().await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = shutdown.send(());

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
        drop(listener);
    }
}
