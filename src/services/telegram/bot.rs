use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::services::telegram::{ApiResponse, NotificationError, RetryConfig, SendMessageRequest};

/// Delivery channel for user-facing messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), NotificationError>;
}

/// Telegram Bot API client bound to a single chat
pub struct TelegramBot {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
    retry_config: RetryConfig,
}

impl TelegramBot {
    pub fn new(api_url: String, token: String, chat_id: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            chat_id,
            retry_config: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn deliver(&self, text: &str) -> Result<(), NotificationError> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout
                } else {
                    // reqwest errors carry the URL, which embeds the bot token
                    NotificationError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| NotificationError::Network(e.without_url().to_string()))?;

        let envelope: ApiResponse = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(_) if !(200..300).contains(&status) => {
                return Err(NotificationError::Api {
                    status,
                    description: raw,
                });
            }
            Err(e) => return Err(NotificationError::InvalidResponse(e.to_string())),
        };

        if envelope.ok && (200..300).contains(&status) {
            return Ok(());
        }

        let retry_after = envelope.retry_after();
        let description = envelope
            .description
            .unwrap_or_else(|| "no description".to_string());
        match retry_after {
            Some(secs) => Err(NotificationError::RateLimited {
                retry_after: Duration::from_secs(secs),
                description,
            }),
            None => Err(NotificationError::Api {
                status: envelope.error_code.unwrap_or(status),
                description,
            }),
        }
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send_message(&self, text: &str) -> Result<(), NotificationError> {
        let mut attempt = 0;
        loop {
            match self.deliver(text).await {
                Ok(()) => {
                    tracing::info!(chat_id = %self.chat_id, text, "Message sent to Telegram");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && self.retry_config.should_retry(attempt + 1) => {
                    let delay = e
                        .retry_after()
                        .unwrap_or_else(|| self.retry_config.delay_for(attempt));
                    tracing::warn!(attempt, error = %e, ?delay, "Telegram delivery failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(chat_id = %self.chat_id, error = %e, "Telegram delivery failed");
                    return Err(e);
                }
            }
        }
    }
}
