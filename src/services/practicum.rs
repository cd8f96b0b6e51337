use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Endpoint {endpoint} returned status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Source of homework status payloads
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw payload for everything updated since `from_date`
    async fn fetch(&self, from_date: i64) -> Result<Value, TransportError>;
}

/// Practicum homework API client
/// Handles all communication with the homework_statuses endpoint
pub struct PracticumClient {
    client: Client,
    token: String,
    endpoint: String,
}

impl PracticumClient {
    pub fn new(token: String, endpoint: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            token,
            endpoint,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, TransportError> {
        tracing::info!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(endpoint = %self.endpoint, status = status.as_u16(), "Endpoint unavailable");
            return Err(TransportError::UnexpectedStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidBody(e.to_string()))
    }
}
