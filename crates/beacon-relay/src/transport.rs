//! Outbound transports — verified and unverifiable JSON POSTs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::types::{Unverified, VerifiedResponse};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Sends a JSON payload to a URL in one of the two delivery modes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send and hand back the response for inspection.
    async fn send_verified(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<VerifiedResponse, TransportError>;

    /// Send without looking at the response. Only a failure of the call
    /// itself is reported.
    async fn send_unverified(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<Unverified, TransportError>;
}

/// Shared HTTP client with a per-call timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, TransportError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(TransportError::from)
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Ok(Self::with_client(build_http_client(timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_verified(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<VerifiedResponse, TransportError> {
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // An unreadable body is treated like an empty one.
        let body = response.text().await.unwrap_or_default();

        debug!("Verified POST {} -> {}", url, status);
        Ok(VerifiedResponse {
            status,
            content_type,
            body,
        })
    }

    async fn send_unverified(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<Unverified, TransportError> {
        // Status and body are never inspected in this mode.
        let _ = self.client.post(url).json(payload).send().await?;
        debug!("Unverified POST {} dispatched", url);
        Ok(Unverified)
    }
}
