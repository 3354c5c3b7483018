//! Network transport seam
//!
//! The pipeline treats the network as an opaque request/response
//! channel: one trait method per endpoint, raw body strings out. The
//! reqwest-backed [`HttpTransport`] is the production implementation;
//! tests drive the pipeline with an in-memory mock instead.

use async_trait::async_trait;
use ssassist_protocol::{ChatRequest, FeedbackRecord};
use thiserror::Error;

/// Errors from the request/response channel
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to the assistant: {0}")]
    Connect(String),

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Connectivity failures get a dedicated user-visible apology.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, TransportError::Connect(_))
    }
}

/// Opaque request/response channel to the assistant backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /chat` — returns the raw response body for the decoder.
    async fn chat(&self, request: &ChatRequest) -> Result<String, TransportError>;

    /// `POST /feedback` — any non-success status is a failure; the
    /// protocol defines no structured error body.
    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), TransportError>;
}

/// HTTP transport over reqwest
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<String, TransportError> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.text().await.map_err(map_reqwest)
    }

    async fn feedback(&self, record: &FeedbackRecord) -> Result<(), TransportError> {
        let response = self
            .http
            .post(format!("{}/feedback", self.base_url))
            .json(record)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(())
    }
}

fn map_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
