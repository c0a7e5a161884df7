// Outbound streaming client

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

use crate::error::{RelayError, Result};

/// Raw byte fragments in arrival order
///
/// The stream ending is the upstream's normal end-of-stream signal; an `Err`
/// item is a transport failure.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Trait for opening the upstream byte stream of a session
///
/// Failing to establish the connection is reported as an immediate
/// `RelayError::Connection` rather than as a stream.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn open_stream(&self, url: &str, payload: &Value) -> Result<ByteStream>;
}

/// reqwest-backed upstream client (POST with a JSON body)
pub struct HttpUpstreamClient {
    http_client: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpUpstreamClientBuilder {
        HttpUpstreamClientBuilder::default()
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn open_stream(&self, url: &str, payload: &Value) -> Result<ByteStream> {
        let response = self
            .http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let stream = response
            .bytes_stream()
            .map(|fragment| fragment.map_err(|e| RelayError::Transport(e.to_string())));

        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Default)]
pub struct HttpUpstreamClientBuilder {
    connect_timeout: Option<Duration>,
}

impl HttpUpstreamClientBuilder {
    /// Limit how long establishing the connection may take
    ///
    /// Only the connect phase is bounded; a stream that stays open is never
    /// cut off.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpUpstreamClient> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| RelayError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpUpstreamClient { http_client })
    }
}
