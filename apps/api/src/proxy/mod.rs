//! Pass-through proxy to the AI providers, so browser clients never call the
//! provider APIs cross-origin.
//!
//! One round trip per request: the upstream status and body come back
//! unchanged and nothing is retried.

pub mod handlers;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;

pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Openai,
}

impl Provider {
    /// Request header that carries the caller's credential.
    pub fn credential_header(self) -> &'static str {
        match self {
            Provider::Anthropic => "x-api-key",
            Provider::Openai => "authorization",
        }
    }

    pub fn missing_credential_message(self) -> &'static str {
        match self {
            Provider::Anthropic => "API key required",
            Provider::Openai => "Authorization header required",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Openai => "openai",
        }
    }
}

/// An outbound request, already resolved to its upstream URL and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Sends a resolved request upstream. Carried in `AppState` as
/// `Arc<dyn Forwarder>` so tests can substitute a recording fake.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// `reqwest`-backed forwarder used in production.
#[derive(Clone)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build proxy HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, ProxyError> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("content-type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(url = %request.url, status, size = body.len(), "upstream responded");
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_credential_headers() {
        assert_eq!(Provider::Anthropic.credential_header(), "x-api-key");
        assert_eq!(Provider::Openai.credential_header(), "authorization");
        assert_eq!(Provider::Anthropic.missing_credential_message(), "API key required");
    }

    #[test]
    fn test_http_forwarder_builds() {
        assert!(HttpForwarder::new(Duration::from_secs(5)).is_ok());
    }
}
