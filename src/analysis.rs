//! Proxy to the external analysis workflow.
//!
//! The ban-pick analysis itself runs in a third-party workflow service
//! reached through a webhook.  This module only forwards the payload with a
//! bounded timeout and reports failures with a coarse classification.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use anyhow::Context;

use crate::errors::UpstreamError;

/// Raw upstream answer, passed back to the caller verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait::async_trait]
pub trait AnalysisUpstream: Send + Sync {
    async fn forward(&self, payload: serde_json::Value) -> Result<UpstreamReply, UpstreamError>;
}

/// Used when no webhook URL is configured; every request fails fast.
pub struct UnconfiguredUpstream;

#[async_trait::async_trait]
impl AnalysisUpstream for UnconfiguredUpstream {
    async fn forward(&self, _payload: serde_json::Value) -> Result<UpstreamReply, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }
}

/// POSTs the payload as JSON to the configured webhook.
pub struct WebhookUpstream {
    url: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl WebhookUpstream {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build analysis webhook client")?;
        Ok(Self {
            url: url.into(),
            timeout_ms,
            client,
        })
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            return UpstreamError::Timeout {
                timeout_ms: self.timeout_ms,
            };
        }
        if err.is_connect() {
            if has_io_kind(&err, io::ErrorKind::ConnectionRefused) {
                return UpstreamError::ConnectionRefused;
            }
            return UpstreamError::ConnectionFailed(root_cause(&err));
        }
        if err.is_request() || err.is_body() || err.is_decode() {
            return UpstreamError::Network(root_cause(&err));
        }
        UpstreamError::Unknown(root_cause(&err))
    }
}

#[async_trait::async_trait]
impl AnalysisUpstream for WebhookUpstream {
    async fn forward(&self, payload: serde_json::Value) -> Result<UpstreamReply, UpstreamError> {
        let started = std::time::Instant::now();
        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.classify(err))?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.bytes().await.map_err(|err| self.classify(err))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "analysis webhook returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        tracing::debug!(status = status.as_u16(), elapsed_ms, bytes = body.len(), "analysis webhook answered");
        Ok(UpstreamReply {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

fn has_io_kind(err: &(dyn StdError + 'static), kind: io::ErrorKind) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == kind {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
