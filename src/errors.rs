//! Error taxonomy shared by the stores and the HTTP layer.
//!
//! Every failure is local to its request.  The HTTP rendering is always
//! `{"success": false, "error": <code>, "message": <text>}` with a status
//! chosen per variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failure talking to the analysis webhook, classified coarsely so the
/// front end can pick a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("analysis webhook timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("analysis webhook refused the connection")]
    ConnectionRefused,
    #[error("could not connect to analysis webhook: {0}")]
    ConnectionFailed(String),
    #[error("network error talking to analysis webhook: {0}")]
    Network(String),
    #[error("analysis webhook answered with status {status}")]
    Status { status: u16, body: String },
    #[error("analysis webhook is not configured")]
    NotConfigured,
    #[error("unexpected analysis webhook failure: {0}")]
    Unknown(String),
}

impl UpstreamError {
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { .. } => "TIMEOUT",
            UpstreamError::ConnectionRefused => "CONNECTION_REFUSED",
            UpstreamError::ConnectionFailed(_) => "CONNECTION_FAILED",
            UpstreamError::Network(_) => "NETWORK_ERROR",
            UpstreamError::Status { .. } => "UPSTREAM_STATUS",
            UpstreamError::NotConfigured => "NOT_CONFIGURED",
            UpstreamError::Unknown(_) => "UNKNOWN",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authorization(String),
    #[error("Sending too fast; retry in {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn forbidden() -> Self {
        AppError::Authorization("Operator privileges required".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authorization(_) => "FORBIDDEN",
            AppError::RateLimited { .. } => "RATE_LIMITED",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Upstream(inner) => inner.code(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after_ms = match &self {
            AppError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        };
        let upstream_status = match &self {
            AppError::Upstream(UpstreamError::Status { status, .. }) => Some(*status),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            error: self.code(),
            message: self.to_string(),
            retry_after_ms,
            upstream_status,
        };
        (self.status(), Json(body)).into_response()
    }
}
