use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::market_data::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Refresh cancelled")]
    Cancelled,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "Refresh cancelled").into_response(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

/// Errors raised by an LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM is not configured")]
    NotConfigured,
    #[error("LLM request timed out")]
    Timeout,
    #[error("LLM rate limited")]
    RateLimited,
    #[error("LLM network error: {0}")]
    NetworkError(String),
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("LLM returned an invalid response: {0}")]
    InvalidResponse(String),
}
