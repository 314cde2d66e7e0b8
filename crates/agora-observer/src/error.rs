//! Error types for the HTTP API.
//!
//! [`ApiError`] maps the core taxonomy onto status codes and renders the
//! `{ "error": ..., "status": ... }` body every failing endpoint returns.

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use agora_core::AgoraError;
use agora_core::error::retry_after_secs;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] AgoraError),

    /// A query parameter or body could not be understood.
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// The HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Core(AgoraError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(AgoraError::Validation { .. }) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Core(AgoraError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Core(AgoraError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
            Self::Core(AgoraError::Persistence(_) | AgoraError::Corrupt(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        let retry_after = match &self {
            Self::Core(AgoraError::RateLimited { retry_after }) => {
                Some(retry_after_secs(*retry_after))
            }
            _ => None,
        };
        if let (Some(secs), Some(map)) = (retry_after, body.as_object_mut()) {
            map.insert("retry_after_secs".to_owned(), secs.into());
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}
