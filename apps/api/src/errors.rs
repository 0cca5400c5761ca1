use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The taxonomy mirrors the generation pipeline: configuration problems are
/// fatal and never retried; provider failures may be retried by re-submitting
/// the request; a malformed model response has already consumed its one
/// bounded retry by the time it surfaces here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Taxonomy code reported in JSON error bodies and SSE error events.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::UnknownModel(_) | LlmError::MissingCredential { .. } => {
                AppError::Configuration(e.to_string())
            }
            other => AppError::Provider(other.to_string()),
        }
    }
}

/// Max bytes of raw model output echoed back in a MALFORMED_RESPONSE body.
/// The full text goes to the logs; clients get enough to spot the problem.
const RAW_EXCERPT_LEN: usize = 500;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Provider(msg) => {
                tracing::error!("Provider error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::MalformedResponse { reason, raw } => {
                tracing::error!("Malformed model response: {reason}; raw output:\n{raw}");
                let excerpt: String = raw.chars().take(RAW_EXCERPT_LEN).collect();
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{reason}; raw output begins: {excerpt}"),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_codes_are_stable() {
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(AppError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(
            AppError::Configuration("x".into()).code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(AppError::Provider("x".into()).code(), "PROVIDER_ERROR");
        assert_eq!(
            AppError::MalformedResponse {
                reason: "x".into(),
                raw: String::new()
            }
            .code(),
            "MALFORMED_RESPONSE"
        );
    }

    #[test]
    fn test_unknown_model_maps_to_configuration() {
        let err: AppError = LlmError::UnknownModel("nope".into()).into();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_timeout_maps_to_provider() {
        let err: AppError = LlmError::Timeout { seconds: 240 }.into();
        assert_eq!(err.code(), "PROVIDER_ERROR");
    }
}
