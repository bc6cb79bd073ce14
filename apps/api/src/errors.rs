use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Wire contract: the body is `{"error": "..."}` with an additional
/// `"details"` field for downstream/unexpected failures. Clients only
/// dispatch on the HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Version conflict")]
    VersionConflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("AI generation error: {0}")]
    Llm(String),

    #[error("Shopify error: {0}")]
    Shopify(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Not authenticated".to_string(),
                None,
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::VersionConflict => (
                StatusCode::CONFLICT,
                "Version conflict".to_string(),
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI generation failed".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Shopify(msg) => {
                tracing::error!("Shopify error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Shopify request failed".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Email(msg) => {
                tracing::error!("Email error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = match details {
            Some(details) => Json(json!({ "error": message, "details": details })),
            None => Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}
