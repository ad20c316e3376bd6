use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Web search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("Provider '{provider}' unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Reserved for session-state failure. The in-memory store has no
    /// corruption path today; the kind stays in the wire contract so a
    /// persistent backend can use it without breaking clients.
    #[error("Memory store error: {0}")]
    MemoryStore(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_kind, message) = match self {
            ApiError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, "ValidationError", msg)
            }
            ApiError::Ingestion(msg) => {
                tracing::warn!("Ingestion error: {}", msg);
                (StatusCode::BAD_REQUEST, "IngestionError", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::SearchUnavailable(msg) => {
                tracing::warn!("Web search unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "SearchUnavailableError", msg)
            }
            ApiError::ProviderUnavailable { provider, reason } => {
                tracing::error!("Provider '{}' unavailable: {}", provider, reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ProviderUnavailableError",
                    format!("Provider '{}' unavailable: {}", provider, reason),
                )
            }
            ApiError::MemoryStore(msg) => {
                tracing::error!("Memory store error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "MemoryStoreError", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_kind.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
