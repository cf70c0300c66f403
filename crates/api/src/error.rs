use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use skiadmin_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `skiadmin_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation {
                    model,
                    context,
                    errors,
                } => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": core.to_string(),
                        "code": "VALIDATION_ERROR",
                        "context": context,
                        "model": model,
                        "errors": errors,
                    }),
                ),
                CoreError::NotFound { .. } => {
                    error_body(StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Duplicate { .. } => {
                    error_body(StatusCode::CONFLICT, "DUPLICATE", core.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    error_body(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => {
                error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Plain `{ "error", "code" }` body.
fn error_body(
    status: StatusCode,
    code: &'static str,
    message: String,
) -> (StatusCode, serde_json::Value) {
    (status, json!({ "error": message, "code": code }))
}
