//! HTTP-facing error type.
//!
//! Every failure leaving a handler is rendered as:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::error::ShortenerError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details: json!({}),
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::ServiceUnavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidUrl(e) => {
                AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
            }
            ShortenerError::InvalidExpiry => AppError::bad_request(
                "Invalid expiry",
                json!({ "reason": "expires_at must be in the future" }),
            ),
            // Malformed codes cannot exist, so they are indistinguishable from unknown ones
            ShortenerError::InvalidCode(_) => AppError::not_found("Short link not found", json!({})),
            ShortenerError::NotFound(code) => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            ShortenerError::AllocatorUnavailable(e) | ShortenerError::StoreUnavailable(e) => {
                tracing::error!("Backend unavailable: {}", e);
                AppError::service_unavailable("Service temporarily unavailable")
            }
            ShortenerError::ServiceUnavailable { attempts } => {
                tracing::error!("Identifier allocation failed after {} attempts", attempts);
                AppError::service_unavailable("Service temporarily unavailable")
            }
            ShortenerError::DuplicateCode(code) => {
                tracing::error!("Allocated short code {} already exists", code);
                AppError::internal("Internal server error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", json!({ "fields": fields }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::code_encoder::CodeError;
    use crate::utils::url_normalizer::UrlNormalizationError;

    #[test]
    fn test_shortener_error_status_mapping() {
        let cases = [
            (
                ShortenerError::InvalidUrl(UrlNormalizationError::Empty),
                StatusCode::BAD_REQUEST,
            ),
            (ShortenerError::InvalidExpiry, StatusCode::BAD_REQUEST),
            (
                ShortenerError::InvalidCode(CodeError::Zero),
                StatusCode::NOT_FOUND,
            ),
            (
                ShortenerError::NotFound("abc".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ShortenerError::StoreUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ShortenerError::AllocatorUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ShortenerError::ServiceUnavailable { attempts: 4 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ShortenerError::DuplicateCode("abc".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_unavailable_hides_backend_details() {
        let err = AppError::from(ShortenerError::StoreUnavailable(
            "postgres://user:secret@db".to_string(),
        ));
        let info = err.to_error_info();

        assert_eq!(info.code, "service_unavailable");
        assert_eq!(info.details, json!({}));
        assert!(!info.message.contains("secret"));
    }

    #[test]
    fn test_not_found_carries_code() {
        let info = AppError::from(ShortenerError::NotFound("4C92".to_string())).to_error_info();

        assert_eq!(info.code, "not_found");
        assert_eq!(info.details, json!({ "code": "4C92" }));
    }
}
