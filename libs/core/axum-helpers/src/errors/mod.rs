pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1008)
/// - `error`: machine-readable error identifier (e.g., "CONFLICT")
/// - `message`: human-readable error message
/// - `details`: optional additional error details (e.g., validation errors)
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "Merchandise code PROD-1 already exists"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type; the
/// [`IntoResponse`] impl picks the status, the [`ErrorCode`] and the log level.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Unsupported Media Type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Gateway Timeout: {0}")]
    GatewayTimeout(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, client message, optional details and code for this error.
    fn parts(self) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), "JSON parsing error: {:?}", e);
                internal(ErrorCode::SerdeJsonError)
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                internal(ErrorCode::IoError)
            }
            AppError::JsonExtractorRejection(e) => {
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::ValidationError(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError.default_message().to_string(),
                Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                ErrorCode::ValidationError,
            ),
            AppError::InvalidId(msg) => (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidId),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                None,
                ErrorCode::UnprocessableEntity,
            ),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                msg,
                None,
                ErrorCode::UnsupportedMediaType,
            ),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, msg, None, ErrorCode::PayloadTooLarge)
            }
            AppError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg, None, ErrorCode::TooManyRequests)
            }
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg, None, ErrorCode::BadGateway),
            AppError::GatewayTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, msg, None, ErrorCode::GatewayTimeout)
            }
            AppError::Database(msg) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Database error: {}", msg);
                internal(ErrorCode::DatabaseError)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                internal(ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                None,
                ErrorCode::ServiceUnavailable,
            ),
        }
    }
}

/// Server-side failures never leak their cause to the client.
fn internal(code: ErrorCode) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code.default_message().to_string(),
        None,
        code,
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = self.parts();

        if status.is_server_error() {
            tracing::warn!(error_code = code.code(), %status, "{}", message);
        } else {
            tracing::info!(error_code = code.code(), %status, "{}", message);
        }

        let mut body = ErrorResponse::new(code, message);
        body.details = details;

        (status, Json(body)).into_response()
    }
}

/// Builds an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Product 9 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.code, 1004);
        assert_eq!(body.message, "Product 9 not found");
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_gateway_statuses() {
        let cases = [
            (AppError::TooManyRequests("quota".into()), StatusCode::TOO_MANY_REQUESTS),
            (AppError::BadGateway("boom".into()), StatusCode::BAD_GATEWAY),
            (AppError::GatewayTimeout("slow".into()), StatusCode::GATEWAY_TIMEOUT),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_database_error_hides_cause() {
        let response = AppError::Database("relation \"products\" does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "DATABASE_ERROR");
        assert_eq!(body.message, ErrorCode::DatabaseError.default_message());
    }

    #[tokio::test]
    async fn test_media_and_size_errors() {
        let response = AppError::UnsupportedMediaType("text/plain".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_of(response).await.error, "UNSUPPORTED_MEDIA_TYPE");

        let response = AppError::PayloadTooLarge("6 MiB".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
