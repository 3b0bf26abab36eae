use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::time::Duration;
use thiserror::Error;

/// Catalog domain errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unsupported image type: {0}")]
    UnsupportedMediaType(String),

    #[error("Image exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Image processing failed: {0}")]
    ImageProcessingFailed(String),

    #[error("{0} is not configured")]
    ConfigurationMissing(String),

    #[error("Image search quota exceeded")]
    RateLimited,

    #[error("Image search provider rejected the credentials")]
    Unauthorized,

    #[error("{0}")]
    UpstreamError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    InvalidContent(String),

    #[error("Merchandise code {0} already exists")]
    DuplicateCode(String),

    #[error("Family {0} already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", entity, id))
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        CatalogError::Persistence(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound(_) => AppError::NotFound(message),
            CatalogError::InvalidArgument(_) | CatalogError::InvalidContent(_) => {
                AppError::BadRequest(message)
            }
            CatalogError::Validation(errors) => AppError::ValidationError(errors),
            CatalogError::UnsupportedMediaType(_) => AppError::UnsupportedMediaType(message),
            CatalogError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(message),
            CatalogError::ImageProcessingFailed(_) => AppError::UnprocessableEntity(message),
            CatalogError::ConfigurationMissing(_) => AppError::ServiceUnavailable(message),
            CatalogError::RateLimited => AppError::TooManyRequests(message),
            CatalogError::Unauthorized | CatalogError::UpstreamError(_) => {
                AppError::BadGateway(message)
            }
            CatalogError::Timeout(_) => AppError::GatewayTimeout(message),
            CatalogError::DuplicateCode(_) | CatalogError::DuplicateName(_) => {
                AppError::Conflict(message)
            }
            CatalogError::Persistence(msg) => AppError::Database(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
