use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::auth::AuthError;
use crate::core::FilterError;
use crate::models::ErrorResponse;
use crate::services::StoreError;

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap a storage failure, keeping conflicts and missing rows as client errors
    pub fn storage(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::Conflict(what) => ApiError::Conflict(format!("{} already exists", what)),
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            source => {
                tracing::error!("{}: {}", context, source);
                ApiError::Storage { context, source }
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Auth(AuthError::MissingToken) => "unauthorized",
            ApiError::Auth(AuthError::InvalidToken(_)) => "invalid_token",
            ApiError::Auth(AuthError::Forbidden { .. }) => "access_denied",
            ApiError::Storage { .. } => "storage_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(value: FilterError) -> Self {
        ApiError::Validation(value.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(value: validator::ValidationErrors) -> Self {
        ApiError::Validation(value.to_string())
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::MissingToken) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::InvalidToken(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            ApiError::Storage { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid query: {}", err)).into()
}
