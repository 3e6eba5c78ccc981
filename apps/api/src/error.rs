//! Error types for the HTTP layer.
//!
//! Every failure leaves the server as
//! `{"success": false, "message": "..."}` with a matching status code.
//!
//! ## Mapping
//! ```text
//! ServiceError::Core(EmailTaken)           → 409 Conflict
//! ServiceError::Core(_)                    → 400 Bad Request
//! ServiceError::Db(UniqueViolation)        → 409 Conflict
//! ServiceError::Db(_)                      → 500, details logged only
//! JsonRejection / PathRejection            → 400 Bad Request
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error, warn};

use styler_core::CoreError;
use styler_db::DbError;

use crate::services::ServiceError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Message is for the log; clients get a generic one.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// Prefixes the client message of a 400, keeping other kinds as they are.
    pub fn with_context(self, prefix: &str) -> Self {
        match self {
            ApiError::BadRequest(msg) => ApiError::BadRequest(format!("{prefix}: {msg}")),
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => error!(error = %detail, "Request failed"),
            ApiError::Conflict(_) => warn!(error = %self, "Request rejected"),
            _ => debug!(error = %self, "Client error"),
        }

        let body = json!({
            "success": false,
            "message": self.client_message(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(CoreError::EmailTaken(email)) => {
                ApiError::Conflict(CoreError::EmailTaken(email).to_string())
            }
            ServiceError::Core(core) => ApiError::BadRequest(core.to_string()),
            ServiceError::Db(DbError::UniqueViolation { field, value }) => {
                ApiError::Conflict(format!("{field} '{value}' already exists"))
            }
            ServiceError::Db(db) => ApiError::Internal(db.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {err}"))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
