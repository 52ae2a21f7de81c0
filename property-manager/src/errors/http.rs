use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use property_manager_repository::ServiceError;
use property_manager_shared::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type HttpResult<T> = Result<T, HttpError>;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{0}")]
    NotFound(String),

    /// The write would break a uniqueness or referential rule.
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid form input")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(errors) => HttpError::Validation(errors),
            ServiceError::NotFound { entity, id } => {
                HttpError::NotFound(format!("{entity} {id} not found"))
            }
            ServiceError::Integrity(msg) => HttpError::Conflict(msg),
            other => HttpError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for HttpError {
    fn from(errors: ValidationErrors) -> Self {
        HttpError::Validation(errors)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            HttpError::Validation(errors) => json!({ "errors": errors }),
            HttpError::Internal(msg) => {
                error!(status = %status, error = %msg, "Request failed");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
