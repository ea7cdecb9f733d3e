use crate::domain::error::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// HTTP face of [`DomainError`].
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError(DomainError::InvalidInput(msg.into()))
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidInput(_) | DomainError::Parse(_) => StatusCode::BAD_REQUEST,
            DomainError::Embedding(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Database(_) | DomainError::Io(_) | DomainError::DimensionMismatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self.0 {
            DomainError::NotFound(_) => "Product not found".to_string(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
