//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthub_domain::error::{SmartHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SmartHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SmartHubError);

impl From<SmartHubError> for ApiError {
    fn from(err: SmartHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SmartHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SmartHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SmartHubError::Storage(_) => {
                tracing::error!(error = %self.0.chain(), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            SmartHubError::Transport(_) => {
                tracing::error!(error = %self.0.chain(), "request failed");
                (StatusCode::BAD_GATEWAY, "upstream unavailable".to_string())
            }
            SmartHubError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, self.0.to_string()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
