//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use medfleet_domain::error::{LifecycleError, MedfleetError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

/// Maps [`MedfleetError`] to an HTTP response with appropriate status code.
pub struct ApiError(MedfleetError);

impl From<MedfleetError> for ApiError {
    fn from(err: MedfleetError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MedfleetError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            MedfleetError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            MedfleetError::AlreadyExists(err) => (StatusCode::CONFLICT, err.to_string()),
            MedfleetError::Lifecycle(LifecycleError::EmptyLoad) => {
                (StatusCode::BAD_REQUEST, LifecycleError::EmptyLoad.to_string())
            }
            MedfleetError::Lifecycle(err) => (StatusCode::NOT_ACCEPTABLE, err.to_string()),
            MedfleetError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            MedfleetError::Token(err) => {
                tracing::error!(error = %err, "token error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            MedfleetError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
