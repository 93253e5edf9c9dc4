//! HTTP error mapping.
//!
//! Every error leaving a handler becomes a `{ "message": ... }` body with
//! the status the taxonomy prescribes. Storage and internal failures are
//! logged in full but reach the client only as a generic 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use siteround_core::SiteroundError;
use tracing::error;

/// Wrapper turning a [`SiteroundError`] into an HTTP response.
pub struct ApiError(pub SiteroundError);

impl From<SiteroundError> for ApiError {
    fn from(err: SiteroundError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SiteroundError::InvalidInput { message } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            SiteroundError::Conflict { message } | SiteroundError::InvalidState { message } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            SiteroundError::Unauthenticated { reason } => {
                (StatusCode::UNAUTHORIZED, reason.clone())
            }
            SiteroundError::Forbidden { reason } => (StatusCode::FORBIDDEN, reason.clone()),
            SiteroundError::NotFound { entity, .. } => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            SiteroundError::Storage(detail) | SiteroundError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, please try again".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
