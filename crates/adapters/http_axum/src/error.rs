//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use aerotech_domain::error::AeroTechError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`AeroTechError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(AeroTechError);

impl<E: Into<AeroTechError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AeroTechError::Validation(_) => StatusCode::BAD_REQUEST,
            AeroTechError::Auth(_) => StatusCode::UNAUTHORIZED,
            AeroTechError::NotFound(_) => StatusCode::NOT_FOUND,
            AeroTechError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
