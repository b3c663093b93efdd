//! Mapping from service errors to HTTP responses.
//!
//! Validation failures and missing references at write time are 400s with a
//! `{field, message}` body; a missing resource on a read is 404; anything
//! unexpected is a 500 with a generic message (the detail is logged, never
//! leaked to the caller).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use spectrum_core::ServiceError;
use spectrum_types::ErrorBody;

/// Wrapper making `ServiceError` usable as an axum rejection.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            ServiceError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    field: Some(field.to_owned()),
                    message,
                },
            ),
            err @ ServiceError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    field: None,
                    message: err.to_string(),
                },
            ),
            err @ (ServiceError::Database(_) | ServiceError::Corrupt { .. }) => {
                tracing::error!("request failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        field: None,
                        message: "Internal error".into(),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
