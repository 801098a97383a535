//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medrec_core::RecordsError;
use serde_json::json;

pub enum ApiError {
    Core(RecordsError),
    Unauthenticated,
}

impl From<RecordsError> for ApiError {
    fn from(err: RecordsError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthenticated" })),
            )
                .into_response(),
            ApiError::Core(err) => match err {
                RecordsError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "validation", "field": field, "message": message })),
                )
                    .into_response(),
                RecordsError::NotFound(what) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "not_found", "message": format!("{what} not found") })),
                )
                    .into_response(),
                RecordsError::Forbidden => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "forbidden", "message": err.to_string() })),
                )
                    .into_response(),
                RecordsError::Conflict(message) => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "conflict", "message": message })),
                )
                    .into_response(),
                RecordsError::Database(_) | RecordsError::Serialization(_) => {
                    tracing::error!("request failed: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "internal" })),
                    )
                        .into_response()
                }
            },
        }
    }
}

/// Shorthand for a 400 naming the offending query parameter.
pub fn bad_param(field: &'static str, message: impl Into<String>) -> ApiError {
    ApiError::Core(RecordsError::validation(field, message))
}
