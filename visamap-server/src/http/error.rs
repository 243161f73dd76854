//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! The `error` field carries the human-readable message the frontend shows.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required query parameters missing (400)
    BadRequest { message: &'static str },

    /// Resource not found (404)
    NotFound { what: &'static str },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn missing_pie_params() -> Self {
        Self::BadRequest {
            message: "Missing year, quarter, or status parameter",
        }
    }

    pub fn country_not_found() -> Self {
        Self::NotFound { what: "Country" }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": message,
                    "kind": "bad_request"
                }),
            ),
            Self::NotFound { what } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": format!("{} not found", what),
                    "kind": "not_found"
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "an internal error occurred",
                        "kind": "internal_error"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_params_is_400() {
        let response = ApiError::missing_pie_params().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing year, quarter, or status parameter");
    }

    #[tokio::test]
    async fn country_not_found_is_404() {
        let response = ApiError::country_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Country not found");
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "an internal error occurred");
    }
}
