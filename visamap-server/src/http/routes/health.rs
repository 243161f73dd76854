//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::db::ping;
use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(database_up: bool) -> (StatusCode, Self) {
        let (code, status, database) = if database_up {
            (StatusCode::OK, "ok", "up")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        };
        (
            code,
            Self {
                status,
                database,
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    }
}

/// GET /health - 503 while the database is unreachable
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, body) = HealthResponse::new(ping(&state.pool).await);
    (code, Json(body))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_database_state() {
        let (code, body) = HealthResponse::new(true);
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, "up");

        let (code, body) = HealthResponse::new(false);
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "down");
    }
}
