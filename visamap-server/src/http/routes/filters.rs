//! Dropdown options endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{FilterOptions, StatsRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/filters - distinct years, quarters, outcomes and visa groups
async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, ApiError> {
    let options = StatsRepo::new(&state.pool).filter_options().await?;
    Ok(Json(options))
}

/// Filter option routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/filters", get(filter_options))
}
