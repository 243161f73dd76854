//! Heatmap endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use visamap_core::iso_from_name;

use crate::db::{NationalityTotal, StatsRepo};
use crate::http::error::ApiError;
use crate::http::params::StatsParams;
use crate::http::server::AppState;

/// One country on the map, keyed the way the map library expects
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MapPoint {
    pub id: &'static str,
    pub value: i64,
}

/// Convert nationality totals to map points, dropping names with no ISO code.
pub fn to_map_points(totals: Vec<NationalityTotal>) -> Vec<MapPoint> {
    totals
        .into_iter()
        .filter_map(|row| {
            let name = row.nationality?;
            match iso_from_name(&name) {
                Some(id) => Some(MapPoint {
                    id,
                    value: row.total,
                }),
                None => {
                    tracing::debug!(country = %name, "no ISO code for nationality, skipping");
                    None
                }
            }
        })
        .collect()
}

/// GET /api/map-data - issued visa totals per country
async fn map_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Vec<MapPoint>>, ApiError> {
    let filter = params.map_filter();
    if !filter.is_issued() {
        return Ok(Json(Vec::new()));
    }

    let totals = StatsRepo::new(&state.pool).map_totals(&filter).await?;
    Ok(Json(to_map_points(totals)))
}

/// Map routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/map-data", get(map_data))
}
