//! Per-country pie chart endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use visamap_core::name_from_iso;

use crate::db::{StatsRepo, VisaTypeTotal};
use crate::http::error::ApiError;
use crate::http::params::StatsParams;
use crate::http::server::AppState;

/// One slice of the pie
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PieSlice {
    pub visa_type: Option<String>,
    pub decisions: i64,
}

impl From<VisaTypeTotal> for PieSlice {
    fn from(row: VisaTypeTotal) -> Self {
        Self {
            visa_type: row.visa_type_group,
            decisions: row.total,
        }
    }
}

/// GET /api/pie_chart/{country_code} - visa type breakdown for one country
async fn pie_chart(
    State(state): State<Arc<AppState>>,
    Path(country_code): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Vec<PieSlice>>, ApiError> {
    let filter = params.pie_filter().ok_or_else(ApiError::missing_pie_params)?;

    let country = name_from_iso(&country_code).ok_or_else(|| {
        tracing::debug!(code = %country_code, "unknown country code");
        ApiError::country_not_found()
    })?;

    let rows = StatsRepo::new(&state.pool)
        .pie_breakdown(country, &filter)
        .await?;

    Ok(Json(rows.into_iter().map(PieSlice::from).collect()))
}

/// Pie chart routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/pie_chart/{country_code}", get(pie_chart))
}
