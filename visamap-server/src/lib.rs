//! visamap-server: aggregation endpoints and static pages
//!
//! Serves the world-map page and the two JSON endpoints it polls:
//! per-country totals for the heatmap and a per-visa-group breakdown
//! for the drill-down pie chart.

pub mod db;
pub mod http;

pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
