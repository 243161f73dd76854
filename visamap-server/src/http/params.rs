//! Query-string parameters shared by the stats endpoints

use serde::Deserialize;
use visamap_core::{MapFilter, PieFilter};

/// Raw `?year=&quarter=&status=&exclude_groups=` parameters.
///
/// Everything is read as a string so a malformed `year` degrades to
/// "absent" instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsParams {
    pub year: Option<String>,
    pub quarter: Option<String>,
    pub status: Option<String>,
    pub exclude_groups: Option<String>,
}

impl StatsParams {
    pub fn year(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }

    pub fn pie_filter(&self) -> Option<PieFilter> {
        PieFilter::new(
            self.year(),
            self.quarter.as_deref(),
            self.status.as_deref(),
            self.exclude_groups.as_deref(),
        )
    }

    pub fn map_filter(&self) -> MapFilter {
        MapFilter::new(
            self.year(),
            self.quarter.as_deref(),
            self.status.as_deref(),
            self.exclude_groups.as_deref(),
        )
    }
}
