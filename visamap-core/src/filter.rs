//! Request filter model shared by the map and pie-chart queries.

use serde::Serialize;

/// Status used by the heatmap when none is given; also the only status the
/// heatmap has data for.
pub const DEFAULT_MAP_STATUS: &str = "Issued";

/// Quarter selector from the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Quarter {
    /// Whole year
    Total,
    /// A quarter token as it appears after the year in the quarter column
    Named(String),
}

impl Quarter {
    /// Parse a query parameter. Empty means "not given".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            None
        } else if s.eq_ignore_ascii_case("total") {
            Some(Self::Total)
        } else {
            Some(Self::Named(s.to_owned()))
        }
    }
}

/// Visa type groups to leave out of an aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExcludedGroups(Vec<String>);

impl ExcludedGroups {
    /// Parse a comma separated list such as `"Work,Study"`.
    ///
    /// ```
    /// use visamap_core::ExcludedGroups;
    ///
    /// let groups = ExcludedGroups::parse("Work, Study,,");
    /// assert_eq!(groups.as_slice(), ["Work", "Study"]);
    /// assert!(ExcludedGroups::parse("").is_empty());
    /// ```
    pub fn parse(s: &str) -> Self {
        Self(
            s.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Time window applied to the quarter/year columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodFilter {
    /// `quarter LIKE '{year} %'`
    QuarterPrefix(i32),
    /// `quarter ILIKE '{year} {quarter}'`
    Quarter { year: i32, quarter: String },
    /// `year = {year}`
    Year(i32),
}

impl PeriodFilter {
    /// Full quarter column value for [`PeriodFilter::Quarter`]
    pub fn quarter_label(year: i32, quarter: &str) -> String {
        format!("{} {}", year, quarter)
    }
}

/// Filters for one country's visa-group breakdown. Every field except the
/// exclusions is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieFilter {
    pub year: i32,
    pub quarter: Quarter,
    pub status: String,
    pub excluded: ExcludedGroups,
}

impl PieFilter {
    /// Returns `None` when year, quarter or status is missing. A zero year
    /// counts as missing.
    pub fn new(
        year: Option<i32>,
        quarter: Option<&str>,
        status: Option<&str>,
        exclude_groups: Option<&str>,
    ) -> Option<Self> {
        let year = year.filter(|y| *y != 0)?;
        let quarter = quarter.and_then(Quarter::parse)?;
        let status = status.map(str::trim).filter(|s| !s.is_empty())?;

        Some(Self {
            year,
            quarter,
            status: status.to_owned(),
            excluded: ExcludedGroups::parse(exclude_groups.unwrap_or_default()),
        })
    }

    pub fn period(&self) -> PeriodFilter {
        match &self.quarter {
            Quarter::Total => PeriodFilter::QuarterPrefix(self.year),
            Quarter::Named(q) => PeriodFilter::Quarter {
                year: self.year,
                quarter: q.clone(),
            },
        }
    }
}

/// Filters for the all-countries heatmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFilter {
    pub year: Option<i32>,
    pub quarter: Option<Quarter>,
    pub status: String,
    pub excluded: ExcludedGroups,
}

impl MapFilter {
    pub fn new(
        year: Option<i32>,
        quarter: Option<&str>,
        status: Option<&str>,
        exclude_groups: Option<&str>,
    ) -> Self {
        Self {
            year: year.filter(|y| *y != 0),
            quarter: quarter.and_then(Quarter::parse),
            status: status.unwrap_or(DEFAULT_MAP_STATUS).to_owned(),
            excluded: ExcludedGroups::parse(exclude_groups.unwrap_or_default()),
        }
    }

    /// The heatmap only shows issued visas; any other status yields no data.
    pub fn is_issued(&self) -> bool {
        self.status == DEFAULT_MAP_STATUS
    }

    pub fn period(&self) -> Option<PeriodFilter> {
        let year = self.year?;
        Some(match &self.quarter {
            Some(Quarter::Named(q)) => PeriodFilter::Quarter {
                year,
                quarter: q.clone(),
            },
            Some(Quarter::Total) | None => PeriodFilter::Year(year),
        })
    }
}

impl Default for MapFilter {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}
