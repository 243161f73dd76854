//! The `immigration` fact table row and CSV header mapping.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `"2024 Q1"` style quarter column values
static QUARTER_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4})\s+(\S+)\s*$").expect("invalid quarter label regex"));

/// A single row failed numeric conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("invalid Year value '{value}'")]
    InvalidYear { value: String },

    #[error("invalid Decisions value '{value}'")]
    InvalidDecisions { value: String },
}

/// Columns of the `immigration` table, in insert order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Year,
    Quarter,
    Nationality,
    Region,
    VisaTypeGroup,
    VisaType,
    VisaTypeSubgroup,
    ApplicantType,
    CaseOutcome,
    Decisions,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Year,
        Column::Quarter,
        Column::Nationality,
        Column::Region,
        Column::VisaTypeGroup,
        Column::VisaType,
        Column::VisaTypeSubgroup,
        Column::ApplicantType,
        Column::CaseOutcome,
        Column::Decisions,
    ];

    /// Column name in Postgres
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Nationality => "nationality",
            Self::Region => "region",
            Self::VisaTypeGroup => "visa_type_group",
            Self::VisaType => "visa_type",
            Self::VisaTypeSubgroup => "visa_type_subgroup",
            Self::ApplicantType => "applicant_type",
            Self::CaseOutcome => "case_outcome",
            Self::Decisions => "decisions",
        }
    }

    /// Header name after [`clean_header`]
    pub fn header_name(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Quarter => "Quarter",
            Self::Nationality => "Nationality",
            Self::Region => "Region",
            Self::VisaTypeGroup => "Visa_type_group",
            Self::VisaType => "Visa_type",
            Self::VisaTypeSubgroup => "Visa_type_subgroup",
            Self::ApplicantType => "Applicant_type",
            Self::CaseOutcome => "Case_outcome",
            Self::Decisions => "Decisions",
        }
    }

    /// Match a raw CSV header cell against the known columns.
    pub fn from_header(raw: &str) -> Option<Self> {
        let cleaned = clean_header(raw);
        Self::ALL
            .into_iter()
            .find(|col| col.header_name().eq_ignore_ascii_case(&cleaned))
    }
}

/// Normalise a CSV header cell: trim, then spaces become underscores.
///
/// ```
/// use visamap_core::clean_header;
///
/// assert_eq!(clean_header(" Visa type group "), "Visa_type_group");
/// ```
pub fn clean_header(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

/// One row of visa decision statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmigrationRecord {
    pub year: Option<i32>,
    pub quarter: Option<String>,
    pub nationality: Option<String>,
    pub region: Option<String>,
    pub visa_type_group: Option<String>,
    pub visa_type: Option<String>,
    pub visa_type_subgroup: Option<String>,
    pub applicant_type: Option<String>,
    pub case_outcome: Option<String>,
    pub decisions: Option<i64>,
}

impl ImmigrationRecord {
    /// Build a record from one CSV row.
    ///
    /// `columns` is the header mapping (one entry per CSV column, `None` for
    /// columns the table does not know about). Empty `Year` / `Decisions`
    /// cells become `None`; anything else must parse as an integer, with
    /// thousands separators stripped from `Decisions`.
    pub fn from_fields<'a, I>(columns: &[Option<Column>], fields: I) -> Result<Self, RowError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = Self::default();

        for (column, value) in columns.iter().zip(fields) {
            let Some(column) = column else {
                continue;
            };

            match column {
                Column::Year => record.year = parse_year(value)?,
                Column::Decisions => record.decisions = parse_decisions(value)?,
                Column::Quarter => record.quarter = Some(value.to_owned()),
                Column::Nationality => record.nationality = Some(value.to_owned()),
                Column::Region => record.region = Some(value.to_owned()),
                Column::VisaTypeGroup => record.visa_type_group = Some(value.to_owned()),
                Column::VisaType => record.visa_type = Some(value.to_owned()),
                Column::VisaTypeSubgroup => record.visa_type_subgroup = Some(value.to_owned()),
                Column::ApplicantType => record.applicant_type = Some(value.to_owned()),
                Column::CaseOutcome => record.case_outcome = Some(value.to_owned()),
            }
        }

        Ok(record)
    }
}

fn parse_year(value: &str) -> Result<Option<i32>, RowError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RowError::InvalidYear {
            value: value.to_owned(),
        })
}

fn parse_decisions(value: &str) -> Result<Option<i64>, RowError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .replace(',', "")
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RowError::InvalidDecisions {
            value: value.to_owned(),
        })
}

/// A parsed quarter column value such as `"2024 Q1"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterLabel {
    pub year: i32,
    pub quarter: String,
}

impl QuarterLabel {
    pub fn parse(s: &str) -> Option<Self> {
        let caps = QUARTER_LABEL_RE.captures(s)?;
        Some(Self {
            year: caps[1].parse().ok()?,
            quarter: caps[2].to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<Option<Column>> {
        cells.iter().map(|c| Column::from_header(c)).collect()
    }

    #[test]
    fn header_matching_is_lenient() {
        assert_eq!(Column::from_header("Visa type group"), Some(Column::VisaTypeGroup));
        assert_eq!(Column::from_header(" case outcome "), Some(Column::CaseOutcome));
        assert_eq!(Column::from_header("Decisions"), Some(Column::Decisions));
        assert_eq!(Column::from_header("Unknown thing"), None);
    }

    #[test]
    fn converts_numeric_fields() {
        let cols = header(&["Year", "Quarter", "Nationality", "Case outcome", "Decisions"]);
        let record =
            ImmigrationRecord::from_fields(&cols, ["2024", "2024 Q1", "India", "Issued", "1,234"])
                .unwrap();

        assert_eq!(record.year, Some(2024));
        assert_eq!(record.quarter.as_deref(), Some("2024 Q1"));
        assert_eq!(record.nationality.as_deref(), Some("India"));
        assert_eq!(record.case_outcome.as_deref(), Some("Issued"));
        assert_eq!(record.decisions, Some(1234));
        assert_eq!(record.region, None);
    }

    #[test]
    fn empty_numbers_become_none() {
        let cols = header(&["Year", "Decisions", "Region"]);
        let record = ImmigrationRecord::from_fields(&cols, ["", "", ""]).unwrap();

        assert_eq!(record.year, None);
        assert_eq!(record.decisions, None);
        assert_eq!(record.region.as_deref(), Some(""));
    }

    #[test]
    fn bad_numbers_are_row_errors() {
        let cols = header(&["Year", "Decisions"]);

        let err = ImmigrationRecord::from_fields(&cols, ["twenty", "5"]).unwrap_err();
        assert_eq!(err, RowError::InvalidYear { value: "twenty".into() });

        let err = ImmigrationRecord::from_fields(&cols, ["2024", "n/a"]).unwrap_err();
        assert_eq!(err, RowError::InvalidDecisions { value: "n/a".into() });

        // Whitespace is not empty, and not a number either
        assert!(ImmigrationRecord::from_fields(&cols, [" ", "5"]).is_err());
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let cols = header(&["Nationality", "Notes"]);
        let record = ImmigrationRecord::from_fields(&cols, ["France", "whatever"]).unwrap();
        assert_eq!(record.nationality.as_deref(), Some("France"));
    }

    #[test]
    fn quarter_label_parsing() {
        assert_eq!(
            QuarterLabel::parse("2023 Q4"),
            Some(QuarterLabel {
                year: 2023,
                quarter: "Q4".into()
            })
        );
        assert_eq!(QuarterLabel::parse("Q4"), None);
        assert_eq!(QuarterLabel::parse(""), None);
    }
}
