//! CSV ingestion for the `immigration` table.
//!
//! The whole file is parsed into memory before the bulk insert.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, VisaError};
use crate::record::{Column, ImmigrationRecord};

/// Records parsed from one CSV file
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub records: Vec<ImmigrationRecord>,
    /// Rows dropped because a numeric field failed to convert
    pub skipped: usize,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: usize,
    pub reset: bool,
}

/// Parse CSV rows from any reader.
///
/// The first row is the header. Rows with a bad `Year` or `Decisions` value
/// are skipped with a warning; a broken CSV stream is an error.
pub fn read_records<R: Read>(reader: R) -> Result<ImportBatch> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|e| VisaError::csv("header row", e))?
        .clone();

    let columns: Vec<Option<Column>> = headers.iter().map(Column::from_header).collect();
    if columns.iter().all(Option::is_none) {
        return Err(VisaError::unrecognised_header(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    for (raw, column) in headers.iter().zip(&columns) {
        if column.is_none() {
            debug!(header = raw, "ignoring unknown CSV column");
        }
    }

    let mut batch = ImportBatch::default();
    for row in csv.records() {
        let row = row.map_err(|e| VisaError::csv("data row", e))?;

        match ImmigrationRecord::from_fields(&columns, row.iter()) {
            Ok(record) => batch.records.push(record),
            Err(err) => {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                warn!(line, error = %err, row = ?row, "skipping row due to data conversion error");
                batch.skipped += 1;
            }
        }
    }

    info!(
        rows = batch.records.len(),
        skipped = batch.skipped,
        "parsed CSV"
    );
    Ok(batch)
}

/// Open and parse a CSV file.
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<ImportBatch> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(VisaError::path_not_found(path));
    }

    info!("Opening file: {}", path.display());
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Year,Quarter,Nationality,Region,Visa type group,Visa type,Visa type subgroup,Applicant type,Case outcome,Decisions
2024,2024 Q1,India,Asia South,Work,Skilled Worker,Health and Care,Main applicant,Issued,\"12,500\"
2024,2024 Q1,India,Asia South,Study,Student,Sponsored study,Main applicant,Refused,300
bad,2024 Q1,France,Europe,Visitor,Standard,Other,Main applicant,Issued,10
2024,2024 Q2,France,Europe,Visitor,Standard,Other,Main applicant,Issued,
";

    #[test]
    fn parses_rows_and_skips_bad_ones() {
        let batch = read_records(SAMPLE.as_bytes()).unwrap();

        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.skipped, 1);

        let first = &batch.records[0];
        assert_eq!(first.decisions, Some(12_500));
        assert_eq!(first.visa_type_group.as_deref(), Some("Work"));
        assert_eq!(first.applicant_type.as_deref(), Some("Main applicant"));

        assert_eq!(batch.records[2].decisions, None);
    }

    #[test]
    fn rejects_unrelated_csv() {
        let err = read_records("foo,bar\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VisaError::UnrecognisedHeader { .. }));
    }

    #[test]
    fn header_only_file_is_empty_batch() {
        let batch = read_records("Year,Nationality\n".as_bytes()).unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let batch = read_records("Year,Nationality,Decisions\n2023,Chile\n".as_bytes()).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].nationality.as_deref(), Some("Chile"));
        assert_eq!(batch.records[0].decisions, None);
    }

    #[test]
    fn reads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let batch = read_records_from_path(file.path()).unwrap();
        assert_eq!(batch.records.len(), 3);
    }

    #[test]
    fn missing_path_is_reported() {
        let err = read_records_from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, VisaError::PathNotFound { .. }));
    }
}
