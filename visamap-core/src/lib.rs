pub mod country;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod record;

pub use country::{iso_from_name, name_from_iso, Country, COUNTRIES};
pub use error::{Result, VisaError};
pub use filter::{ExcludedGroups, MapFilter, PeriodFilter, PieFilter, Quarter, DEFAULT_MAP_STATUS};
pub use ingest::{read_records, read_records_from_path, ImportBatch, ImportReport};
pub use record::{clean_header, Column, ImmigrationRecord, QuarterLabel, RowError};
