//! Repository implementations for database access

pub mod stats;

pub use stats::{FilterOptions, NationalityTotal, StatsRepo, VisaTypeTotal};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
