/// Structured error types for visamap-core.
///
/// Uses `thiserror` so the server and CLI crates can compose these
/// into their own error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for visamap-core operations
#[derive(Error, Debug)]
pub enum VisaError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// CSV stream could not be read (bad UTF-8, truncated record, ...)
    #[error("CSV error in {context}: {source}")]
    Csv {
        context: String,
        source: csv::Error,
    },

    /// File or directory not found
    #[error("Path not found: {path:?}")]
    PathNotFound { path: PathBuf },

    /// CSV header shares no column with the `immigration` table
    #[error("CSV header has no recognised columns: {header}")]
    UnrecognisedHeader { header: String },
}

/// Result type alias for visamap-core operations
pub type Result<T> = std::result::Result<T, VisaError>;

impl VisaError {
    /// Create a CSV error with context
    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create an unrecognised header error
    pub fn unrecognised_header(header: impl Into<String>) -> Self {
        Self::UnrecognisedHeader {
            header: header.into(),
        }
    }
}
