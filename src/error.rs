//! Error handling for CSV H3 processing jobs.
//!
//! Setup failures, fatal I/O and sink failures share one error type. Per-row
//! and per-record problems are not errors at this level: they are values
//! ([`crate::models::MalformedRow`], [`crate::models::InvalidReason`]) that
//! the streaming processor counts and moves past.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::CoordinateField;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input file does not exist: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Cannot read input file {path}: {reason}")]
    InputNotReadable { path: PathBuf, reason: String },

    #[error("Input file {path} has no header row")]
    MissingHeader { path: PathBuf },

    #[error("{field} column not found: '{specifier}'")]
    ColumnNotFound {
        field: CoordinateField,
        specifier: String,
    },

    #[error("Latitude and longitude resolve to the same column (index {index})")]
    SameColumn { index: usize },

    #[error("H3 resolution {resolution} is out of valid range [0, 15]")]
    InvalidResolution { resolution: u8 },

    #[error("Output file already exists: {path} (use --overwrite to replace it)")]
    OutputExists { path: PathBuf },

    #[error("Output directory is not usable: {path} - {reason}")]
    OutputDirectory { path: PathBuf, reason: String },

    #[error("Record sink failed at line {line}: {source}")]
    SinkFailed {
        line: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error was raised before any record was read.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::InputNotFound { .. }
                | Error::InputNotReadable { .. }
                | Error::MissingHeader { .. }
                | Error::ColumnNotFound { .. }
                | Error::SameColumn { .. }
                | Error::InvalidResolution { .. }
                | Error::OutputExists { .. }
                | Error::OutputDirectory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_names_the_field() {
        let err = Error::ColumnNotFound {
            field: CoordinateField::Longitude,
            specifier: "lng_x".to_string(),
        };
        assert_eq!(err.to_string(), "longitude column not found: 'lng_x'");
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_sink_failure_is_not_setup() {
        let err = Error::SinkFailed {
            line: 7,
            source: Box::new(Error::Io(std::io::Error::other("disk full"))),
        };
        assert!(!err.is_setup_error());
        assert!(err.to_string().contains("line 7"));
    }
}
