//! Core data structures for CSV H3 processing.
//!
//! Defines the in-flight record, the row and record level failure values,
//! and the job result reported once a stream has been exhausted.

use chrono::{DateTime, Utc};
use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::h3::GenerationError;
use crate::validator::CoordinateError;

/// Which of the two coordinate columns a value or specifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateField::Latitude => write!(f, "latitude"),
            CoordinateField::Longitude => write!(f, "longitude"),
        }
    }
}

/// Why a record that was read successfully carries no H3 index
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidReason {
    #[error("{0} value is empty")]
    EmptyCoordinate(CoordinateField),

    /// `value` is the raw text, lossily decoded when it is not UTF-8
    #[error("{field} value '{value}' is not a number")]
    UnparseableCoordinate {
        field: CoordinateField,
        value: String,
    },

    #[error("invalid coordinates: {0}")]
    OutOfRange(#[from] CoordinateError),

    #[error("H3 generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),
}

/// A row too short to reach both coordinate columns
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRow {
    pub line_number: u64,
    pub reason: String,
}

/// One data row in flight through the pipeline
#[derive(Debug, Clone)]
pub struct Record {
    /// Raw field bytes in input order, in whatever encoding the input uses
    pub original_fields: ByteRecord,

    /// Parsed latitude, meaningful only when `is_valid`
    pub latitude: f64,

    /// Parsed longitude, meaningful only when `is_valid`
    pub longitude: f64,

    /// Generated H3 index, empty when invalid
    pub h3_index: String,

    /// 1-based line of the row in the source
    pub line_number: u64,

    pub is_valid: bool,

    pub invalid_reason: Option<InvalidReason>,
}

impl Record {
    /// Create a record that has not been parsed yet
    pub fn new(original_fields: ByteRecord, line_number: u64) -> Self {
        Self {
            original_fields,
            latitude: 0.0,
            longitude: 0.0,
            h3_index: String::new(),
            line_number,
            is_valid: false,
            invalid_reason: None,
        }
    }

    /// Mark the record invalid, clearing any derived index
    pub fn invalidate(&mut self, reason: InvalidReason) {
        self.is_valid = false;
        self.h3_index.clear();
        self.invalid_reason = Some(reason);
    }

    /// Field count of the output row: original fields plus the index column
    pub fn output_width(&self) -> usize {
        self.original_fields.len() + 1
    }
}

/// Summary of one completed job
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub total_records: u64,
    pub valid_records: u64,
    pub invalid_records: u64,
    pub malformed_rows: u64,
    pub processing_time_ms: u64,
    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl JobResult {
    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }

    /// Share of forwarded records that received an index, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.valid_records as f64 / self.total_records as f64) * 100.0
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_clears_index() {
        let mut record = Record::new(ByteRecord::from(vec!["a", "1", "2"]), 2);
        record.is_valid = true;
        record.h3_index = "8828308281fffff".to_string();

        record.invalidate(InvalidReason::EmptyCoordinate(CoordinateField::Latitude));

        assert!(!record.is_valid);
        assert!(record.h3_index.is_empty());
        assert_eq!(record.output_width(), 4);
        assert_eq!(
            record.invalid_reason.unwrap().to_string(),
            "latitude value is empty"
        );
    }

    #[test]
    fn test_success_rate() {
        let result = JobResult {
            total_records: 4,
            valid_records: 3,
            invalid_records: 1,
            malformed_rows: 2,
            processing_time_ms: 12,
            output_path: PathBuf::from("out.csv"),
            started_at: Utc::now(),
        };
        assert_eq!(result.success_rate(), 75.0);
        assert_eq!(result.processing_time(), Duration::from_millis(12));

        let empty = JobResult {
            total_records: 0,
            valid_records: 0,
            invalid_records: 0,
            ..result
        };
        assert_eq!(empty.success_rate(), 0.0);
    }
}
