//! CSV H3 Processor Library
//!
//! Streams delimited-text files with latitude/longitude columns and appends
//! an H3 cell index to every record.
//!
//! This library provides tools for:
//! - Resolving coordinate columns by name, alias or position
//! - Reading rows one at a time, separating malformed rows from invalid records
//! - Validating coordinates and generating H3 indexes at a chosen resolution
//! - Writing the augmented file with the original fields untouched
//!
//! ```no_run
//! use csv_h3_processor::{JobConfig, process_file};
//!
//! let config = JobConfig::new("points.csv").with_resolution(9);
//! let result = process_file(config)?;
//! println!("{} of {} records indexed", result.valid_records, result.total_records);
//! # Ok::<(), csv_h3_processor::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod h3;
pub mod models;
pub mod processor;
pub mod validator;

// Re-export commonly used types
pub use config::JobConfig;
pub use error::{Error, Result};
pub use models::{CoordinateField, InvalidReason, JobResult, MalformedRow, Record};
pub use processor::{CsvH3Processor, process_file};
