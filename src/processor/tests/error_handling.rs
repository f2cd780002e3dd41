//! Error handling integration tests

use super::write_input;
use crate::Error;
use crate::config::JobConfig;
use crate::models::Record;
use crate::processor::writer::{RecordWriter, WriterOptions};
use crate::processor::{CsvH3Processor, flush_after_failure, process_file};
use csv::ByteRecord;
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[test]
fn test_every_row_too_short() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "short.csv", "1\n2\n3\n");
    let output = temp_dir.path().join("out.csv");

    let result = process_file(
        JobConfig::new(&input)
            .with_output(&output)
            .with_headers(false)
            .with_columns("0", "1"),
    )
    .unwrap();

    assert_eq!(result.total_records, 0);
    assert_eq!(result.malformed_rows, 3);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_unknown_columns_create_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "points.csv", "name,north,east\na,1,2\n");
    let output = temp_dir.path().join("out.csv");

    let err = process_file(
        JobConfig::new(&input)
            .with_output(&output)
            .with_columns("lat_x", "lng_x"),
    )
    .unwrap_err();

    assert!(matches!(err, Error::ColumnNotFound { .. }));
    assert!(err.is_setup_error());
    assert!(!output.exists());
}

#[test]
fn test_same_column_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "points.csv", "coord,other\n1,2\n");
    let output = temp_dir.path().join("out.csv");

    let err = process_file(
        JobConfig::new(&input)
            .with_output(&output)
            .with_columns("coord", "coord"),
    )
    .unwrap_err();

    assert!(matches!(err, Error::SameColumn { index: 0 }));
    assert!(!output.exists());
}

#[test]
fn test_existing_output_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "points.csv", "latitude,longitude\n1,2\n");
    let output = write_input(&temp_dir, "out.csv", "precious");

    let err = process_file(JobConfig::new(&input).with_output(&output)).unwrap_err();

    assert!(matches!(err, Error::OutputExists { .. }));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "precious");

    let result = process_file(
        JobConfig::new(&input)
            .with_output(&output)
            .with_overwrite(true),
    )
    .unwrap();
    assert_eq!(result.valid_records, 1);
    assert!(std::fs::read_to_string(&output).unwrap().starts_with("latitude,longitude,h3_index"));
}

#[test]
fn test_invalid_resolution_fails_before_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "points.csv", "latitude,longitude\n1,2\n");
    let output = temp_dir.path().join("out.csv");

    let err = process_file(
        JobConfig::new(&input)
            .with_output(&output)
            .with_resolution(16),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidResolution { resolution: 16 }));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let err = process_file(JobConfig::new(temp_dir.path().join("absent.csv"))).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
}

#[test]
fn test_empty_input_has_no_header() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "empty.csv", "");
    let output = temp_dir.path().join("out.csv");

    let err = process_file(JobConfig::new(&input).with_output(&output)).unwrap_err();
    assert!(matches!(err, Error::MissingHeader { .. }));
    assert!(!output.exists());
}

#[test]
fn test_cancellation_stops_job() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "points.csv", "latitude,longitude\n1,2\n3,4\n");
    let output = temp_dir.path().join("out.csv");

    let token = CancellationToken::new();
    token.cancel();
    let mut processor = CsvH3Processor::new(JobConfig::new(&input).with_output(&output))
        .unwrap()
        .with_cancellation(token);

    let err = processor.process().unwrap_err();
    assert!(matches!(err, Error::Interrupted { .. }));

    // header written during setup stays, no data rows follow
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "latitude,longitude,h3_index\n"
    );
}

#[test]
fn test_output_aliasing_input_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let content = "latitude,longitude\n1,2\n3,4\n";
    let input = write_input(&temp_dir, "points.csv", content);
    std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
    let aliased = temp_dir.path().join("sub/../points.csv");

    let err = process_file(
        JobConfig::new(&input)
            .with_output(&aliased)
            .with_overwrite(true),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(std::fs::read_to_string(&input).unwrap(), content);
}

/// Output that accepts nothing
struct BrokenOutput;

impl std::io::Write for BrokenOutput {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}

#[test]
fn test_failed_flush_keeps_original_error() {
    let options = WriterOptions {
        has_headers: false,
        delimiter: b',',
        overwrite: false,
    };
    let mut writer = RecordWriter::from_writer(BrokenOutput, None, &options).unwrap();
    let mut record = Record::new(ByteRecord::from(vec!["1", "2"]), 2);
    record.is_valid = true;
    record.h3_index = "88754e6499fffff".to_string();
    writer.write_record(&record).unwrap();

    let err = flush_after_failure(
        &mut writer,
        Path::new("out.csv"),
        Error::interrupted("cancelled after 1 rows"),
    );
    assert!(matches!(err, Error::Interrupted { .. }));
}
