//! Streaming record reader
//!
//! Wraps a `csv::Reader`, consumes the header line when one is expected,
//! resolves the coordinate columns, and then yields one [`RowOutcome`] per
//! data row. Rows are kept as raw bytes; only the two coordinate fields are
//! decoded. Only failures of the underlying stream are errors, and short rows
//! come back as [`RowOutcome::Malformed`].

use csv::{ByteRecord, ErrorKind};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::column_mapping::ColumnMapping;
use crate::config::JobConfig;
use crate::models::{CoordinateField, InvalidReason, MalformedRow, Record};
use crate::{Error, Result};

/// Settings the reader needs from the job configuration
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub has_headers: bool,
    pub delimiter: u8,
    pub latitude_column: String,
    pub longitude_column: String,
}

impl From<&JobConfig> for ReaderOptions {
    fn from(config: &JobConfig) -> Self {
        Self {
            has_headers: config.has_headers,
            delimiter: config.delimiter,
            latitude_column: config.lat_column.clone(),
            longitude_column: config.lng_column.clone(),
        }
    }
}

/// Result of reading one data row
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// Row reached both coordinate columns; the record may still be invalid
    Parsed(Record),
    /// Row must be skipped entirely
    Malformed(MalformedRow),
}

#[derive(Debug)]
pub struct RecordReader<R> {
    csv_reader: csv::Reader<R>,
    source: PathBuf,
    headers: Option<ByteRecord>,
    mapping: ColumnMapping,
    rows_read: u64,
    exhausted: bool,
}

impl RecordReader<File> {
    /// Open a file and resolve its coordinate columns
    pub fn open(path: &Path, options: &ReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::InputNotReadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        Self::with_source(file, options, path.to_path_buf())
    }
}

impl<R: io::Read> RecordReader<R> {
    /// Read from any byte source
    pub fn from_reader(reader: R, options: &ReaderOptions) -> Result<Self> {
        Self::with_source(reader, options, PathBuf::from("<input>"))
    }

    fn with_source(reader: R, options: &ReaderOptions, source: PathBuf) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(reader);

        let headers = if options.has_headers {
            let mut header = ByteRecord::new();
            let found = csv_reader.read_byte_record(&mut header).map_err(|e| {
                if matches!(e.kind(), ErrorKind::Io(_)) {
                    Error::Csv(e)
                } else {
                    Error::InputNotReadable {
                        path: source.clone(),
                        reason: format!("failed to read header row: {}", e),
                    }
                }
            })?;
            if !found {
                return Err(Error::MissingHeader { path: source });
            }
            Some(header)
        } else {
            None
        };

        let mapping = ColumnMapping::resolve(
            headers.as_ref(),
            &options.latitude_column,
            &options.longitude_column,
        )?;

        debug!(
            "Resolved coordinate columns for {}: latitude={}, longitude={}",
            source.display(),
            mapping.latitude_index,
            mapping.longitude_index
        );

        Ok(Self {
            csv_reader,
            source,
            headers,
            mapping,
            rows_read: 0,
            exhausted: false,
        })
    }

    /// Read the next data row. `Ok(None)` marks the end of the stream.
    pub fn next_record(&mut self) -> Result<Option<RowOutcome>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut row = ByteRecord::new();
        match self.csv_reader.read_byte_record(&mut row) {
            Ok(false) => {
                self.exhausted = true;
                Ok(None)
            }
            Ok(true) => {
                self.rows_read += 1;
                let line_number = row
                    .position()
                    .map(|p| p.line())
                    .unwrap_or_else(|| self.fallback_line());
                Ok(Some(self.parse_row(row, line_number)))
            }
            Err(e) => {
                if let ErrorKind::Io(_) = e.kind() {
                    self.exhausted = true;
                    return Err(Error::Csv(e));
                }
                self.rows_read += 1;
                let line_number = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or_else(|| self.fallback_line());
                Ok(Some(RowOutcome::Malformed(MalformedRow {
                    line_number,
                    reason: e.to_string(),
                })))
            }
        }
    }

    fn fallback_line(&self) -> u64 {
        self.rows_read + u64::from(self.headers.is_some())
    }

    fn parse_row(&self, row: ByteRecord, line_number: u64) -> RowOutcome {
        let required = self.mapping.required_width();
        if row.len() < required {
            return RowOutcome::Malformed(MalformedRow {
                line_number,
                reason: format!(
                    "row has insufficient columns: expected at least {}, got {}",
                    required,
                    row.len()
                ),
            });
        }

        let latitude = parse_coordinate(&row, &self.mapping, CoordinateField::Latitude);
        let longitude = parse_coordinate(&row, &self.mapping, CoordinateField::Longitude);

        let mut record = Record::new(row, line_number);
        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => {
                record.latitude = latitude;
                record.longitude = longitude;
                record.is_valid = true;
            }
            (Err(reason), _) | (_, Err(reason)) => record.invalidate(reason),
        }

        RowOutcome::Parsed(record)
    }

    pub fn headers(&self) -> Option<&ByteRecord> {
        self.headers.as_ref()
    }

    pub fn mapping(&self) -> ColumnMapping {
        self.mapping
    }

    pub fn latitude_index(&self) -> usize {
        self.mapping.latitude_index
    }

    pub fn longitude_index(&self) -> usize {
        self.mapping.longitude_index
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Data rows read so far, malformed ones included
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Release the underlying stream
    pub fn close(self) {
        debug!(
            "Closing reader for {} after {} rows",
            self.source.display(),
            self.rows_read
        );
    }
}

impl<R: io::Read> Iterator for RecordReader<R> {
    type Item = Result<RowOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Decode, trim and parse one coordinate with the standard float parser
fn parse_coordinate(
    row: &ByteRecord,
    mapping: &ColumnMapping,
    field: CoordinateField,
) -> std::result::Result<f64, InvalidReason> {
    let raw = row.get(mapping.index_of(field)).unwrap_or_default();
    let unparseable = || InvalidReason::UnparseableCoordinate {
        field,
        value: String::from_utf8_lossy(raw).into_owned(),
    };

    let text = std::str::from_utf8(raw).map_err(|_| unparseable())?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidReason::EmptyCoordinate(field));
    }

    trimmed.parse::<f64>().map_err(|_| unparseable())
}
