//! Output writer for augmented CSV files
//!
//! Copies every input field byte for byte and appends the H3 index as the
//! last column. The output keeps the input delimiter.

use csv::ByteRecord;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::config::JobConfig;
use crate::constants::H3_INDEX_COLUMN;
use crate::models::Record;
use crate::{Error, Result};

/// Settings the writer needs from the job configuration
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub has_headers: bool,
    pub delimiter: u8,
    pub overwrite: bool,
}

impl From<&JobConfig> for WriterOptions {
    fn from(config: &JobConfig) -> Self {
        Self {
            has_headers: config.has_headers,
            delimiter: config.delimiter,
            overwrite: config.overwrite,
        }
    }
}

/// Input header plus the index column label
pub fn output_headers(input_headers: &ByteRecord) -> ByteRecord {
    let mut headers = input_headers.clone();
    headers.push_field(H3_INDEX_COLUMN.as_bytes());
    headers
}

#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    csv_writer: csv::Writer<W>,
    rows_written: u64,
}

impl RecordWriter<File> {
    /// Create the output file. Without `overwrite` an existing file is left
    /// untouched and [`Error::OutputExists`] is returned.
    pub fn create(
        path: &Path,
        input_headers: Option<&ByteRecord>,
        options: &WriterOptions,
    ) -> Result<Self> {
        let file = if options.overwrite {
            File::create(path)?
        } else {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => Error::OutputExists {
                        path: path.to_path_buf(),
                    },
                    _ => Error::Io(e),
                })?
        };

        debug!("Created output file: {}", path.display());
        Self::from_writer(file, input_headers, options)
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wrap any writer, emitting the header row first when the job has one
    pub fn from_writer(
        writer: W,
        input_headers: Option<&ByteRecord>,
        options: &WriterOptions,
    ) -> Result<Self> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_writer(writer);

        if options.has_headers {
            if let Some(headers) = input_headers {
                csv_writer.write_byte_record(&output_headers(headers))?;
            }
        }

        Ok(Self {
            csv_writer,
            rows_written: 0,
        })
    }

    /// Write one record followed by its index, or an empty field when invalid
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let h3_index: &[u8] = if record.is_valid {
            record.h3_index.as_bytes()
        } else {
            b""
        };

        self.csv_writer.write_record(
            record
                .original_fields
                .iter()
                .chain(std::iter::once(h3_index)),
        )?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.csv_writer.flush()?;
        Ok(())
    }

    /// Flush buffered rows and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.csv_writer.flush()?;
        self.csv_writer
            .into_inner()
            .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}
