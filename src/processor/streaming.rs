//! Streaming processing core
//!
//! Pulls rows from a [`RecordReader`] one at a time, validates coordinates,
//! generates the H3 index, and hands every readable record to a sink in
//! input order. Malformed rows are counted and dropped; invalid records are
//! counted and still forwarded. Only a failing sink, a failing input
//! stream or a cancelled token stops the loop.

use std::io;
use tokio_util::sync::CancellationToken;

use super::reader::{RecordReader, RowOutcome};
use crate::diagnostics::Diagnostics;
use crate::h3::IndexGenerator;
use crate::models::{InvalidReason, MalformedRow, Record};
use crate::validator::CoordinateValidator;
use crate::{Error, Result};

/// Counters for one job, returned once the stream is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingTally {
    /// Records forwarded to the sink; malformed rows are not included
    pub total_records: u64,

    /// Records that received an H3 index
    pub valid_records: u64,

    /// Rows skipped because they were too short to reach the coordinates
    pub malformed_rows: u64,
}

impl ProcessingTally {
    pub fn invalid_records(&self) -> u64 {
        self.total_records - self.valid_records
    }
}

/// Where a row ended up after processing
#[derive(Debug)]
pub enum RecordState {
    /// Skipped, produces no output row
    Malformed(MalformedRow),
    /// Coordinates empty or not numeric
    Unparsed(Record),
    /// Coordinates outside the valid domain
    OutOfRange(Record),
    /// Index generation rejected the coordinates
    GenerationFailed(Record),
    Indexed(Record),
}

impl RecordState {
    /// The record to forward, if any
    pub fn record(&self) -> Option<&Record> {
        match self {
            RecordState::Malformed(_) => None,
            RecordState::Unparsed(record)
            | RecordState::OutOfRange(record)
            | RecordState::GenerationFailed(record)
            | RecordState::Indexed(record) => Some(record),
        }
    }
}

#[derive(Debug)]
pub struct StreamingProcessor<V, G, D> {
    validator: V,
    generator: G,
    diagnostics: D,
    resolution: u8,
    cancellation_token: CancellationToken,
}

impl<V, G, D> StreamingProcessor<V, G, D>
where
    V: CoordinateValidator,
    G: IndexGenerator,
    D: Diagnostics,
{
    /// Create a processor, rejecting a resolution the generator cannot produce
    pub fn new(validator: V, generator: G, diagnostics: D, resolution: u8) -> Result<Self> {
        generator
            .validate_resolution(resolution)
            .map_err(|_| Error::InvalidResolution { resolution })?;

        Ok(Self {
            validator,
            generator,
            diagnostics,
            resolution,
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Stop the stream before the next row once `cancellation_token` is cancelled
    pub fn with_cancellation(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> D {
        self.diagnostics
    }

    /// Move one row through validation and generation
    pub fn process_row(&mut self, outcome: RowOutcome) -> RecordState {
        let mut record = match outcome {
            RowOutcome::Malformed(row) => {
                self.diagnostics.malformed_row(&row);
                return RecordState::Malformed(row);
            }
            RowOutcome::Parsed(record) => record,
        };

        if !record.is_valid {
            if let Some(reason) = &record.invalid_reason {
                self.diagnostics.invalid_record(record.line_number, reason);
            }
            record.h3_index.clear();
            return RecordState::Unparsed(record);
        }

        if let Err(e) = self.validator.validate(record.latitude, record.longitude) {
            let reason = InvalidReason::OutOfRange(e);
            self.diagnostics.invalid_record(record.line_number, &reason);
            record.invalidate(reason);
            return RecordState::OutOfRange(record);
        }

        match self
            .generator
            .generate(record.latitude, record.longitude, self.resolution)
        {
            Ok(h3_index) => {
                self.diagnostics.record_indexed(record.line_number, &h3_index);
                record.h3_index = h3_index;
                record.is_valid = true;
                record.invalid_reason = None;
                RecordState::Indexed(record)
            }
            Err(e) => {
                let reason = InvalidReason::GenerationFailed(e);
                self.diagnostics.invalid_record(record.line_number, &reason);
                record.invalidate(reason);
                RecordState::GenerationFailed(record)
            }
        }
    }

    /// Drain the reader, forwarding each readable record to `sink`.
    ///
    /// A sink error stops the stream immediately and is returned as
    /// [`Error::SinkFailed`]. Cancellation is checked before every row is
    /// pulled, malformed ones included, and returns [`Error::Interrupted`].
    pub fn process_stream<R, F>(
        &mut self,
        reader: &mut RecordReader<R>,
        mut sink: F,
    ) -> Result<ProcessingTally>
    where
        R: io::Read,
        F: FnMut(&Record) -> Result<()>,
    {
        let mut tally = ProcessingTally::default();

        loop {
            if self.cancellation_token.is_cancelled() {
                return Err(Error::interrupted(format!(
                    "cancelled after {} rows",
                    reader.rows_read()
                )));
            }

            let Some(outcome) = reader.next_record()? else {
                break;
            };
            let state = self.process_row(outcome);
            let Some(record) = state.record() else {
                tally.malformed_rows += 1;
                continue;
            };

            tally.total_records += 1;
            if matches!(state, RecordState::Indexed(_)) {
                tally.valid_records += 1;
            }

            sink(record).map_err(|e| Error::SinkFailed {
                line: record.line_number,
                source: Box::new(e),
            })?;
        }

        self.diagnostics.stream_complete(&tally);
        Ok(tally)
    }
}
