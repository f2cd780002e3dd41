//! Job orchestration.
//!
//! Wires the reader, the streaming processor and the writer together for one
//! input file. Setup happens in a fixed order so that a job failing on its
//! columns or its resolution never leaves an output file behind: the config
//! is validated, the input is opened and its columns resolved, the processor
//! is built, and only then is the output created.

pub mod column_mapping;
pub mod reader;
pub mod streaming;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    reader::{ReaderOptions, RecordReader},
    streaming::StreamingProcessor,
    writer::{RecordWriter, WriterOptions},
};

use crate::config::JobConfig;
use crate::constants::{MAX_REPORTED_ISSUES, PROGRESS_UPDATE_INTERVAL, resolution_description};
use crate::diagnostics::{Issue, RecordingDiagnostics, TracingDiagnostics};
use crate::h3::H3IndexGenerator;
use crate::models::JobResult;
use crate::validator::GeographicBounds;
use crate::{Error, Result};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs one CSV-to-H3 job
#[derive(Debug)]
pub struct CsvH3Processor {
    config: JobConfig,
    show_progress: bool,
    cancellation_token: CancellationToken,
    issue_limit: usize,
    issues: Vec<Issue>,
    dropped_issues: u64,
}

impl CsvH3Processor {
    /// Create a processor for a validated configuration
    pub fn new(config: JobConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            show_progress: false,
            cancellation_token: CancellationToken::new(),
            issue_limit: MAX_REPORTED_ISSUES,
            issues: Vec::new(),
            dropped_issues: 0,
        })
    }

    /// Show a row-counting spinner on stderr while the job runs
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Stop the job before its next row once `cancellation_token` is cancelled
    pub fn with_cancellation(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    pub fn with_issue_limit(mut self, issue_limit: usize) -> Self {
        self.issue_limit = issue_limit;
        self
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Issues recorded by the last run, capped at the issue limit
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn dropped_issues(&self) -> u64 {
        self.dropped_issues
    }

    /// Stream the input to the output, returning the job counters
    pub fn process(&mut self) -> Result<JobResult> {
        let start_time = Instant::now();
        let started_at = Utc::now();
        let output_path = self.config.output_path();

        info!(
            "Processing {} at resolution {} ({})",
            self.config.input_path.display(),
            self.config.resolution,
            resolution_description(self.config.resolution)
        );

        let mut reader =
            RecordReader::open(&self.config.input_path, &ReaderOptions::from(&self.config))?;

        let diagnostics = RecordingDiagnostics::new(
            TracingDiagnostics::new(self.config.verbose),
            self.issue_limit,
        );
        let mut processor = StreamingProcessor::new(
            GeographicBounds,
            H3IndexGenerator,
            diagnostics,
            self.config.resolution,
        )?
        .with_cancellation(self.cancellation_token.clone());

        let mut writer = RecordWriter::create(
            &output_path,
            reader.headers(),
            &WriterOptions::from(&self.config),
        )?;

        let progress = self.create_progress();

        let outcome = processor.process_stream(&mut reader, |record| {
            writer.write_record(record)?;
            if writer.rows_written() % PROGRESS_UPDATE_INTERVAL == 0 {
                progress.set_position(writer.rows_written());
            }
            Ok(())
        });

        progress.finish_and_clear();

        let tally = match outcome {
            Ok(tally) => tally,
            Err(e) => return Err(flush_after_failure(&mut writer, &output_path, e)),
        };

        let file = writer.finish()?;
        file.sync_all()?;
        debug!(
            "Flushed {} rows to {}",
            tally.total_records,
            output_path.display()
        );
        reader.close();

        let diagnostics = processor.into_diagnostics();
        self.issues = diagnostics.issues().to_vec();
        self.dropped_issues = diagnostics.dropped();

        let result = JobResult {
            total_records: tally.total_records,
            valid_records: tally.valid_records,
            invalid_records: tally.invalid_records(),
            malformed_rows: tally.malformed_rows,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            output_path,
            started_at,
        };

        info!(
            "Wrote {} records ({} valid, {} invalid, {} malformed skipped) to {}",
            result.total_records,
            result.valid_records,
            result.invalid_records,
            result.malformed_rows,
            result.output_path.display()
        );

        Ok(result)
    }

    fn create_progress(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")
        {
            pb.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        pb.set_message(format!("from {}", self.config.input_path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Keep the rows written so far, returning the error that stopped the job
/// even when the flush fails too
fn flush_after_failure<W: Write>(
    writer: &mut RecordWriter<W>,
    output_path: &Path,
    error: Error,
) -> Error {
    if let Err(flush_err) = writer.flush() {
        warn!(
            "Failed to flush {} after error: {}",
            output_path.display(),
            flush_err
        );
    }
    error
}

/// Validate `config` and run it to completion
pub fn process_file(config: JobConfig) -> Result<JobResult> {
    CsvH3Processor::new(config)?.process()
}
