//! Per-record diagnostics for the streaming processor.
//!
//! The processor reports every state transition to a [`Diagnostics`] value it
//! owns. Nothing here affects control flow or counts, and nothing is global,
//! so independent jobs can run side by side.

use tracing::{debug, trace, warn};

use crate::models::{InvalidReason, MalformedRow};
use crate::processor::streaming::ProcessingTally;

pub trait Diagnostics {
    /// A row was skipped because it could not reach both coordinate columns
    fn malformed_row(&mut self, row: &MalformedRow);

    /// A record was forwarded without an index
    fn invalid_record(&mut self, line_number: u64, reason: &InvalidReason);

    /// A record received an index
    fn record_indexed(&mut self, line_number: u64, h3_index: &str);

    fn stream_complete(&mut self, tally: &ProcessingTally);
}

/// Forwards transitions to `tracing`. Row-level warnings are only emitted when verbose.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics {
    verbose: bool,
}

impl TracingDiagnostics {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn malformed_row(&mut self, row: &MalformedRow) {
        if self.verbose {
            warn!(
                "Skipping malformed row at line {}: {}",
                row.line_number, row.reason
            );
        } else {
            debug!(
                "Skipping malformed row at line {}: {}",
                row.line_number, row.reason
            );
        }
    }

    fn invalid_record(&mut self, line_number: u64, reason: &InvalidReason) {
        if self.verbose {
            warn!("Invalid record at line {}: {}", line_number, reason);
        } else {
            debug!("Invalid record at line {}: {}", line_number, reason);
        }
    }

    fn record_indexed(&mut self, line_number: u64, h3_index: &str) {
        trace!("Line {} -> {}", line_number, h3_index);
    }

    fn stream_complete(&mut self, tally: &ProcessingTally) {
        debug!(
            "Stream complete: {} total records, {} valid, {} invalid, {} malformed",
            tally.total_records,
            tally.valid_records,
            tally.invalid_records(),
            tally.malformed_rows
        );
    }
}

/// One recorded issue
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    Malformed(MalformedRow),
    Invalid {
        line_number: u64,
        reason: InvalidReason,
    },
}

impl Issue {
    pub fn line_number(&self) -> u64 {
        match self {
            Issue::Malformed(row) => row.line_number,
            Issue::Invalid { line_number, .. } => *line_number,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::Malformed(row) => {
                write!(f, "line {}: malformed row ({})", row.line_number, row.reason)
            }
            Issue::Invalid {
                line_number,
                reason,
            } => write!(f, "line {}: {}", line_number, reason),
        }
    }
}

/// Keeps the first `limit` issues and counts the rest, then forwards
/// everything to an inner sink.
#[derive(Debug, Clone)]
pub struct RecordingDiagnostics<D = TracingDiagnostics> {
    inner: D,
    limit: usize,
    issues: Vec<Issue>,
    dropped: u64,
    indexed: u64,
}

impl<D: Diagnostics> RecordingDiagnostics<D> {
    pub fn new(inner: D, limit: usize) -> Self {
        Self {
            inner,
            limit,
            issues: Vec::new(),
            dropped: 0,
            indexed: 0,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues seen beyond the retention limit
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn indexed(&self) -> u64 {
        self.indexed
    }

    fn push(&mut self, issue: Issue) {
        if self.issues.len() < self.limit {
            self.issues.push(issue);
        } else {
            self.dropped += 1;
        }
    }
}

impl<D: Diagnostics> Diagnostics for RecordingDiagnostics<D> {
    fn malformed_row(&mut self, row: &MalformedRow) {
        self.inner.malformed_row(row);
        self.push(Issue::Malformed(row.clone()));
    }

    fn invalid_record(&mut self, line_number: u64, reason: &InvalidReason) {
        self.inner.invalid_record(line_number, reason);
        self.push(Issue::Invalid {
            line_number,
            reason: reason.clone(),
        });
    }

    fn record_indexed(&mut self, line_number: u64, h3_index: &str) {
        self.inner.record_indexed(line_number, h3_index);
        self.indexed += 1;
    }

    fn stream_complete(&mut self, tally: &ProcessingTally) {
        self.inner.stream_complete(tally);
    }
}
