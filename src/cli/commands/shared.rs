//! Shared components for CLI commands
//!
//! Logging setup and the report type handed from the process command to its
//! output formatters.

use crate::config::JobConfig;
use crate::diagnostics::Issue;
use crate::models::JobResult;
use serde::Serialize;
use tracing::debug;

/// Everything the final report needs about one finished job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub config: JobConfig,
    pub result: JobResult,

    /// First recorded issues, listed by the human report when verbose
    #[serde(skip)]
    pub issues: Vec<Issue>,

    #[serde(skip)]
    pub dropped_issues: u64,
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the level derived from the flags. A
/// subscriber installed earlier in the process is left in place.
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csv_h3_processor={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match result {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing subscriber: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn test_report_json_shape() {
        let report = JobReport {
            config: JobConfig::new("points.csv"),
            result: JobResult {
                total_records: 3,
                valid_records: 2,
                invalid_records: 1,
                malformed_rows: 0,
                processing_time_ms: 12,
                output_path: PathBuf::from("points_with_h3.csv"),
                started_at: Utc::now(),
            },
            issues: Vec::new(),
            dropped_issues: 0,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["config"]["resolution"], 8);
        assert_eq!(value["result"]["valid_records"], 2);
        assert!(value.get("issues").is_none());
    }
}
