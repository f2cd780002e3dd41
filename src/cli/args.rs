//! Command-line argument definitions for the CSV H3 processor
//!
//! Defines the CLI interface using the clap derive API.

use crate::config::{JobConfig, parse_delimiter};
use crate::constants::{
    DEFAULT_LAT_COLUMN, DEFAULT_LNG_COLUMN, DEFAULT_RESOLUTION, MAX_RESOLUTION, MIN_RESOLUTION,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the CSV H3 processor
///
/// Appends an H3 cell index to every row of a CSV file that carries
/// latitude/longitude columns.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csv-h3",
    version,
    about = "Append H3 geospatial indexes to CSV files with latitude/longitude columns",
    long_about = "Streams a delimited-text file row by row, resolves its latitude and longitude \
                  columns by name, alias or position, and writes a copy with an extra h3_index \
                  column. Rows with invalid coordinates are kept with an empty index; rows too \
                  short to hold both coordinates are skipped."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Add an H3 index column to a CSV file
    Process(ProcessArgs),
    /// List the H3 resolutions with their approximate cell sizes
    Resolutions(ResolutionsArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT", help = "Input CSV file")]
    pub input_path: PathBuf,

    /// Output file path
    ///
    /// Defaults to `<stem>_with_h3.<ext>` next to the input file.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output CSV file (default: <input>_with_h3.<ext>)"
    )]
    pub output_path: Option<PathBuf>,

    /// Latitude column
    ///
    /// A header name when the file has a header row, otherwise a zero-based
    /// column index. Unmatched names fall back to lat, latitude and y.
    #[arg(
        long = "lat-column",
        value_name = "COLUMN",
        default_value = DEFAULT_LAT_COLUMN,
        help = "Latitude column name, or index with --no-headers"
    )]
    pub lat_column: String,

    /// Longitude column
    ///
    /// A header name when the file has a header row, otherwise a zero-based
    /// column index. Unmatched names fall back to lng, lon, longitude and x.
    #[arg(
        long = "lng-column",
        value_name = "COLUMN",
        default_value = DEFAULT_LNG_COLUMN,
        help = "Longitude column name, or index with --no-headers"
    )]
    pub lng_column: String,

    /// H3 resolution (0 = coarsest, 15 = finest)
    #[arg(
        short = 'r',
        long = "resolution",
        value_name = "LEVEL",
        default_value_t = DEFAULT_RESOLUTION,
        help = "H3 resolution from 0 (coarsest) to 15 (finest)"
    )]
    pub resolution: u8,

    /// Treat the first row as data
    #[arg(long = "no-headers", help = "Input has no header row")]
    pub no_headers: bool,

    /// Field delimiter for input and output
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        default_value = ",",
        help = "Field delimiter, a single character or \\t for tab"
    )]
    pub delimiter: Delimiter,

    /// Replace the output file if it already exists
    #[arg(long = "overwrite", help = "Overwrite an existing output file")]
    pub overwrite: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the job report"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the resolutions command
#[derive(Debug, Clone, Default, Parser)]
pub struct ResolutionsArgs {
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the resolution table"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

/// Field delimiter parsed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(pub u8);

impl FromStr for Delimiter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_delimiter(s).map(Delimiter)
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(Error::InvalidResolution {
                resolution: self.resolution,
            });
        }

        if self.no_headers {
            for column in [&self.lat_column, &self.lng_column] {
                if column.trim().parse::<usize>().is_err() {
                    return Err(Error::configuration(format!(
                        "Column '{}' must be a zero-based index when --no-headers is set",
                        column
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    pub fn to_job_config(&self) -> JobConfig {
        JobConfig {
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            lat_column: self.lat_column.clone(),
            lng_column: self.lng_column.clone(),
            resolution: self.resolution,
            has_headers: !self.no_headers,
            delimiter: self.delimiter.0,
            overwrite: self.overwrite,
            verbose: self.verbose > 0,
        }
    }
}
