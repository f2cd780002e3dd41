//! Job configuration and setup-time validation.
//!
//! A [`JobConfig`] carries everything one processing job needs. Checks that do
//! not need the file contents live in [`JobConfig::validate`]; column
//! resolution happens later, once the header row has been read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_LAT_COLUMN, DEFAULT_LNG_COLUMN, DEFAULT_OUTPUT_SUFFIX,
    DEFAULT_RESOLUTION, MAX_RESOLUTION, MIN_RESOLUTION,
};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub input_path: PathBuf,

    /// Explicit output path; derived from the input when absent
    pub output_path: Option<PathBuf>,

    /// Column name (header mode) or zero-based index (headerless mode)
    pub lat_column: String,
    pub lng_column: String,

    pub resolution: u8,
    pub has_headers: bool,
    pub delimiter: u8,
    pub overwrite: bool,

    /// Emit per-row warnings for skipped and invalid rows
    pub verbose: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: None,
            lat_column: DEFAULT_LAT_COLUMN.to_string(),
            lng_column: DEFAULT_LNG_COLUMN.to_string(),
            resolution: DEFAULT_RESOLUTION,
            has_headers: true,
            delimiter: DEFAULT_DELIMITER,
            overwrite: false,
            verbose: false,
        }
    }
}

impl JobConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    pub fn with_columns(
        mut self,
        lat_column: impl Into<String>,
        lng_column: impl Into<String>,
    ) -> Self {
        self.lat_column = lat_column.into();
        self.lng_column = lng_column.into();
        self
    }

    pub fn with_resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Output path, explicit or derived as `<stem>_with_h3.<ext>` next to the input
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input_path))
    }

    /// Run every setup check that does not need the file contents
    pub fn validate(&self) -> Result<()> {
        self.validate_input()?;

        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(Error::InvalidResolution {
                resolution: self.resolution,
            });
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(Error::configuration(format!(
                "Unsupported delimiter byte 0x{:02x}",
                self.delimiter
            )));
        }

        self.validate_output()?;

        debug!("Configuration validated: {}", self);
        Ok(())
    }

    fn validate_input(&self) -> Result<()> {
        let path = &self.input_path;
        if path.as_os_str().is_empty() {
            return Err(Error::configuration("Input path is required"));
        }

        if !path.exists() {
            return Err(Error::InputNotFound { path: path.clone() });
        }

        if !path.is_file() {
            return Err(Error::InputNotReadable {
                path: path.clone(),
                reason: "not a regular file".to_string(),
            });
        }

        File::open(path).map_err(|e| Error::InputNotReadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn validate_output(&self) -> Result<()> {
        let output = self.output_path();

        if is_same_file(&output, &self.input_path) {
            return Err(Error::configuration(format!(
                "Output path must differ from input path: {}",
                output.display()
            )));
        }

        if output.exists() && !self.overwrite {
            return Err(Error::OutputExists { path: output });
        }

        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !directory.exists() {
            return Err(Error::OutputDirectory {
                path: directory,
                reason: "directory does not exist".to_string(),
            });
        }

        if !directory.is_dir() {
            return Err(Error::OutputDirectory {
                path: directory,
                reason: "not a directory".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={}, output={}, lat='{}', lng='{}', resolution={}, headers={}, delimiter={:?}",
            self.input_path.display(),
            self.output_path().display(),
            self.lat_column,
            self.lng_column,
            self.resolution,
            self.has_headers,
            self.delimiter as char
        )
    }
}

/// Lexical match, or both paths resolving to the same file through `..`
/// components or symlinks
fn is_same_file(output: &Path, input: &Path) -> bool {
    if output == input {
        return true;
    }

    match (std::fs::canonicalize(output), std::fs::canonicalize(input)) {
        (Ok(output), Ok(input)) => output == input,
        _ => false,
    }
}

/// `data/points.csv` becomes `data/points_with_h3.csv`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, DEFAULT_OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, DEFAULT_OUTPUT_SUFFIX),
    };

    input.with_file_name(file_name)
}

/// Parse a delimiter argument: one ASCII character, or `\t` / `tab`
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" | "TAB" | "\t" => return Ok(b'\t'),
        _ => {}
    }

    let bytes = value.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        return Err(Error::configuration(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            value
        )));
    }

    match bytes[0] {
        b'"' | b'\n' | b'\r' => Err(Error::configuration(format!(
            "Delimiter cannot be {:?}",
            value
        ))),
        byte => Ok(byte),
    }
}
