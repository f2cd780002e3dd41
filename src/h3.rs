//! H3 index generation.
//!
//! [`IndexGenerator`] is the seam the streaming processor depends on;
//! [`H3IndexGenerator`] implements it with `h3o`.

use h3o::{LatLng, Resolution};
use thiserror::Error;

use crate::constants::MAX_RESOLUTION;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("H3 resolution {0} is out of valid range [0, 15]")]
    InvalidResolution(u8),

    #[error("coordinates ({latitude}, {longitude}) cannot be indexed: {reason}")]
    InvalidCoordinates {
        latitude: f64,
        longitude: f64,
        reason: String,
    },
}

/// Computes the spatial index token for a coordinate pair
pub trait IndexGenerator {
    /// Reject resolutions the generator cannot produce. Called once at job setup.
    fn validate_resolution(&self, resolution: u8) -> Result<(), GenerationError>;

    fn generate(
        &self,
        latitude: f64,
        longitude: f64,
        resolution: u8,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct H3IndexGenerator;

impl H3IndexGenerator {
    fn resolution(resolution: u8) -> Result<Resolution, GenerationError> {
        if resolution > MAX_RESOLUTION {
            return Err(GenerationError::InvalidResolution(resolution));
        }
        Resolution::try_from(resolution).map_err(|_| GenerationError::InvalidResolution(resolution))
    }
}

impl IndexGenerator for H3IndexGenerator {
    fn validate_resolution(&self, resolution: u8) -> Result<(), GenerationError> {
        Self::resolution(resolution).map(|_| ())
    }

    fn generate(
        &self,
        latitude: f64,
        longitude: f64,
        resolution: u8,
    ) -> Result<String, GenerationError> {
        let resolution = Self::resolution(resolution)?;
        let coord = LatLng::new(latitude, longitude).map_err(|e| {
            GenerationError::InvalidCoordinates {
                latitude,
                longitude,
                reason: e.to_string(),
            }
        })?;

        Ok(coord.to_cell(resolution).to_string())
    }
}
