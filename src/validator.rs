//! Coordinate domain validation.

use thiserror::Error;

use crate::constants::{LATITUDE_RANGE, LONGITUDE_RANGE};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0:.6} is out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0:.6} is out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Checks a coordinate pair against a valid domain
pub trait CoordinateValidator {
    fn validate(&self, latitude: f64, longitude: f64) -> Result<(), CoordinateError>;
}

/// WGS84 bounds, inclusive at both ends. Non-finite values never pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicBounds;

impl CoordinateValidator for GeographicBounds {
    fn validate(&self, latitude: f64, longitude: f64) -> Result<(), CoordinateError> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = GeographicBounds;
        assert!(bounds.validate(90.0, 180.0).is_ok());
        assert!(bounds.validate(-90.0, -180.0).is_ok());
        assert!(bounds.validate(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let bounds = GeographicBounds;
        assert_eq!(
            bounds.validate(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            bounds.validate(0.0, -180.5),
            Err(CoordinateError::LongitudeOutOfRange(-180.5))
        );
        // latitude is reported first when both are bad
        assert!(matches!(
            bounds.validate(-100.0, 200.0),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let bounds = GeographicBounds;
        assert!(bounds.validate(f64::NAN, 0.0).is_err());
        assert!(bounds.validate(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = CoordinateError::LatitudeOutOfRange(91.0);
        assert_eq!(err.to_string(), "latitude 91.000000 is out of range [-90, 90]");
    }
}
