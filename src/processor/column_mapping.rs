//! Coordinate column resolution
//!
//! Maps the user's latitude/longitude specifiers onto concrete field
//! positions. With a header row the specifier is a column name, falling back
//! to well-known aliases; without one it must be a zero-based index.

use csv::ByteRecord;

use crate::constants::{LATITUDE_ALIASES, LONGITUDE_ALIASES};
use crate::models::CoordinateField;
use crate::{Error, Result};

/// Resolved positions of the two coordinate fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub latitude_index: usize,
    pub longitude_index: usize,
}

impl ColumnMapping {
    /// Resolve both coordinate columns, failing the whole job if either is missing
    pub fn resolve(
        headers: Option<&ByteRecord>,
        latitude_spec: &str,
        longitude_spec: &str,
    ) -> Result<Self> {
        let latitude_index = resolve_field(headers, CoordinateField::Latitude, latitude_spec)?;
        let longitude_index = resolve_field(headers, CoordinateField::Longitude, longitude_spec)?;

        if latitude_index == longitude_index {
            return Err(Error::SameColumn {
                index: latitude_index,
            });
        }

        Ok(Self {
            latitude_index,
            longitude_index,
        })
    }

    /// Minimum number of fields a row needs to cover both columns
    pub fn required_width(&self) -> usize {
        self.latitude_index.max(self.longitude_index) + 1
    }

    pub fn index_of(&self, field: CoordinateField) -> usize {
        match field {
            CoordinateField::Latitude => self.latitude_index,
            CoordinateField::Longitude => self.longitude_index,
        }
    }
}

fn resolve_field(
    headers: Option<&ByteRecord>,
    field: CoordinateField,
    specifier: &str,
) -> Result<usize> {
    let found = match headers {
        Some(headers) => find_by_name(headers, specifier, aliases(field)),
        None => specifier.trim().parse::<usize>().ok(),
    };

    found.ok_or_else(|| Error::ColumnNotFound {
        field,
        specifier: specifier.to_string(),
    })
}

fn aliases(field: CoordinateField) -> &'static [&'static str] {
    match field {
        CoordinateField::Latitude => LATITUDE_ALIASES,
        CoordinateField::Longitude => LONGITUDE_ALIASES,
    }
}

/// Exact (case-insensitive) name first, then each alias in order. Leftmost column wins.
///
/// Header names are compared as bytes, so a header in a non-UTF-8 encoding
/// still resolves as long as the coordinate column names themselves match.
fn find_by_name(headers: &ByteRecord, specifier: &str, aliases: &[&str]) -> Option<usize> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_ascii().eq_ignore_ascii_case(name.as_bytes()))
    };

    let specifier = specifier.trim();
    if !specifier.is_empty() {
        if let Some(index) = position(specifier) {
            return Some(index);
        }
    }

    aliases.iter().find_map(|alias| position(alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> ByteRecord {
        ByteRecord::from(names.to_vec())
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        let h = headers(&["name", "Latitude", " LONGITUDE "]);
        let mapping = ColumnMapping::resolve(Some(&h), "latitude", "longitude").unwrap();
        assert_eq!(mapping.latitude_index, 1);
        assert_eq!(mapping.longitude_index, 2);
        assert_eq!(mapping.required_width(), 3);
    }

    #[test]
    fn test_alias_fallback_when_unmatched() {
        let h = headers(&["lon", "id", "lat"]);
        let mapping = ColumnMapping::resolve(Some(&h), "latitude", "longitude").unwrap();
        assert_eq!(mapping.latitude_index, 2);
        assert_eq!(mapping.longitude_index, 0);
    }

    #[test]
    fn test_alias_fallback_when_empty() {
        let h = headers(&["Y", "X"]);
        let mapping = ColumnMapping::resolve(Some(&h), "", "").unwrap();
        assert_eq!(mapping.latitude_index, 0);
        assert_eq!(mapping.longitude_index, 1);
    }

    #[test]
    fn test_alias_order_beats_column_order() {
        // "lat" is tried before "y", even though "y" comes first in the header
        let h = headers(&["y", "lat", "lng"]);
        let mapping = ColumnMapping::resolve(Some(&h), "missing", "missing").unwrap();
        assert_eq!(mapping.latitude_index, 1);
        assert_eq!(mapping.longitude_index, 2);
    }

    #[test]
    fn test_leftmost_duplicate_wins() {
        let h = headers(&["lat", "lng", "LAT"]);
        let mapping = ColumnMapping::resolve(Some(&h), "lat", "lng").unwrap();
        assert_eq!(mapping.latitude_index, 0);
    }

    #[test]
    fn test_unmatched_names_fail() {
        let h = headers(&["name", "north", "east"]);
        let err = ColumnMapping::resolve(Some(&h), "lat_x", "lng_x").unwrap_err();
        match err {
            Error::ColumnNotFound { field, specifier } => {
                assert_eq!(field, CoordinateField::Latitude);
                assert_eq!(specifier, "lat_x");
            }
            other => panic!("Expected ColumnNotFound, got {:?}", other),
        }

        let h = headers(&["lat", "east"]);
        let err = ColumnMapping::resolve(Some(&h), "lat", "lng_x").unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnNotFound {
                field: CoordinateField::Longitude,
                ..
            }
        ));
    }

    #[test]
    fn test_positional_without_header() {
        let mapping = ColumnMapping::resolve(None, "3", " 0 ").unwrap();
        assert_eq!(mapping.latitude_index, 3);
        assert_eq!(mapping.longitude_index, 0);
        assert_eq!(mapping.required_width(), 4);
        assert_eq!(mapping.index_of(CoordinateField::Longitude), 0);
    }

    #[test]
    fn test_positional_rejects_non_numeric() {
        for bad in ["latitude", "-1", "", "1.5"] {
            let err = ColumnMapping::resolve(None, bad, "1").unwrap_err();
            assert!(
                matches!(err, Error::ColumnNotFound { .. }),
                "specifier {:?} should not resolve",
                bad
            );
        }
    }

    #[test]
    fn test_latin1_header_resolves() {
        let h = ByteRecord::from(vec![&b"caf\xe9"[..], &b"lat"[..], &b"lng"[..]]);
        let mapping = ColumnMapping::resolve(Some(&h), "lat", "lng").unwrap();
        assert_eq!(mapping.latitude_index, 1);
        assert_eq!(mapping.longitude_index, 2);
    }

    #[test]
    fn test_same_column_rejected() {
        let err = ColumnMapping::resolve(None, "2", "2").unwrap_err();
        assert!(matches!(err, Error::SameColumn { index: 2 }));

        let h = headers(&["coord", "other"]);
        let err = ColumnMapping::resolve(Some(&h), "coord", "COORD").unwrap_err();
        assert!(matches!(err, Error::SameColumn { index: 0 }));
    }
}
