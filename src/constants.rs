//! Application constants for the CSV H3 processor
//!
//! Column aliases, defaults, coordinate bounds and the H3 resolution
//! catalogue used by the CLI.

use serde::Serialize;
use std::ops::RangeInclusive;

// =============================================================================
// Column Resolution
// =============================================================================

/// Header names accepted for the latitude column when the specifier does not match
pub const LATITUDE_ALIASES: &[&str] = &["lat", "latitude", "y"];

/// Header names accepted for the longitude column when the specifier does not match
pub const LONGITUDE_ALIASES: &[&str] = &["lng", "lon", "longitude", "x"];

pub const DEFAULT_LAT_COLUMN: &str = "latitude";
pub const DEFAULT_LNG_COLUMN: &str = "longitude";

// =============================================================================
// Output
// =============================================================================

/// Label of the column appended to the output header
pub const H3_INDEX_COLUMN: &str = "h3_index";

/// Suffix added to the input file stem when no output path is given
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_with_h3";

pub const DEFAULT_DELIMITER: u8 = b',';

/// Number of issues kept for the end-of-job report
pub const MAX_REPORTED_ISSUES: usize = 100;

/// Rows between progress bar refreshes
pub const PROGRESS_UPDATE_INTERVAL: u64 = 1_000;

// =============================================================================
// Coordinates and Resolutions
// =============================================================================

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

pub const MIN_RESOLUTION: u8 = 0;
pub const MAX_RESOLUTION: u8 = 15;

/// Street level, ~461 m edges
pub const DEFAULT_RESOLUTION: u8 = 8;

/// One entry of the H3 resolution catalogue
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolutionLevel {
    pub level: u8,
    pub scale: &'static str,
    pub edge_length: &'static str,
    pub use_case: &'static str,
    pub examples: &'static str,
}

pub const RESOLUTION_LEVELS: &[ResolutionLevel] = &[
    ResolutionLevel {
        level: 0,
        scale: "Country",
        edge_length: "~1107.71 km",
        use_case: "Continental/country-wide analysis",
        examples: "Global logistics, climate zones",
    },
    ResolutionLevel {
        level: 1,
        scale: "State",
        edge_length: "~418.68 km",
        use_case: "State/province-wide analysis",
        examples: "Regional planning, weather patterns",
    },
    ResolutionLevel {
        level: 2,
        scale: "Metro",
        edge_length: "~158.24 km",
        use_case: "Metropolitan area analysis",
        examples: "Urban planning, service areas",
    },
    ResolutionLevel {
        level: 3,
        scale: "City",
        edge_length: "~59.81 km",
        use_case: "City-wide analysis",
        examples: "Municipal services, demographics",
    },
    ResolutionLevel {
        level: 4,
        scale: "District",
        edge_length: "~22.61 km",
        use_case: "District/county analysis",
        examples: "School districts, postal zones",
    },
    ResolutionLevel {
        level: 5,
        scale: "Neighborhood",
        edge_length: "~8.54 km",
        use_case: "Neighborhood analysis",
        examples: "Community planning, local services",
    },
    ResolutionLevel {
        level: 6,
        scale: "Block",
        edge_length: "~3.23 km",
        use_case: "City block analysis",
        examples: "Traffic analysis, retail catchment",
    },
    ResolutionLevel {
        level: 7,
        scale: "Building",
        edge_length: "~1.22 km",
        use_case: "Building cluster analysis",
        examples: "Campus planning, facility management",
    },
    ResolutionLevel {
        level: 8,
        scale: "Street",
        edge_length: "~461.35 m",
        use_case: "Street-level analysis",
        examples: "Address geocoding, delivery routes",
    },
    ResolutionLevel {
        level: 9,
        scale: "Intersection",
        edge_length: "~174.38 m",
        use_case: "Street intersection analysis",
        examples: "Traffic lights, crosswalk planning",
    },
    ResolutionLevel {
        level: 10,
        scale: "Property",
        edge_length: "~65.91 m",
        use_case: "Property/lot analysis",
        examples: "Real estate, land parcels",
    },
    ResolutionLevel {
        level: 11,
        scale: "Room",
        edge_length: "~24.91 m",
        use_case: "Room-level analysis",
        examples: "Indoor positioning, floor plans",
    },
    ResolutionLevel {
        level: 12,
        scale: "Desk",
        edge_length: "~9.42 m",
        use_case: "Desk/workspace analysis",
        examples: "Office layouts, seating charts",
    },
    ResolutionLevel {
        level: 13,
        scale: "Chair",
        edge_length: "~3.56 m",
        use_case: "Chair/seat analysis",
        examples: "Precise indoor positioning",
    },
    ResolutionLevel {
        level: 14,
        scale: "Book",
        edge_length: "~1.35 m",
        use_case: "Book/object analysis",
        examples: "Inventory tracking, asset management",
    },
    ResolutionLevel {
        level: 15,
        scale: "Page",
        edge_length: "~0.51 m",
        use_case: "Page/fine-detail analysis",
        examples: "High-precision measurements",
    },
];

/// Human-readable description of a resolution, e.g. "Street level (~461.35 m)"
pub fn resolution_description(resolution: u8) -> String {
    RESOLUTION_LEVELS
        .iter()
        .find(|level| level.level == resolution)
        .map(|level| format!("{} level ({})", level.scale, level.edge_length))
        .unwrap_or_else(|| format!("Resolution {}", resolution))
}
