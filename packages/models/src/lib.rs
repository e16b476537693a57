#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared value records for the propmap overlay toolchain.
//!
//! These types flow between the loaders, the scoring core, and the overlay
//! generator. All of them are plain records, constructed once and never
//! mutated afterwards.

mod layers;

pub use layers::OverlayLayer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Point {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An LSOA-scale spatial unit carrying a deprivation ranking and boundary
/// geometry.
///
/// Deciles run 1 (most deprived) to 10 (least deprived). A missing decile is
/// valid input: the scoring core treats it as a defined neutral value, never
/// as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Statistical area code (e.g. LSOA 2011 code "E01001234").
    pub id: String,
    /// Human-readable area name (e.g. "Hounslow 024A").
    pub name: String,
    /// Parent borough name.
    pub borough: String,
    /// Index of Multiple Deprivation score, if present in the dataset.
    pub imd_score: Option<f64>,
    /// IMD decile (1 = most deprived 10%), if present in the dataset.
    pub decile: Option<u8>,
    /// Vertex-mean centroid of the boundary, if the geometry had vertices.
    pub centroid: Option<Point>,
    /// Boundary geometry (`Polygon` or `MultiPolygon`).
    pub geometry: geojson::Geometry,
}

/// A fixed-location air quality monitoring site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Site code (e.g. "HF4").
    pub id: String,
    /// Site name (e.g. "Hammersmith Town Centre").
    pub name: String,
    /// Monitoring site location.
    pub location: Point,
    /// Worst (highest) pollutant sub-index observed at this site.
    /// `None` means the site reported no usable index.
    pub max_index: Option<f64>,
    /// Bulletin timestamp of the feed snapshot this reading came from.
    pub updated_at: Option<DateTime<Utc>>,
}

/// The per-region scoring result, with intermediate components carried
/// through for display.
///
/// Derived data: recomputed on demand, never persisted. All components and
/// the combined score lie in `[0, 1]`, where 0 is best and 1 is worst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Region this breakdown was computed for.
    pub region_id: String,
    /// Weighted aggregate of the three components.
    pub combined_score: f64,
    /// Deprivation contribution before weighting.
    pub deprivation_component: f64,
    /// Air quality contribution before weighting.
    pub air_quality_component: f64,
    /// Noise contribution before weighting.
    pub noise_component: f64,
    /// The monitoring site whose reading fed the air quality component,
    /// `None` when no station could be matched.
    pub matched_station: Option<Station>,
}
