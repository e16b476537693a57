#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating scored `GeoJSON` overlays from prepared local data.
//!
//! Consumes the joined IMD boundary file produced by the data prep script
//! (`west-london-imd.geojson`) and a saved hourly air quality bulletin, runs
//! the scoring core over every region, and emits pre-colored
//! `FeatureCollection`s plus matching legend tables for the static map page
//! to render. No network access: inputs are local files, refreshed by
//! whatever fetch layer the deployment uses.

pub mod overlay;
pub mod regions;
pub mod stations;

use propmap_models::OverlayLayer;
use thiserror::Error;

/// Errors that can occur while generating overlays.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Reading an input file or writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An input file was not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// A gradient stop table was malformed. The tables are compile-time
    /// constants, so this is a programming error and callers treat it as
    /// fatal.
    #[error("Gradient error: {0}")]
    Gradient(#[from] propmap_gradient::GradientError),

    /// The requested layer has no offline data source.
    #[error("layer `{layer}` is live-only and cannot be generated offline")]
    UnsupportedLayer {
        /// The rejected layer.
        layer: OverlayLayer,
    },

    /// Input data didn't have the expected shape.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
