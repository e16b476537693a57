#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Combined environmental score aggregation.
//!
//! [`compute_score`] folds a region's deprivation decile, the air quality
//! index of its nearest monitoring station, and a fixed noise term into a
//! single `[0, 1]` score (0 = best, 1 = worst). Missing data never errors:
//! an absent decile, centroid, station map, or station reading degrades to
//! the neutral midpoint instead, so incomplete upstream feeds still produce
//! a renderable choropleth.
//!
//! Pure and stateless. Callers pass the current region and station snapshots
//! in on every refresh cycle; nothing is cached here.

use std::collections::BTreeMap;

use propmap_models::{Region, ScoreBreakdown, Station};

/// Weight of the deprivation component in the combined score.
pub const DEPRIVATION_WEIGHT: f64 = 0.4;

/// Weight of the air quality component in the combined score.
pub const AIR_QUALITY_WEIGHT: f64 = 0.4;

/// Weight of the noise component in the combined score.
pub const NOISE_WEIGHT: f64 = 0.2;

/// Component value used when a signal has no data for a region.
pub const NEUTRAL_COMPONENT: f64 = 0.5;

/// Fixed noise component. There is no per-region noise data source; the
/// noise overlay is tile-only. Named separately from [`NEUTRAL_COMPONENT`]
/// so a real per-region noise metric can slot in without restructuring the
/// weighted sum.
pub const NOISE_COMPONENT: f64 = 0.5;

/// The air quality index scale tops out at 10 (UK Daily Air Quality Index).
const MAX_AIR_QUALITY_INDEX: f64 = 10.0;

/// Computes the combined environmental score for one region.
///
/// * Deprivation: `(11 - decile) / 10`, so decile 1 (most deprived) scores
///   1.0 and decile 10 scores 0.1; an absent decile scores neutral.
/// * Air quality: `min(max_index / 10, 1)` from the station nearest the
///   region centroid; neutral when there are no stations, the region has no
///   centroid, or the matched station has no reading.
/// * Noise: the fixed [`NOISE_COMPONENT`].
///
/// Each component is clamped to `[0, 1]` before weighting; the inputs are
/// already in range by construction but the aggregator does not trust
/// callers. Infallible: every input shape produces a breakdown.
#[must_use]
pub fn compute_score(region: &Region, stations: &BTreeMap<String, Station>) -> ScoreBreakdown {
    let deprivation_component = region.decile.map_or(NEUTRAL_COMPONENT, |decile| {
        (11.0 - f64::from(decile)) / 10.0
    });

    let matched_station = region
        .centroid
        .and_then(|centroid| propmap_spatial::nearest(centroid, stations))
        .cloned();

    let air_quality_component = matched_station
        .as_ref()
        .and_then(|station| station.max_index)
        .map_or(NEUTRAL_COMPONENT, |max_index| {
            (max_index / MAX_AIR_QUALITY_INDEX).min(1.0)
        });

    let deprivation_component = deprivation_component.clamp(0.0, 1.0);
    let air_quality_component = air_quality_component.clamp(0.0, 1.0);
    let noise_component = NOISE_COMPONENT.clamp(0.0, 1.0);

    let combined_score = DEPRIVATION_WEIGHT * deprivation_component
        + AIR_QUALITY_WEIGHT * air_quality_component
        + NOISE_WEIGHT * noise_component;

    ScoreBreakdown {
        region_id: region.id.clone(),
        combined_score,
        deprivation_component,
        air_quality_component,
        noise_component,
        matched_station,
    }
}
