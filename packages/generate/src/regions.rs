//! Loads [`Region`] records from the prepared IMD boundary file.
//!
//! The data prep script joins IMD 2019 deciles onto LSOA boundary polygons
//! and writes a `FeatureCollection` whose properties carry `lsoa_code`,
//! `lsoa_name`, `borough`, `imd_score`, and `imd_decile`. Centroids are
//! computed here at load time so the scoring core never touches raw
//! geometry.

use std::collections::BTreeMap;
use std::path::Path;

use geojson::GeoJson;
use propmap_models::Region;

use crate::GenerateError;

/// Reads and parses the IMD boundary file at `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the file cannot be read or is not a
/// `GeoJSON` `FeatureCollection`.
pub fn load_regions(path: &Path) -> Result<BTreeMap<String, Region>, GenerateError> {
    let raw = std::fs::read_to_string(path)?;
    parse_regions(&raw)
}

/// Parses the IMD boundary `FeatureCollection` into a region map keyed by
/// LSOA code.
///
/// Features without an LSOA code or geometry are skipped with a warning;
/// missing deciles and scores are kept as `None` so the scoring core can
/// apply its neutral defaults.
///
/// # Errors
///
/// Returns [`GenerateError`] if `raw` is not a `GeoJSON`
/// `FeatureCollection`.
pub fn parse_regions(raw: &str) -> Result<BTreeMap<String, Region>, GenerateError> {
    let GeoJson::FeatureCollection(collection) = raw.parse::<GeoJson>()? else {
        return Err(GenerateError::Conversion {
            message: "regions input is not a GeoJSON FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let mut regions = BTreeMap::new();

    for feature in collection.features {
        let Some(props) = &feature.properties else {
            continue;
        };

        let Some(id) = props
            .get("lsoa_code")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            log::warn!("Skipping feature without lsoa_code");
            continue;
        };
        let id = id.to_string();

        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping region {id}: no geometry");
            continue;
        };

        let name = props
            .get("lsoa_name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&id)
            .to_string();
        let borough = props
            .get("borough")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let imd_score = props.get("imd_score").and_then(serde_json::Value::as_f64);
        let decile = props
            .get("imd_decile")
            .and_then(serde_json::Value::as_u64)
            .and_then(|d| u8::try_from(d).ok());

        let centroid = propmap_spatial::centroid(&geometry);
        if centroid.is_none() {
            log::warn!("Region {id} has no usable vertices, centroid unset");
        }

        regions.insert(
            id.clone(),
            Region {
                id,
                name,
                borough,
                imd_score,
                decile,
                centroid,
                geometry,
            },
        );
    }

    log::info!("Loaded {} regions ({} features)", regions.len(), total);
    Ok(regions)
}
