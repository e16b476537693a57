//! Builds pre-colored overlay `FeatureCollection`s and legend tables.
//!
//! Fill colors are baked into feature properties so the frontend renders
//! straight from the artifact. Legends are derived from the same preset
//! gradient tables, so swatches and fills cannot drift apart.

use std::collections::BTreeMap;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeomValue};
use propmap_gradient::{DECILE_STOPS, NO_DATA_COLOR, SCORE_STOPS, interpolate};
use propmap_models::{OverlayLayer, Region, Station};
use serde::{Deserialize, Serialize};

use crate::GenerateError;

/// One swatch/label pair in a rendered legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Label shown next to the swatch.
    pub label: String,
    /// Swatch color as a CSS hex string.
    pub color: String,
}

/// Builds the `FeatureCollection` for an offline-capable layer.
///
/// # Errors
///
/// Returns [`GenerateError::UnsupportedLayer`] for live-only layers (noise,
/// flood risk) and [`GenerateError::Gradient`] if a preset stop table is
/// malformed (a programming error).
pub fn build_overlay(
    layer: OverlayLayer,
    regions: &BTreeMap<String, Region>,
    stations: &BTreeMap<String, Station>,
) -> Result<FeatureCollection, GenerateError> {
    match layer {
        OverlayLayer::Combined => combined_overlay(regions, stations),
        OverlayLayer::Deprivation => deprivation_overlay(regions),
        OverlayLayer::AirQuality => air_quality_overlay(stations),
        OverlayLayer::Noise | OverlayLayer::FloodRisk => {
            Err(GenerateError::UnsupportedLayer { layer })
        }
    }
}

/// Combined-score choropleth: one feature per region with the score
/// breakdown and fill color baked into properties.
fn combined_overlay(
    regions: &BTreeMap<String, Region>,
    stations: &BTreeMap<String, Station>,
) -> Result<FeatureCollection, GenerateError> {
    let mut features = Vec::with_capacity(regions.len());

    for region in regions.values() {
        let breakdown = propmap_score::compute_score(region, stations);
        let color = interpolate(SCORE_STOPS, breakdown.combined_score)?;

        let properties = json_props(serde_json::json!({
            "lsoaCode": region.id,
            "lsoaName": region.name,
            "borough": region.borough,
            "imdDecile": region.decile,
            "combinedScore": round3(breakdown.combined_score),
            "deprivationComponent": round3(breakdown.deprivation_component),
            "airQualityComponent": round3(breakdown.air_quality_component),
            "noiseComponent": round3(breakdown.noise_component),
            "matchedStationId": breakdown.matched_station.as_ref().map(|s| &s.id),
            "matchedStationName": breakdown.matched_station.as_ref().map(|s| &s.name),
            "fillColor": color.to_hex(),
        }));

        features.push(region_feature(region, properties));
    }

    log::info!("Built combined overlay: {} features", features.len());
    Ok(collection(features))
}

/// Deprivation choropleth colored by IMD decile; regions with no decile get
/// the no-data grey.
fn deprivation_overlay(
    regions: &BTreeMap<String, Region>,
) -> Result<FeatureCollection, GenerateError> {
    let mut features = Vec::with_capacity(regions.len());

    for region in regions.values() {
        let color = match region.decile {
            Some(decile) => interpolate(DECILE_STOPS, decile_position(decile))?,
            None => NO_DATA_COLOR,
        };

        let properties = json_props(serde_json::json!({
            "lsoaCode": region.id,
            "lsoaName": region.name,
            "borough": region.borough,
            "imdScore": region.imd_score,
            "imdDecile": region.decile,
            "fillColor": color.to_hex(),
        }));

        features.push(region_feature(region, properties));
    }

    log::info!("Built deprivation overlay: {} features", features.len());
    Ok(collection(features))
}

/// Air quality layer: one point feature per monitoring site, colored by its
/// worst pollutant sub-index on the score gradient.
fn air_quality_overlay(
    stations: &BTreeMap<String, Station>,
) -> Result<FeatureCollection, GenerateError> {
    let mut features = Vec::with_capacity(stations.len());

    for station in stations.values() {
        let color = match station.max_index {
            Some(index) => interpolate(SCORE_STOPS, (index / 10.0).min(1.0))?,
            None => NO_DATA_COLOR,
        };

        let properties = json_props(serde_json::json!({
            "siteCode": station.id,
            "siteName": station.name,
            "maxIndex": station.max_index,
            "updatedAt": station.updated_at.map(|t| t.to_rfc3339()),
            "fillColor": color.to_hex(),
        }));

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeomValue::Point(vec![
                station.location.lng,
                station.location.lat,
            ]))),
            id: Some(Id::String(station.id.clone())),
            properties: Some(properties),
            foreign_members: None,
        });
    }

    log::info!("Built air quality overlay: {} features", features.len());
    Ok(collection(features))
}

/// Legend swatch/label pairs for an offline-capable layer.
///
/// # Errors
///
/// Returns [`GenerateError::UnsupportedLayer`] for live-only layers and
/// [`GenerateError::Gradient`] if a preset stop table is malformed.
pub fn legend_entries(layer: OverlayLayer) -> Result<Vec<LegendEntry>, GenerateError> {
    match layer {
        OverlayLayer::Combined => {
            let mut entries = Vec::new();
            for step in 0..=4 {
                let t = f64::from(step) / 4.0;
                let label = match step {
                    0 => "0.00 (best)".to_string(),
                    4 => "1.00 (worst)".to_string(),
                    _ => format!("{t:.2}"),
                };
                entries.push(LegendEntry {
                    label,
                    color: interpolate(SCORE_STOPS, t)?.to_hex(),
                });
            }
            Ok(entries)
        }
        OverlayLayer::Deprivation => {
            let mut entries = Vec::new();
            for decile in 1..=10u8 {
                let label = match decile {
                    1 => "Decile 1 (most deprived)".to_string(),
                    10 => "Decile 10 (least deprived)".to_string(),
                    _ => format!("Decile {decile}"),
                };
                entries.push(LegendEntry {
                    label,
                    color: interpolate(DECILE_STOPS, decile_position(decile))?.to_hex(),
                });
            }
            entries.push(no_data_entry());
            Ok(entries)
        }
        OverlayLayer::AirQuality => {
            let mut entries = Vec::new();
            for index in 1..=10u8 {
                entries.push(LegendEntry {
                    label: format!("Index {index}"),
                    color: interpolate(SCORE_STOPS, f64::from(index) / 10.0)?.to_hex(),
                });
            }
            entries.push(no_data_entry());
            Ok(entries)
        }
        OverlayLayer::Noise | OverlayLayer::FloodRisk => {
            Err(GenerateError::UnsupportedLayer { layer })
        }
    }
}

/// Maps decile 1..=10 onto the gradient's `[0, 1]` axis.
fn decile_position(decile: u8) -> f64 {
    (f64::from(decile) - 1.0) / 9.0
}

fn no_data_entry() -> LegendEntry {
    LegendEntry {
        label: "No data".to_string(),
        color: NO_DATA_COLOR.to_hex(),
    }
}

fn region_feature(region: &Region, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(region.geometry.clone()),
        id: Some(Id::String(region.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Rounds to 3 decimals for stable, diff-friendly artifacts.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn json_props(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propmap_models::Point;

    fn region(id: &str, decile: Option<u8>) -> Region {
        Region {
            id: id.to_string(),
            name: format!("{id} name"),
            borough: "Hounslow".to_string(),
            imd_score: Some(20.0),
            decile,
            centroid: Some(Point::new(51.47, -0.35)),
            geometry: Geometry::new(GeomValue::Polygon(vec![vec![
                vec![-0.36, 51.46],
                vec![-0.36, 51.48],
                vec![-0.34, 51.48],
            ]])),
        }
    }

    fn station(id: &str, max_index: Option<f64>) -> Station {
        Station {
            id: id.to_string(),
            name: format!("{id} site"),
            location: Point::new(51.47, -0.35),
            max_index,
            updated_at: None,
        }
    }

    fn one<K: Ord, V>(key: K, value: V) -> BTreeMap<K, V> {
        let mut map = BTreeMap::new();
        map.insert(key, value);
        map
    }

    #[test]
    fn combined_overlay_bakes_score_and_color() {
        let regions = one("E01".to_string(), region("E01", Some(1)));
        let stations = one("HF4".to_string(), station("HF4", Some(10.0)));

        let fc = build_overlay(OverlayLayer::Combined, &regions, &stations).unwrap();
        assert_eq!(fc.features.len(), 1);

        let props = fc.features[0].properties.as_ref().unwrap();
        assert!((props["combinedScore"].as_f64().unwrap() - 0.90).abs() < 1e-9);
        assert_eq!(props["matchedStationId"], "HF4");
        let hex = props["fillColor"].as_str().unwrap();
        assert!(hex.starts_with('#') && hex.len() == 7);
    }

    #[test]
    fn combined_overlay_without_stations_is_neutral() {
        let regions = one("E01".to_string(), region("E01", None));

        let fc = build_overlay(OverlayLayer::Combined, &regions, &BTreeMap::new()).unwrap();
        let props = fc.features[0].properties.as_ref().unwrap();
        assert!((props["combinedScore"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert!(props["matchedStationId"].is_null());
    }

    #[test]
    fn deprivation_overlay_uses_no_data_grey() {
        let mut regions = BTreeMap::new();
        regions.insert("E01".to_string(), region("E01", Some(1)));
        regions.insert("E02".to_string(), region("E02", None));

        let fc = build_overlay(OverlayLayer::Deprivation, &regions, &BTreeMap::new()).unwrap();
        let by_id: BTreeMap<_, _> = fc
            .features
            .iter()
            .map(|f| {
                let props = f.properties.as_ref().unwrap();
                (
                    props["lsoaCode"].as_str().unwrap().to_string(),
                    props["fillColor"].as_str().unwrap().to_string(),
                )
            })
            .collect();

        assert_eq!(by_id["E02"], NO_DATA_COLOR.to_hex());
        assert_ne!(by_id["E01"], by_id["E02"]);
    }

    #[test]
    fn air_quality_overlay_emits_point_features() {
        let stations = one("RI1".to_string(), station("RI1", Some(4.0)));

        let fc = build_overlay(OverlayLayer::AirQuality, &BTreeMap::new(), &stations).unwrap();
        assert_eq!(fc.features.len(), 1);

        let geom = fc.features[0].geometry.as_ref().unwrap();
        assert!(matches!(geom.value, GeomValue::Point(_)));
        let props = fc.features[0].properties.as_ref().unwrap();
        assert!((props["maxIndex"].as_f64().unwrap() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn live_only_layers_are_rejected() {
        let err = build_overlay(OverlayLayer::Noise, &BTreeMap::new(), &BTreeMap::new());
        assert!(matches!(
            err,
            Err(GenerateError::UnsupportedLayer {
                layer: OverlayLayer::Noise
            })
        ));
        assert!(legend_entries(OverlayLayer::FloodRisk).is_err());
    }

    #[test]
    fn legends_match_gradient_endpoints() {
        let combined = legend_entries(OverlayLayer::Combined).unwrap();
        assert_eq!(combined.len(), 5);
        assert_eq!(combined[0].color, SCORE_STOPS[0].color.to_hex());
        assert_eq!(combined[4].color, SCORE_STOPS[2].color.to_hex());

        let deprivation = legend_entries(OverlayLayer::Deprivation).unwrap();
        assert_eq!(deprivation.len(), 11);
        assert_eq!(deprivation[0].color, DECILE_STOPS[0].color.to_hex());
        assert_eq!(deprivation[10].label, "No data");
    }
}
