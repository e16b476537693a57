//! Loads [`Station`] records from a saved hourly air quality bulletin.
//!
//! The bulletin is the London Air `Hourly/MonitoringIndex` JSON document
//! (`HourlyAirQualityIndex` → `LocalAuthority` → `Site` → `Species`). The
//! feed collapses single-element lists to bare objects and prefixes every
//! attribute with `@`, holding all values as strings, so parsing walks raw
//! [`serde_json::Value`]s rather than deserializing a fixed schema.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use propmap_models::{Point, Station};
use serde_json::Value;

use crate::GenerateError;

/// Reads and parses the bulletin file at `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the file cannot be read or is not a valid
/// bulletin document.
pub fn load_stations(path: &Path) -> Result<BTreeMap<String, Station>, GenerateError> {
    let raw = std::fs::read_to_string(path)?;
    parse_stations(&raw)
}

/// Parses a bulletin document into a station map keyed by site code.
///
/// A station's `max_index` is the highest air quality index across its
/// reported species; sites with no parseable species index get `None`
/// (treated as neutral downstream). Sites without a code or coordinates are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`GenerateError`] if `raw` is not JSON or lacks the
/// `HourlyAirQualityIndex` root object.
pub fn parse_stations(raw: &str) -> Result<BTreeMap<String, Station>, GenerateError> {
    let doc: Value = serde_json::from_str(raw)?;

    let root = doc
        .get("HourlyAirQualityIndex")
        .ok_or_else(|| GenerateError::Conversion {
            message: "bulletin has no HourlyAirQualityIndex root".to_string(),
        })?;

    let mut stations = BTreeMap::new();

    for authority in items(root.get("LocalAuthority")) {
        for site in items(authority.get("Site")) {
            let Some(station) = parse_site(site) else {
                continue;
            };
            stations.insert(station.id.clone(), station);
        }
    }

    log::info!("Loaded {} stations from bulletin", stations.len());
    Ok(stations)
}

/// Parses one `Site` object into a [`Station`].
fn parse_site(site: &Value) -> Option<Station> {
    let id = attr(site, "@SiteCode")?.to_string();

    let Some(location) = parse_location(site) else {
        log::warn!("Skipping site {id}: no coordinates");
        return None;
    };

    let name = attr(site, "@SiteName").unwrap_or(&id).to_string();
    let updated_at = attr(site, "@BulletinDate").and_then(parse_bulletin_date);

    let max_index = items(site.get("Species"))
        .into_iter()
        .filter_map(|species| attr(species, "@AirQualityIndex"))
        .filter_map(|index| index.parse::<f64>().ok())
        .fold(None, |acc: Option<f64>, index| {
            Some(acc.map_or(index, |best| best.max(index)))
        });

    Some(Station {
        id,
        name,
        location,
        max_index,
        updated_at,
    })
}

fn parse_location(site: &Value) -> Option<Point> {
    let lat = attr(site, "@Latitude")?.parse::<f64>().ok()?;
    let lng = attr(site, "@Longitude")?.parse::<f64>().ok()?;
    Some(Point::new(lat, lng))
}

/// Parses the feed's `YYYY-MM-DD HH:MM:SS` bulletin timestamp as UTC.
fn parse_bulletin_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Normalizes the feed's object-or-array convention to a slice of items.
fn items(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(entries)) => entries.iter().collect(),
        Some(object @ Value::Object(_)) => vec![object],
        _ => Vec::new(),
    }
}

/// Fetches an `@`-prefixed string attribute, trimmed, rejecting empties.
fn attr<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
