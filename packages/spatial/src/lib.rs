#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry helpers for boundary-scale overlay scoring.
//!
//! Provides vertex-mean centroids for `GeoJSON` boundary polygons, haversine
//! great-circle distance, and a nearest-station lookup over a station map.
//! Everything here is a pure function of its arguments.

use std::collections::BTreeMap;

use geojson::{Geometry, Value};
use propmap_models::{Point, Station};

/// Mean Earth radius in kilometers, as used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the vertex-mean centroid of a `Polygon` or `MultiPolygon`
/// boundary.
///
/// Averages the `[lng, lat]` positions of every vertex on the outer ring of
/// each constituent polygon; interior rings (holes) are ignored. This is
/// intentionally approximate (no area weighting): administrative boundaries
/// at LSOA scale are small enough that the vertex mean lands well inside the
/// shape.
///
/// Returns `None` for geometry kinds other than `Polygon`/`MultiPolygon` or
/// when the outer rings contain no vertices.
#[must_use]
pub fn centroid(geometry: &Geometry) -> Option<Point> {
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count: u64 = 0;

    let mut accumulate = |ring: &[Vec<f64>]| {
        for position in ring {
            if let [lng, lat, ..] = position.as_slice() {
                lng_sum += lng;
                lat_sum += lat;
                count += 1;
            }
        }
    };

    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(outer) = rings.first() {
                accumulate(outer);
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(outer) = rings.first() {
                    accumulate(outer);
                }
            }
        }
        _ => return None,
    }

    if count == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    Some(Point::new(lat_sum / count, lng_sum / count))
}

/// Haversine great-circle distance between two points, in kilometers.
///
/// Symmetric in its arguments and zero (within floating-point tolerance)
/// when both points coincide.
#[must_use]
pub fn distance_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Finds the station closest to `point` by great-circle distance.
///
/// Ties go to whichever minimal-distance candidate is encountered first in
/// map iteration order. Returns `None` when `stations` is empty.
#[must_use]
pub fn nearest<'a>(point: Point, stations: &'a BTreeMap<String, Station>) -> Option<&'a Station> {
    let mut best: Option<(&Station, f64)> = None;

    for station in stations.values() {
        let dist = distance_km(point, station.location);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((station, dist)),
        }
    }

    best.map(|(station, _)| station)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(outer: Vec<Vec<f64>>) -> Geometry {
        Geometry::new(Value::Polygon(vec![outer]))
    }

    fn station(id: &str, lat: f64, lng: f64) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            location: Point::new(lat, lng),
            max_index: None,
            updated_at: None,
        }
    }

    #[test]
    fn centroid_of_square() {
        let geom = polygon(vec![
            vec![0.0, 0.0],
            vec![0.0, 2.0],
            vec![2.0, 2.0],
            vec![2.0, 0.0],
        ]);
        let c = centroid(&geom).unwrap();
        assert!((c.lat - 1.0).abs() < f64::EPSILON);
        assert!((c.lng - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centroid_of_empty_ring_is_none() {
        assert!(centroid(&polygon(vec![])).is_none());
    }

    #[test]
    fn centroid_ignores_holes() {
        let geom = Geometry::new(Value::Polygon(vec![
            vec![
                vec![0.0, 0.0],
                vec![0.0, 4.0],
                vec![4.0, 4.0],
                vec![4.0, 0.0],
            ],
            // Off-center hole that would skew an all-ring mean.
            vec![vec![3.0, 3.0], vec![3.0, 3.5], vec![3.5, 3.5]],
        ]));
        let c = centroid(&geom).unwrap();
        assert!((c.lat - 2.0).abs() < f64::EPSILON);
        assert!((c.lng - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centroid_spans_multipolygon_parts() {
        let geom = Geometry::new(Value::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![0.0, 2.0]]],
            vec![vec![vec![4.0, 4.0], vec![4.0, 6.0]]],
        ]));
        let c = centroid(&geom).unwrap();
        assert!((c.lat - 3.0).abs() < f64::EPSILON);
        assert!((c.lng - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centroid_of_point_geometry_is_none() {
        let geom = Geometry::new(Value::Point(vec![-0.2, 51.5]));
        assert!(centroid(&geom).is_none());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point::new(51.49, -0.23);
        assert!(distance_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(51.4927, -0.2339); // Hammersmith
        let b = Point::new(51.4613, -0.3037); // Richmond
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn distance_matches_known_value() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere.
        let a = Point::new(51.0, 0.0);
        let b = Point::new(52.0, 0.0);
        let d = distance_km(a, b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn nearest_on_empty_map_is_none() {
        let stations = BTreeMap::new();
        assert!(nearest(Point::new(51.5, -0.2), &stations).is_none());
    }

    #[test]
    fn nearest_picks_minimum_distance() {
        let mut stations = BTreeMap::new();
        stations.insert("far".to_string(), station("far", 52.5, -1.9));
        stations.insert("near".to_string(), station("near", 51.51, -0.21));
        stations.insert("mid".to_string(), station("mid", 51.8, -0.5));

        let hit = nearest(Point::new(51.5, -0.2), &stations).unwrap();
        assert_eq!(hit.id, "near");
    }

    #[test]
    fn nearest_tie_returns_some_minimal_candidate() {
        let p = Point::new(51.5, 0.0);
        let mut stations = BTreeMap::new();
        stations.insert("east".to_string(), station("east", 51.5, 0.1));
        stations.insert("west".to_string(), station("west", 51.5, -0.1));

        let hit = nearest(p, &stations).unwrap();
        let d = distance_km(p, hit.location);
        let min = stations
            .values()
            .map(|s| distance_km(p, s.location))
            .fold(f64::INFINITY, f64::min);
        assert!((d - min).abs() < 1e-9);
    }
}
