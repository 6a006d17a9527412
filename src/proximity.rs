//! Proximity of track points to locations.
//!
//! Two distinct measures live here and must not be conflated:
//!
//! - `approx_filter_distance`: planar approximation, `111 km/degree`
//!   applied to the Euclidean degree offset. This is what the passage
//!   filters use, and the only measure that decides event selection.
//! - `SearchArea`: a geodesic circle ring around a location, used by map
//!   collaborators and for a containment diagnostic. It is geodesically
//!   accurate and will disagree with the planar measure away from the
//!   equator and at large radii.

use geo::{Contains, Destination, Distance, Geodesic, LineString, Point, Polygon};

use crate::model::Coordinate;

/// Approximate kilometres per degree of arc.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Vertex count for search-area rings.
pub const DEFAULT_RING_VERTICES: usize = 72;

/// Maps any longitude onto [-180, 180) via `((lon + 180) mod 360) - 180`
/// with a floored modulo, so 0..360 catalogs line up with signed inputs.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Planar approximate distance in km between a track point and a location.
///
/// `111 * sqrt(dlat^2 + dlon^2)`. Arguments are named coordinates, so
/// there is a single ordering: the track point first, the location second.
/// The formula is symmetric, so swapping them gives the same result.
/// Positional `(lat, lon, lat, lon)` callers that passed longitude first
/// got the same distance, since the sum of squares ignores which axis is
/// which; named `Coordinate` fields replace that positional ordering.
/// Longitude differences are not wrapped across the antimeridian.
pub fn approx_filter_distance(point: Coordinate, location: Coordinate) -> f64 {
    let dlat = point.latitude - location.latitude;
    let dlon = point.longitude - location.longitude;
    KM_PER_DEGREE * (dlat * dlat + dlon * dlon).sqrt()
}

/// Geodesic (WGS84) distance in km between two coordinates.
pub fn geodesic_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.distance(to_point(a), to_point(b)) / 1000.0
}

fn to_point(c: Coordinate) -> Point<f64> {
    // geo points are (x = longitude, y = latitude)
    Point::new(c.longitude, c.latitude)
}

// ---------------------------------------------------------------------------
// Geodesic search area
// ---------------------------------------------------------------------------

/// Geodesic circle of `radius_km` around a location, as a closed polygon.
#[derive(Debug, Clone)]
pub struct SearchArea {
    pub center: Coordinate,
    pub radius_km: f64,
    ring: Polygon<f64>,
}

impl SearchArea {
    /// Builds the ring with `DEFAULT_RING_VERTICES` vertices.
    pub fn new(center: Coordinate, radius_km: f64) -> Self {
        Self::with_vertices(center, radius_km, DEFAULT_RING_VERTICES)
    }

    /// Builds the ring by walking geodesic destinations at evenly spaced
    /// bearings. Fewer than 3 vertices is raised to 3.
    pub fn with_vertices(center: Coordinate, radius_km: f64, vertices: usize) -> Self {
        let vertices = vertices.max(3);
        let origin = to_point(center);
        let radius_m = radius_km * 1000.0;

        let ring: Vec<Point<f64>> = (0..vertices)
            .map(|i| {
                let bearing = 360.0 * i as f64 / vertices as f64;
                Geodesic.destination(origin, bearing, radius_m)
            })
            .collect();

        Self {
            center,
            radius_km,
            ring: Polygon::new(LineString::from(ring), vec![]),
        }
    }

    /// Point-in-polygon membership against the geodesic ring.
    ///
    /// Diagnostic and mapping use only; passage filtering goes through
    /// `approx_filter_distance`.
    pub fn contains(&self, point: Coordinate) -> bool {
        self.ring.contains(&to_point(point))
    }

    /// Ring vertices in order, closing vertex included.
    pub fn ring_coordinates(&self) -> Vec<Coordinate> {
        self.ring
            .exterior()
            .points()
            .map(|p| Coordinate::new(p.y(), p.x()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
