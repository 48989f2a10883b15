use geo::{EuclideanDistance, HaversineDistance, Point};

use crate::models::GeoPoint;

/// Fixed radius of the property proximity search
pub const SEARCH_RADIUS_KM: f64 = 1000.0;

/// Kilometers per degree used when converting a radius to degrees.
/// 1° latitude ≈ 111 km; longitude degrees shrink towards the poles, which
/// this conversion deliberately ignores.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Convert a radius in kilometers to planar degrees in SRID 4326
///
/// This is what `ST_DWithin` on a `geometry` column compares against. It is
/// an approximation, not a geodesic distance.
#[inline]
pub fn radius_to_degrees(radius_km: f64) -> f64 {
    radius_km / KM_PER_DEGREE
}

/// Planar distance between two points in degrees
///
/// Mirrors `ST_Distance` on two SRID 4326 geometries.
#[inline]
pub fn degree_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    Point::from(a).euclidean_distance(&Point::from(b))
}

/// True when `point` lies within `degrees` of `center`, as `ST_DWithin` decides it
#[inline]
pub fn is_within_degrees(center: GeoPoint, point: GeoPoint, degrees: f64) -> bool {
    degree_distance(center, point) <= degrees
}

/// Great-circle distance in kilometers
#[inline]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    Point::from(a).haversine_distance(&Point::from(b)) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: GeoPoint = GeoPoint { longitude: -74.0060, latitude: 40.7128 };
    const BOSTON: GeoPoint = GeoPoint { longitude: -71.0589, latitude: 42.3601 };
    const LONDON: GeoPoint = GeoPoint { longitude: -0.1278, latitude: 51.5074 };

    #[test]
    fn test_radius_conversion() {
        let degrees = radius_to_degrees(SEARCH_RADIUS_KM);
        assert!((degrees - 9.009).abs() < 0.001, "got {}", degrees);
    }

    #[test]
    fn test_haversine_distances() {
        let boston = haversine_km(NYC, BOSTON);
        assert!((boston - 306.0).abs() < 10.0, "NYC-Boston should be ~306km, got {}", boston);

        let london = haversine_km(NYC, LONDON);
        assert!((london - 5570.0).abs() < 30.0, "NYC-London should be ~5570km, got {}", london);
    }

    #[test]
    fn test_within_search_radius() {
        let degrees = radius_to_degrees(SEARCH_RADIUS_KM);

        assert!(is_within_degrees(NYC, NYC, degrees));
        assert!(is_within_degrees(NYC, BOSTON, degrees));
        assert!(!is_within_degrees(NYC, LONDON, degrees));
    }
}
