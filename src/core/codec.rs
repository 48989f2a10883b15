//! Conversion between PostGIS point text and [`GeoPoint`].
//!
//! Reads what `ST_AsText` / `ST_AsEWKT` produce, e.g. `POINT(-74.006 40.7128)`
//! or `SRID=4326;POINT(-74.006 40.7128)`, and writes the EWKT form that
//! `ST_GeomFromEWKT` accepts when a location is inserted.

use crate::models::GeoPoint;
use thiserror::Error;

/// Spatial reference of every stored location (WGS84)
pub const SRID: i32 = 4326;

/// Errors produced while decoding point text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    #[error("empty geometry text")]
    Empty,

    #[error("expected a POINT geometry, got: {0}")]
    NotAPoint(String),

    #[error("unbalanced parentheses in: {0}")]
    Parentheses(String),

    #[error("expected 2 coordinates, got {0}")]
    Arity(usize),

    #[error("invalid {axis}: {value}")]
    InvalidNumber { axis: &'static str, value: String },

    #[error("coordinates out of range: lon={longitude}, lat={latitude}")]
    OutOfRange { longitude: f64, latitude: f64 },

    #[error("unsupported SRID {0}, expected 4326")]
    Srid(String),
}

/// Decode a point geometry. The first number is longitude, the second latitude.
pub fn decode(wkt: &str) -> Result<GeoPoint, WktError> {
    let mut text = wkt.trim();
    if text.is_empty() {
        return Err(WktError::Empty);
    }

    if let Some((prefix, rest)) = text.split_once(';') {
        let srid = prefix
            .trim()
            .strip_prefix("SRID=")
            .ok_or_else(|| WktError::NotAPoint(text.to_string()))?;
        if srid.trim() != SRID.to_string() {
            return Err(WktError::Srid(srid.trim().to_string()));
        }
        text = rest.trim();
    }

    let body = match text.get(..5) {
        Some(tag) if tag.eq_ignore_ascii_case("POINT") => text[5..].trim_start(),
        _ => return Err(WktError::NotAPoint(text.to_string())),
    };

    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| WktError::Parentheses(text.to_string()))?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(WktError::Arity(parts.len()));
    }

    let longitude = parse_axis("longitude", parts[0])?;
    let latitude = parse_axis("latitude", parts[1])?;

    let point = GeoPoint::new(longitude, latitude);
    if !point.is_valid() {
        return Err(WktError::OutOfRange {
            longitude,
            latitude,
        });
    }

    Ok(point)
}

fn parse_axis(axis: &'static str, value: &str) -> Result<f64, WktError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WktError::InvalidNumber {
            axis,
            value: value.to_string(),
        })
}

/// Encode a point as SRID-tagged EWKT for `ST_GeomFromEWKT`
pub fn encode(point: GeoPoint) -> String {
    format!(
        "SRID={};POINT({} {})",
        SRID, point.longitude, point.latitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_orders_longitude_first() {
        let point = decode("POINT(-74.006 40.7128)").unwrap();
        assert_eq!(point.longitude, -74.006);
        assert_eq!(point.latitude, 40.7128);
    }

    #[test]
    fn test_decode_accepts_spacing_and_srid_prefix() {
        let point = decode("  SRID=4326;POINT ( 2.3522   48.8566 ) ").unwrap();
        assert_eq!(point, GeoPoint::new(2.3522, 48.8566));
    }

    #[test]
    fn test_decode_empty_and_missing_coordinates() {
        assert_eq!(decode(""), Err(WktError::Empty));
        assert_eq!(decode("POINT()"), Err(WktError::Arity(0)));
        assert_eq!(decode("POINT EMPTY"), Err(WktError::Parentheses("POINT EMPTY".into())));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("LINESTRING(0 0, 1 1)"), Err(WktError::NotAPoint(_))));
        assert!(matches!(decode("POINT(1 2 3)"), Err(WktError::Arity(3))));
        assert!(matches!(
            decode("POINT(abc 10)"),
            Err(WktError::InvalidNumber { axis: "longitude", .. })
        ));
        assert!(matches!(decode("POINT(10 95)"), Err(WktError::OutOfRange { .. })));
        assert!(matches!(decode("SRID=3857;POINT(1 1)"), Err(WktError::Srid(_))));
        assert!(matches!(decode("POINT(NaN 1)"), Err(WktError::InvalidNumber { .. })));
    }

    #[test]
    fn test_encode_tags_srid() {
        assert_eq!(encode(GeoPoint::new(-0.1278, 51.5074)), "SRID=4326;POINT(-0.1278 51.5074)");
    }

    #[test]
    fn test_round_trip_at_range_edges() {
        for (lon, lat) in [(-180.0, -90.0), (180.0, 90.0), (-71.0589, 42.3601), (1e-7, -1e-7)] {
            let decoded = decode(&encode(GeoPoint::new(lon, lat))).unwrap();
            assert!((decoded.longitude - lon).abs() < 1e-12);
            assert!((decoded.latitude - lat).abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip_over_the_whole_grid() {
        // half-degree steps, each also nudged off the step by a fraction
        for i in 0..=720 {
            for j in 0..=360 {
                let lon = -180.0 + f64::from(i) * 0.5;
                let lat = -90.0 + f64::from(j) * 0.5;

                for point in [
                    GeoPoint::new(lon, lat),
                    GeoPoint::new((lon - 0.123_456_7).max(-180.0), (lat + 0.000_987_6).min(90.0)),
                ] {
                    let decoded = decode(&encode(point)).unwrap();
                    assert_eq!(decoded, point, "round trip failed for {:?}", point);
                }
            }
        }
    }
}
