use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::models::{GeoPoint, PropertyQueryParams, PropertyType, UnknownPropertyType};

/// Literal query value meaning "do not filter on this field"
pub const ANY: &str = "any";

/// Errors that reject a search request outright
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("{0}")]
    PropertyType(#[from] UnknownPropertyType),
}

/// State of a single search field
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion<T> {
    /// Not supplied, or supplied but unusable
    Absent,
    /// Supplied as the `any` sentinel
    Any,
    Present(T),
}

impl<T> Criterion<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Criterion::Present(v) => Some(v),
            Criterion::Absent | Criterion::Any => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Criterion::Present(_))
    }
}

impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Criterion::Absent
    }
}

/// Typed property search filters, one per recognized query parameter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub favorite_ids: Criterion<BTreeSet<i32>>,
    pub price_min: Criterion<f64>,
    pub price_max: Criterion<f64>,
    pub beds: Criterion<f64>,
    pub baths: Criterion<f64>,
    pub property_type: Criterion<PropertyType>,
    pub square_feet_min: Criterion<i32>,
    pub square_feet_max: Criterion<i32>,
    pub amenities: Criterion<BTreeSet<String>>,
    pub available_from: Criterion<DateTime<Utc>>,
    pub center: Criterion<GeoPoint>,
}

impl FilterCriteria {
    /// Build criteria from raw query parameters
    ///
    /// Unparsable values become [`Criterion::Absent`]. Only an unknown
    /// property type fails the request.
    pub fn from_params(params: &PropertyQueryParams) -> Result<Self, FilterError> {
        let property_type = match raw(&params.property_type) {
            None => Criterion::Absent,
            Some(v) if is_any(v) => Criterion::Any,
            Some(v) => Criterion::Present(v.parse::<PropertyType>()?),
        };

        Ok(Self {
            favorite_ids: parse_with("favoriteIds", &params.favorite_ids, false, parse_id_set),
            price_min: parse_with("priceMin", &params.price_min, false, parse_number),
            price_max: parse_with("priceMax", &params.price_max, false, parse_number),
            beds: parse_with("beds", &params.beds, true, parse_number),
            baths: parse_with("baths", &params.baths, true, parse_number),
            property_type,
            square_feet_min: parse_with("squareFeetMin", &params.square_feet_min, false, parse_lower_bound),
            square_feet_max: parse_with("squareFeetMax", &params.square_feet_max, false, parse_upper_bound),
            amenities: parse_with("amenities", &params.amenities, true, parse_string_set),
            available_from: parse_with("availableFrom", &params.available_from, true, parse_date),
            center: parse_center(&params.latitude, &params.longitude),
        })
    }

    /// Number of fields that will contribute a predicate
    pub fn active_count(&self) -> usize {
        [
            self.favorite_ids.is_present(),
            self.price_min.is_present(),
            self.price_max.is_present(),
            self.beds.is_present(),
            self.baths.is_present(),
            self.property_type.is_present(),
            self.square_feet_min.is_present(),
            self.square_feet_max.is_present(),
            self.amenities.is_present(),
            self.available_from.is_present(),
            self.center.is_present(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

fn raw(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_any(value: &str) -> bool {
    value.eq_ignore_ascii_case(ANY)
}

fn parse_with<T>(
    field: &'static str,
    value: &Option<String>,
    accepts_any: bool,
    parse: fn(&str) -> Option<T>,
) -> Criterion<T> {
    let Some(v) = raw(value) else {
        return Criterion::Absent;
    };

    if accepts_any && is_any(v) {
        return Criterion::Any;
    }

    match parse(v) {
        Some(parsed) => Criterion::Present(parsed),
        None => {
            tracing::debug!("Ignoring unparsable {} filter: {:?}", field, v);
            Criterion::Absent
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer bound admitting the same integers as `>= value`
fn parse_lower_bound(value: &str) -> Option<i32> {
    parse_number(value).map(|v| v.ceil() as i32)
}

/// Integer bound admitting the same integers as `<= value`
fn parse_upper_bound(value: &str) -> Option<i32> {
    parse_number(value).map(|v| v.floor() as i32)
}

fn parse_id_set(value: &str) -> Option<BTreeSet<i32>> {
    let ids: BTreeSet<i32> = value
        .split(',')
        .filter_map(|id| id.trim().parse::<i32>().ok())
        .collect();

    (!ids.is_empty()).then_some(ids)
}

fn parse_string_set(value: &str) -> Option<BTreeSet<String>> {
    let items: BTreeSet<String> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    (!items.is_empty()).then_some(items)
}

/// Accepts a calendar date or a full RFC 3339 timestamp
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_center(latitude: &Option<String>, longitude: &Option<String>) -> Criterion<GeoPoint> {
    let (Some(lat), Some(lon)) = (raw(latitude), raw(longitude)) else {
        if raw(latitude).is_some() || raw(longitude).is_some() {
            tracing::debug!("Ignoring proximity filter: latitude and longitude must be given together");
        }
        return Criterion::Absent;
    };

    match (parse_number(lat), parse_number(lon)) {
        (Some(latitude), Some(longitude)) => {
            let point = GeoPoint::new(longitude, latitude);
            if point.is_valid() {
                Criterion::Present(point)
            } else {
                tracing::debug!("Ignoring out of range proximity filter: lat={}, lon={}", lat, lon);
                Criterion::Absent
            }
        }
        _ => {
            tracing::debug!("Ignoring unparsable proximity filter: lat={:?}, lon={:?}", lat, lon);
            Criterion::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PropertyQueryParams {
        PropertyQueryParams::default()
    }

    #[test]
    fn test_empty_params_have_no_active_fields() {
        let criteria = FilterCriteria::from_params(&params()).unwrap();
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(criteria.active_count(), 0);
    }

    #[test]
    fn test_favorite_ids_drop_invalid_tokens() {
        let mut p = params();
        p.favorite_ids = Some("3, 1,abc,,3".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.favorite_ids, Criterion::Present(BTreeSet::from([1, 3])));

        p.favorite_ids = Some("x,y".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.favorite_ids, Criterion::Absent);
    }

    #[test]
    fn test_any_sentinel_is_distinct_from_absent() {
        let mut p = params();
        p.beds = Some("any".to_string());
        p.amenities = Some("ANY".to_string());
        p.property_type = Some("any".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();

        assert_eq!(criteria.beds, Criterion::Any);
        assert_eq!(criteria.amenities, Criterion::Any);
        assert_eq!(criteria.property_type, Criterion::Any);
        assert_eq!(criteria.baths, Criterion::Absent);
        assert_eq!(criteria.active_count(), 0);
    }

    #[test]
    fn test_price_does_not_accept_any() {
        let mut p = params();
        p.price_min = Some("any".to_string());
        p.price_max = Some("1500".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();

        assert_eq!(criteria.price_min, Criterion::Absent);
        assert_eq!(criteria.price_max, Criterion::Present(1500.0));
    }

    #[test]
    fn test_unparsable_numbers_are_ignored() {
        let mut p = params();
        p.price_min = Some("cheap".to_string());
        p.square_feet_max = Some("NaN".to_string());
        p.beds = Some("2.5".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();

        assert_eq!(criteria.price_min, Criterion::Absent);
        assert_eq!(criteria.square_feet_max, Criterion::Absent);
        assert_eq!(criteria.beds, Criterion::Present(2.5));
    }

    #[test]
    fn test_fractional_square_feet_bounds_round_inward() {
        let mut p = params();
        p.square_feet_min = Some("899.5".to_string());
        p.square_feet_max = Some("1200.7".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();

        assert_eq!(criteria.square_feet_min, Criterion::Present(900));
        assert_eq!(criteria.square_feet_max, Criterion::Present(1200));

        p.square_feet_min = Some("-0.5".to_string());
        p.square_feet_max = Some("850".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();

        assert_eq!(criteria.square_feet_min, Criterion::Present(0));
        assert_eq!(criteria.square_feet_max, Criterion::Present(850));
    }

    #[test]
    fn test_unknown_property_type_is_rejected() {
        let mut p = params();
        p.property_type = Some("Rowhouse".to_string());
        let err = FilterCriteria::from_params(&p).unwrap_err();
        assert!(err.to_string().contains("Rowhouse"));
    }

    #[test]
    fn test_available_from_formats() {
        assert_eq!(
            parse_date("2025-03-01").unwrap().to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert!(parse_date("2025-03-01T12:30:00+02:00").is_some());
        assert!(parse_date("next tuesday").is_none());

        let mut p = params();
        p.available_from = Some("31/02/2025".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.available_from, Criterion::Absent);
    }

    #[test]
    fn test_center_requires_both_coordinates() {
        let mut p = params();
        p.latitude = Some("40.7128".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.center, Criterion::Absent);

        p.longitude = Some("-74.0060".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.center, Criterion::Present(GeoPoint::new(-74.0060, 40.7128)));

        p.latitude = Some("140".to_string());
        let criteria = FilterCriteria::from_params(&p).unwrap();
        assert_eq!(criteria.center, Criterion::Absent);
    }
}
