use chrono::{DateTime, Utc};

use crate::core::criteria::FilterCriteria;
use crate::core::distance::{is_within_degrees, radius_to_degrees, SEARCH_RADIUS_KM};
use crate::models::{GeoPoint, PropertyType};

/// A single search condition. All predicates of a search are AND-combined.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    IdIn(Vec<i32>),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    BedsAtLeast(f64),
    BathsAtLeast(f64),
    PropertyTypeIs(PropertyType),
    SquareFeetAtLeast(i32),
    SquareFeetAtMost(i32),
    /// Every listed amenity must be present on the property
    HasAmenities(Vec<String>),
    /// Some lease on the property starts on or before this instant
    LeaseStartsBy(DateTime<Utc>),
    /// Location within `degrees` (planar, SRID 4326) of `center`
    WithinDegrees { center: GeoPoint, degrees: f64 },
}

/// One predicate-contribution step of the search pipeline
pub type FilterStep = fn(&FilterCriteria, Vec<Predicate>) -> Vec<Predicate>;

/// Steps in the order their predicates appear in the query
pub const FILTER_STEPS: &[FilterStep] = &[
    favorite_ids,
    price_range,
    beds,
    baths,
    square_feet_range,
    property_type,
    amenities,
    available_from,
    proximity,
];

/// Run every filter step over an empty accumulator
pub fn build_predicates(criteria: &FilterCriteria) -> Vec<Predicate> {
    FILTER_STEPS
        .iter()
        .fold(Vec::new(), |acc, step| step(criteria, acc))
}

pub fn favorite_ids(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(ids) = criteria.favorite_ids.value() {
        acc.push(Predicate::IdIn(ids.iter().copied().collect()));
    }
    acc
}

pub fn price_range(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(min) = criteria.price_min.value() {
        acc.push(Predicate::PriceAtLeast(*min));
    }
    if let Some(max) = criteria.price_max.value() {
        acc.push(Predicate::PriceAtMost(*max));
    }
    acc
}

pub fn beds(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(beds) = criteria.beds.value() {
        acc.push(Predicate::BedsAtLeast(*beds));
    }
    acc
}

pub fn baths(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(baths) = criteria.baths.value() {
        acc.push(Predicate::BathsAtLeast(*baths));
    }
    acc
}

pub fn square_feet_range(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(min) = criteria.square_feet_min.value() {
        acc.push(Predicate::SquareFeetAtLeast(*min));
    }
    if let Some(max) = criteria.square_feet_max.value() {
        acc.push(Predicate::SquareFeetAtMost(*max));
    }
    acc
}

pub fn property_type(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(kind) = criteria.property_type.value() {
        acc.push(Predicate::PropertyTypeIs(*kind));
    }
    acc
}

pub fn amenities(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(amenities) = criteria.amenities.value() {
        acc.push(Predicate::HasAmenities(amenities.iter().cloned().collect()));
    }
    acc
}

pub fn available_from(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(date) = criteria.available_from.value() {
        acc.push(Predicate::LeaseStartsBy(*date));
    }
    acc
}

pub fn proximity(criteria: &FilterCriteria, mut acc: Vec<Predicate>) -> Vec<Predicate> {
    if let Some(center) = criteria.center.value() {
        acc.push(Predicate::WithinDegrees {
            center: *center,
            degrees: radius_to_degrees(SEARCH_RADIUS_KM),
        });
    }
    acc
}

/// Property fields a predicate can be evaluated against without a database
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: i32,
    pub price_per_month: f64,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub amenities: &'a [String],
    pub coordinates: Option<GeoPoint>,
    pub lease_starts: &'a [DateTime<Utc>],
}

impl Predicate {
    /// Evaluate the predicate the way the SQL rendering of it does
    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        match self {
            Predicate::IdIn(ids) => ids.contains(&candidate.id),
            Predicate::PriceAtLeast(min) => candidate.price_per_month >= *min,
            Predicate::PriceAtMost(max) => candidate.price_per_month <= *max,
            Predicate::BedsAtLeast(min) => f64::from(candidate.beds) >= *min,
            Predicate::BathsAtLeast(min) => candidate.baths >= *min,
            Predicate::PropertyTypeIs(kind) => candidate.property_type == *kind,
            Predicate::SquareFeetAtLeast(min) => candidate.square_feet >= *min,
            Predicate::SquareFeetAtMost(max) => candidate.square_feet <= *max,
            Predicate::HasAmenities(required) => required
                .iter()
                .all(|amenity| candidate.amenities.contains(amenity)),
            Predicate::LeaseStartsBy(date) => {
                candidate.lease_starts.iter().any(|start| start <= date)
            }
            // NULL geometry never satisfies ST_DWithin
            Predicate::WithinDegrees { center, degrees } => candidate
                .coordinates
                .is_some_and(|point| is_within_degrees(*center, point, *degrees)),
        }
    }
}

/// True when the candidate satisfies every predicate
#[inline]
pub fn matches_all(predicates: &[Predicate], candidate: &Candidate<'_>) -> bool {
    predicates.iter().all(|p| p.matches(candidate))
}
