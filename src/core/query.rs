//! SQL rendering of property searches.
//!
//! Every user supplied value goes through `push_bind`; only fixed column
//! names and operators are written as text.

use sqlx::{Postgres, QueryBuilder};

use crate::core::codec::SRID;
use crate::core::filters::Predicate;

/// Columns of a property search row: property fields, denormalized location
/// fields and the point geometry as text
pub const PROPERTY_SELECT: &str = r#"SELECT
    p.id, p.name, p.description, p.price_per_month, p.security_deposit,
    p.application_fee, p.photo_urls, p.amenities, p.highlights,
    p.is_pets_allowed, p.is_parking_included, p.beds, p.baths, p.square_feet,
    p.property_type, p.posted_date, p.average_rating, p.number_of_reviews,
    p.manager_cognito_id, p.location_id,
    l.address, l.city, l.state, l.country, l.postal_code,
    ST_AsText(l.coordinates) AS coordinates
FROM properties p
JOIN locations l ON p.location_id = l.id"#;

/// Append one predicate to the builder
pub fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::IdIn(ids) => {
            qb.push("p.id = ANY(");
            qb.push_bind(ids.clone());
            qb.push(")");
        }
        Predicate::PriceAtLeast(min) => {
            qb.push("p.price_per_month >= ");
            qb.push_bind(*min);
        }
        Predicate::PriceAtMost(max) => {
            qb.push("p.price_per_month <= ");
            qb.push_bind(*max);
        }
        Predicate::BedsAtLeast(min) => {
            qb.push("p.beds >= ");
            qb.push_bind(*min);
        }
        Predicate::BathsAtLeast(min) => {
            qb.push("p.baths >= ");
            qb.push_bind(*min);
        }
        Predicate::PropertyTypeIs(kind) => {
            qb.push("p.property_type = ");
            qb.push_bind(*kind);
        }
        Predicate::SquareFeetAtLeast(min) => {
            qb.push("p.square_feet >= ");
            qb.push_bind(*min);
        }
        Predicate::SquareFeetAtMost(max) => {
            qb.push("p.square_feet <= ");
            qb.push_bind(*max);
        }
        Predicate::HasAmenities(amenities) => {
            qb.push("p.amenities @> ");
            qb.push_bind(amenities.clone());
        }
        Predicate::LeaseStartsBy(date) => {
            qb.push("EXISTS (SELECT 1 FROM leases ls WHERE ls.property_id = p.id AND ls.start_date <= ");
            qb.push_bind(*date);
            qb.push(")");
        }
        Predicate::WithinDegrees { center, degrees } => {
            qb.push("ST_DWithin(l.coordinates::geometry, ST_SetSRID(ST_MakePoint(");
            qb.push_bind(center.longitude);
            qb.push(", ");
            qb.push_bind(center.latitude);
            qb.push(format!("), {}), ", SRID));
            qb.push_bind(*degrees);
            qb.push(")");
        }
    }
}

/// Build the complete search query
///
/// Zero predicates produce no WHERE clause and match every property.
pub fn build_search_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PROPERTY_SELECT);

    if !predicates.is_empty() {
        qb.push(" WHERE ");
        for (i, predicate) in predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            push_predicate(&mut qb, predicate);
        }
    }

    qb.push(" ORDER BY p.id");
    qb
}

/// Build the query fetching a single property in the search row shape
pub fn build_property_query(id: i32) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PROPERTY_SELECT);
    qb.push(" WHERE p.id = ");
    qb.push_bind(id);
    qb
}
