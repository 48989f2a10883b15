use crate::core::codec;
use crate::models::{GeoPoint, Location, Property, PropertyRow};

/// Turn search rows into response properties, preserving their order
///
/// A row whose geometry is missing or malformed is still returned, with
/// placeholder coordinates and `coordinates_resolved` set to false.
pub fn assemble(rows: Vec<PropertyRow>) -> Vec<Property> {
    rows.into_iter().map(assemble_one).collect()
}

/// Convert a single row
pub fn assemble_one(row: PropertyRow) -> Property {
    let (coordinates, coordinates_resolved) = resolve_coordinates(row.id, row.coordinates.as_deref());

    Property {
        id: row.id,
        name: row.name,
        description: row.description,
        price_per_month: row.price_per_month,
        security_deposit: row.security_deposit,
        application_fee: row.application_fee,
        photo_urls: row.photo_urls,
        amenities: row.amenities,
        highlights: row.highlights,
        is_pets_allowed: row.is_pets_allowed,
        is_parking_included: row.is_parking_included,
        beds: row.beds,
        baths: row.baths,
        square_feet: row.square_feet,
        property_type: row.property_type,
        posted_date: row.posted_date,
        average_rating: row.average_rating,
        number_of_reviews: row.number_of_reviews,
        manager_cognito_id: row.manager_cognito_id,
        location: Location {
            id: row.location_id,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            postal_code: row.postal_code,
            coordinates,
            coordinates_resolved,
        },
    }
}

fn resolve_coordinates(property_id: i32, wkt: Option<&str>) -> (GeoPoint, bool) {
    let Some(wkt) = wkt else {
        tracing::debug!("Property {} has no stored coordinates", property_id);
        return (GeoPoint::UNRESOLVED, false);
    };

    match codec::decode(wkt) {
        Ok(point) => (point, true),
        Err(e) => {
            tracing::warn!(
                "Failed to decode coordinates of property {} ({:?}): {}",
                property_id,
                wkt,
                e
            );
            (GeoPoint::UNRESOLVED, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;
    use chrono::Utc;

    fn row(id: i32, coordinates: Option<&str>) -> PropertyRow {
        PropertyRow {
            id,
            name: format!("Property {}", id),
            description: String::new(),
            price_per_month: 1500.0,
            security_deposit: 500.0,
            application_fee: 50.0,
            photo_urls: vec![],
            amenities: vec!["wifi".to_string()],
            highlights: vec![],
            is_pets_allowed: false,
            is_parking_included: true,
            beds: 2,
            baths: 1.0,
            square_feet: 800,
            property_type: PropertyType::Apartment,
            posted_date: Utc::now(),
            average_rating: None,
            number_of_reviews: None,
            manager_cognito_id: "manager-1".to_string(),
            location_id: id * 10,
            address: "1 Main St".to_string(),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            country: "USA".to_string(),
            postal_code: "02108".to_string(),
            coordinates: coordinates.map(str::to_string),
        }
    }

    #[test]
    fn test_assemble_decodes_coordinates() {
        let properties = assemble(vec![row(1, Some("POINT(-71.0589 42.3601)"))]);
        let location = &properties[0].location;

        assert!(location.coordinates_resolved);
        assert_eq!(location.coordinates.longitude, -71.0589);
        assert_eq!(location.coordinates.latitude, 42.3601);
        assert_eq!(location.id, 10);
    }

    #[test]
    fn test_bad_rows_are_isolated_and_order_kept() {
        let properties = assemble(vec![
            row(3, Some("POINT(1 2)")),
            row(1, Some("POINT()")),
            row(2, None),
            row(4, Some("garbage")),
        ]);

        let ids: Vec<i32> = properties.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);

        let resolved: Vec<bool> = properties.iter().map(|p| p.location.coordinates_resolved).collect();
        assert_eq!(resolved, vec![true, false, false, false]);
        assert_eq!(properties[1].location.coordinates, GeoPoint::UNRESOLVED);
    }

    #[test]
    fn test_serialized_location_uses_structured_coordinates() {
        let property = assemble_one(row(1, Some("POINT(-71.0589 42.3601)")));
        let json = serde_json::to_value(&property).unwrap();

        assert_eq!(json["location"]["coordinates"]["longitude"], -71.0589);
        assert_eq!(json["location"]["coordinates"]["latitude"], 42.3601);
        assert_eq!(json["location"]["coordinatesResolved"], true);
        assert_eq!(json["propertyType"], "Apartment");
    }
}
