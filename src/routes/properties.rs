use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::{AuthUser, Role};
use crate::core::{assemble, assemble_one, build_predicates, FilterCriteria};
use crate::error::ApiError;
use crate::models::{CreatePropertyRequest, NewLocation, NewProperty, PropertyQueryParams};
use crate::routes::AppState;
use crate::services::AddressQuery;

/// Configure all property routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/properties")
            .route("", web::get().to(search_properties))
            .route("", web::post().to(create_property))
            .route("/{id}", web::get().to(get_property)),
    );
}

/// Search properties
///
/// GET /properties?priceMin=1000&beds=2&amenities=wifi,parking&latitude=40.7&longitude=-74.0
///
/// Every parameter is optional. Unparsable values are ignored, except an
/// unknown `propertyType`, which is rejected with 400.
async fn search_properties(
    state: web::Data<AppState>,
    query: web::Query<PropertyQueryParams>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Fetching properties with filters: {:?}", query);

    let criteria = FilterCriteria::from_params(&query)?;
    let predicates = build_predicates(&criteria);

    tracing::debug!("Search uses {} predicates", predicates.len());

    let rows = state
        .store
        .search_properties(&predicates)
        .await
        .map_err(|e| ApiError::storage("Error retrieving properties", e))?;

    let properties = assemble(rows);

    tracing::info!("Successfully retrieved {} properties", properties.len());

    Ok(HttpResponse::Ok().json(properties))
}

/// Fetch a single property with its location
///
/// GET /properties/{id}
async fn get_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw_id = path.into_inner();
    let id: i32 = raw_id
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid property id: {}", raw_id)))?;

    tracing::info!("Fetching property details: {}", id);

    let row = state
        .store
        .get_property(id)
        .await
        .map_err(|e| ApiError::storage("Error retrieving property", e))?;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(assemble_one(row))),
        None => {
            tracing::warn!("Property not found: {}", id);
            Err(ApiError::NotFound("Property not found".to_string()))
        }
    }
}

/// Create a property listing for the authenticated manager
///
/// POST /properties
///
/// The address is geocoded first. No match, or a geocoder failure, stores
/// the location without coordinates instead of failing the request.
async fn create_property(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePropertyRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(Role::Manager)?;
    req.validate()?;

    let req = req.into_inner();

    tracing::info!("Creating new property for manager {} at {}", user.id, req.address);

    let address = AddressQuery {
        street: &req.address,
        city: &req.city,
        country: &req.country,
        postal_code: &req.postal_code,
    };

    let coordinates = match state.geocoder.geocode(&address).await {
        Ok(Some(point)) => Some(point),
        Ok(None) => {
            tracing::warn!("No geocoding match for {}, {}", req.address, req.city);
            None
        }
        Err(e) => {
            tracing::warn!("Geocoding failed for {}, {}: {}", req.address, req.city, e);
            None
        }
    };

    let location = NewLocation {
        address: req.address,
        city: req.city,
        state: req.state,
        country: req.country,
        postal_code: req.postal_code,
        coordinates,
    };

    let property = NewProperty {
        name: req.name,
        description: req.description,
        price_per_month: req.price_per_month,
        security_deposit: req.security_deposit,
        application_fee: req.application_fee,
        photo_urls: req.photo_urls,
        amenities: req.amenities,
        highlights: req.highlights,
        is_pets_allowed: req.is_pets_allowed,
        is_parking_included: req.is_parking_included,
        beds: req.beds,
        baths: req.baths,
        square_feet: req.square_feet,
        property_type: req.property_type,
        manager_cognito_id: user.id.clone(),
    };

    let row = state
        .store
        .create_property(location, property)
        .await
        .map_err(|e| ApiError::storage("Error creating property", e))?;

    tracing::info!("Successfully created property {} for manager {}", row.id, user.id);

    Ok(HttpResponse::Created().json(assemble_one(row)))
}
