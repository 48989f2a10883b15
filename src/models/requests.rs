use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::PropertyType;

/// Raw query string of the property search endpoint
///
/// Every parameter stays a string here; typing and validation happen when
/// the criteria are built. Unknown parameters are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyQueryParams {
    #[serde(rename = "favoriteIds")]
    pub favorite_ids: Option<String>,
    #[serde(rename = "priceMin")]
    pub price_min: Option<String>,
    #[serde(rename = "priceMax")]
    pub price_max: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    #[serde(rename = "propertyType")]
    pub property_type: Option<String>,
    #[serde(rename = "squareFeetMin")]
    pub square_feet_min: Option<String>,
    #[serde(rename = "squareFeetMax")]
    pub square_feet_max: Option<String>,
    pub amenities: Option<String>,
    #[serde(rename = "availableFrom")]
    pub available_from: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Request to create a property listing
///
/// The manager is taken from the authenticated user, not the body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    #[serde(rename = "pricePerMonth")]
    pub price_per_month: f64,
    #[validate(range(min = 0.0))]
    #[serde(rename = "securityDeposit", default)]
    pub security_deposit: f64,
    #[validate(range(min = 0.0))]
    #[serde(rename = "applicationFee", default)]
    pub application_fee: f64,
    #[serde(rename = "photoUrls", default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(rename = "isPetsAllowed", default)]
    pub is_pets_allowed: bool,
    #[serde(rename = "isParkingIncluded", default)]
    pub is_parking_included: bool,
    #[validate(range(min = 0))]
    pub beds: i32,
    #[validate(range(min = 0.0))]
    pub baths: f64,
    #[validate(range(min = 0))]
    #[serde(rename = "squareFeet")]
    pub square_feet: i32,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[serde(rename = "postalCode", default)]
    pub postal_code: String,
}

/// Request to create a manager or tenant account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "cognitoId")]
    pub cognito_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
}

/// Request to update a manager's contact details
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
}
