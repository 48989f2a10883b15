use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS84 point, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Placeholder returned for locations whose geometry could not be decoded
    pub const UNRESOLVED: GeoPoint = GeoPoint {
        longitude: 0.0,
        latitude: 0.0,
    };

    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(value: GeoPoint) -> Self {
        geo::Point::new(value.longitude, value.latitude)
    }
}

/// Kinds of property a manager can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type")]
pub enum PropertyType {
    Rooms,
    Tinyhouse,
    Apartment,
    Villa,
    Townhouse,
    Cottage,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Rooms,
        PropertyType::Tinyhouse,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Townhouse,
        PropertyType::Cottage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Rooms => "Rooms",
            PropertyType::Tinyhouse => "Tinyhouse",
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Cottage => "Cottage",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPropertyType(pub String);

impl fmt::Display for UnknownPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = PropertyType::ALL.iter().map(|t| t.as_str()).collect();
        write!(
            f,
            "unknown property type '{}', expected one of: {}",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownPropertyType {}

impl FromStr for PropertyType {
    type Err = UnknownPropertyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PropertyType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPropertyType(trimmed.to_string()))
    }
}

/// Location of a property as returned to API consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub coordinates: GeoPoint,
    /// False when the stored geometry was missing or could not be decoded
    #[serde(rename = "coordinatesResolved")]
    pub coordinates_resolved: bool,
}

/// Property listing with its location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(rename = "pricePerMonth")]
    pub price_per_month: f64,
    #[serde(rename = "securityDeposit")]
    pub security_deposit: f64,
    #[serde(rename = "applicationFee")]
    pub application_fee: f64,
    #[serde(rename = "photoUrls")]
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    #[serde(rename = "isPetsAllowed")]
    pub is_pets_allowed: bool,
    #[serde(rename = "isParkingIncluded")]
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    #[serde(rename = "squareFeet")]
    pub square_feet: i32,
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    #[serde(rename = "postedDate")]
    pub posted_date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f64>,
    #[serde(rename = "numberOfReviews")]
    pub number_of_reviews: Option<i32>,
    #[serde(rename = "managerCognitoId")]
    pub manager_cognito_id: String,
    pub location: Location,
}

/// Flat row produced by the property search query
///
/// Location columns are denormalized into the row and the geometry is
/// selected as text, so one query returns everything needed for the response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropertyRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub posted_date: chrono::DateTime<chrono::Utc>,
    pub average_rating: Option<f64>,
    pub number_of_reviews: Option<i32>,
    pub manager_cognito_id: String,
    pub location_id: i32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: Option<String>,
}

/// Property manager account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Manager {
    pub id: i32,
    #[serde(rename = "cognitoId")]
    pub cognito_id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Tenant account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: i32,
    #[serde(rename = "cognitoId")]
    pub cognito_id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Address fields of a location about to be inserted
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    /// `None` when geocoding found no match
    pub coordinates: Option<GeoPoint>,
}

/// Property fields of a listing about to be inserted
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<String>,
    pub highlights: Vec<String>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: f64,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub manager_cognito_id: String,
}

/// Contact fields shared by manager and tenant accounts
#[derive(Debug, Clone)]
pub struct AccountFields {
    pub cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}
