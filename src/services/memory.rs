use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::{codec, matches_all, Candidate, Predicate};
use crate::models::{AccountFields, Manager, NewLocation, NewProperty, PropertyRow, Tenant};
use crate::services::store::{ListingStore, StoreError};

/// In-process listing store
///
/// Evaluates search predicates with [`Predicate::matches`] instead of SQL.
/// Used for local runs without a database (`database.url = "memory://"`)
/// and in tests.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

#[derive(Default)]
struct MemoryData {
    properties: Vec<PropertyRow>,
    leases: Vec<(i32, DateTime<Utc>)>,
    managers: Vec<Manager>,
    tenants: Vec<Tenant>,
    next_location_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lease on a property starting at `start_date`
    pub async fn add_lease(&self, property_id: i32, start_date: DateTime<Utc>) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if !data.properties.iter().any(|p| p.id == property_id) {
            return Err(StoreError::NotFound(format!("property {}", property_id)));
        }
        data.leases.push((property_id, start_date));
        Ok(())
    }

    /// Overwrite the stored geometry text of a property's location
    pub async fn set_geometry(&self, property_id: i32, geometry: Option<String>) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let row = data
            .properties
            .iter_mut()
            .find(|p| p.id == property_id)
            .ok_or_else(|| StoreError::NotFound(format!("property {}", property_id)))?;
        row.coordinates = geometry;
        Ok(())
    }
}

impl MemoryData {
    fn matches(&self, row: &PropertyRow, predicates: &[Predicate]) -> bool {
        let lease_starts: Vec<DateTime<Utc>> = self
            .leases
            .iter()
            .filter(|(property_id, _)| *property_id == row.id)
            .map(|(_, start)| *start)
            .collect();

        let candidate = Candidate {
            id: row.id,
            price_per_month: row.price_per_month,
            beds: row.beds,
            baths: row.baths,
            square_feet: row.square_feet,
            property_type: row.property_type,
            amenities: &row.amenities,
            coordinates: row.coordinates.as_deref().and_then(|wkt| codec::decode(wkt).ok()),
            lease_starts: &lease_starts,
        };

        matches_all(predicates, &candidate)
    }
}

fn next_id(len: usize) -> i32 {
    i32::try_from(len).map(|n| n + 1).unwrap_or(i32::MAX)
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn search_properties(&self, predicates: &[Predicate]) -> Result<Vec<PropertyRow>, StoreError> {
        let data = self.data.read().await;

        Ok(data
            .properties
            .iter()
            .filter(|row| data.matches(row, predicates))
            .cloned()
            .collect())
    }

    async fn get_property(&self, id: i32) -> Result<Option<PropertyRow>, StoreError> {
        let data = self.data.read().await;
        Ok(data.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn create_property(
        &self,
        location: NewLocation,
        property: NewProperty,
    ) -> Result<PropertyRow, StoreError> {
        let mut data = self.data.write().await;
        // properties.manager_cognito_id references managers
        if !data.managers.iter().any(|m| m.cognito_id == property.manager_cognito_id) {
            return Err(StoreError::NotFound(format!("manager {}", property.manager_cognito_id)));
        }
        data.next_location_id += 1;

        let row = PropertyRow {
            id: next_id(data.properties.len()),
            name: property.name,
            description: property.description,
            price_per_month: property.price_per_month,
            security_deposit: property.security_deposit,
            application_fee: property.application_fee,
            photo_urls: property.photo_urls,
            amenities: property.amenities,
            highlights: property.highlights,
            is_pets_allowed: property.is_pets_allowed,
            is_parking_included: property.is_parking_included,
            beds: property.beds,
            baths: property.baths,
            square_feet: property.square_feet,
            property_type: property.property_type,
            posted_date: Utc::now(),
            average_rating: None,
            number_of_reviews: None,
            manager_cognito_id: property.manager_cognito_id,
            location_id: data.next_location_id,
            address: location.address,
            city: location.city,
            state: location.state,
            country: location.country,
            postal_code: location.postal_code,
            coordinates: location.coordinates.map(codec::encode),
        };

        data.properties.push(row.clone());
        Ok(row)
    }

    async fn get_manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError> {
        let data = self.data.read().await;
        Ok(data.managers.iter().find(|m| m.cognito_id == cognito_id).cloned())
    }

    async fn create_manager(&self, fields: AccountFields) -> Result<Manager, StoreError> {
        let mut data = self.data.write().await;
        if data.managers.iter().any(|m| m.cognito_id == fields.cognito_id) {
            return Err(StoreError::Conflict(format!("manager {}", fields.cognito_id)));
        }

        let manager = Manager {
            id: next_id(data.managers.len()),
            cognito_id: fields.cognito_id,
            name: fields.name,
            email: fields.email,
            phone_number: fields.phone_number,
        };
        data.managers.push(manager.clone());
        Ok(manager)
    }

    async fn update_manager(&self, fields: AccountFields) -> Result<Option<Manager>, StoreError> {
        let mut data = self.data.write().await;
        let Some(manager) = data.managers.iter_mut().find(|m| m.cognito_id == fields.cognito_id) else {
            return Ok(None);
        };

        manager.name = fields.name;
        manager.email = fields.email;
        manager.phone_number = fields.phone_number;
        Ok(Some(manager.clone()))
    }

    async fn get_tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError> {
        let data = self.data.read().await;
        Ok(data.tenants.iter().find(|t| t.cognito_id == cognito_id).cloned())
    }

    async fn create_tenant(&self, fields: AccountFields) -> Result<Tenant, StoreError> {
        let mut data = self.data.write().await;
        if data.tenants.iter().any(|t| t.cognito_id == fields.cognito_id) {
            return Err(StoreError::Conflict(format!("tenant {}", fields.cognito_id)));
        }

        let tenant = Tenant {
            id: next_id(data.tenants.len()),
            cognito_id: fields.cognito_id,
            name: fields.name,
            email: fields.email,
            phone_number: fields.phone_number,
        };
        data.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
