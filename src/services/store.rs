use async_trait::async_trait;
use thiserror::Error;

use crate::core::Predicate;
use crate::models::{AccountFields, Manager, NewLocation, NewProperty, PropertyRow, Tenant};

/// Errors that can occur when reading or writing listings
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Map unique-constraint violations to [`StoreError::Conflict`] and
    /// foreign-key violations to [`StoreError::NotFound`], both naming `what`
    pub fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what.into()),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound(what.into()),
            _ => StoreError::SqlxError(err),
        }
    }
}

/// Storage behind the HTTP handlers
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Run a property search. Rows come back ordered by property id.
    async fn search_properties(&self, predicates: &[Predicate]) -> Result<Vec<PropertyRow>, StoreError>;

    async fn get_property(&self, id: i32) -> Result<Option<PropertyRow>, StoreError>;

    /// Insert a location and the property referencing it
    async fn create_property(
        &self,
        location: NewLocation,
        property: NewProperty,
    ) -> Result<PropertyRow, StoreError>;

    async fn get_manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError>;

    async fn create_manager(&self, fields: AccountFields) -> Result<Manager, StoreError>;

    /// Update contact fields of the manager identified by `fields.cognito_id`
    async fn update_manager(&self, fields: AccountFields) -> Result<Option<Manager>, StoreError>;

    async fn get_tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError>;

    async fn create_tenant(&self, fields: AccountFields) -> Result<Tenant, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
