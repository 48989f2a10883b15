use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::core::{build_property_query, build_search_query, codec, Predicate};
use crate::models::{AccountFields, Manager, NewLocation, NewProperty, PropertyRow, Tenant};
use crate::services::store::{ListingStore, StoreError};

/// PostgreSQL + PostGIS backed listing store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ListingStore for PostgresStore {
    async fn search_properties(&self, predicates: &[Predicate]) -> Result<Vec<PropertyRow>, StoreError> {
        let mut qb = build_search_query(predicates);
        tracing::debug!("Property search SQL: {}", qb.sql());

        let rows = qb
            .build_query_as::<PropertyRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get_property(&self, id: i32) -> Result<Option<PropertyRow>, StoreError> {
        let mut qb = build_property_query(id);

        let row = qb
            .build_query_as::<PropertyRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn create_property(
        &self,
        location: NewLocation,
        property: NewProperty,
    ) -> Result<PropertyRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        let location_query = r#"
            INSERT INTO locations (address, city, state, country, postal_code, coordinates)
            VALUES ($1, $2, $3, $4, $5, ST_GeomFromEWKT($6))
            RETURNING id
        "#;

        let location_id: i32 = sqlx::query(location_query)
            .bind(&location.address)
            .bind(&location.city)
            .bind(&location.state)
            .bind(&location.country)
            .bind(&location.postal_code)
            .bind(location.coordinates.map(codec::encode))
            .fetch_one(&mut *tx)
            .await?
            .get("id");

        let property_query = r#"
            INSERT INTO properties (
                name, description, price_per_month, security_deposit, application_fee,
                photo_urls, amenities, highlights, is_pets_allowed, is_parking_included,
                beds, baths, square_feet, property_type, location_id, manager_cognito_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
        "#;

        let property_id: i32 = sqlx::query(property_query)
            .bind(&property.name)
            .bind(&property.description)
            .bind(property.price_per_month)
            .bind(property.security_deposit)
            .bind(property.application_fee)
            .bind(&property.photo_urls)
            .bind(&property.amenities)
            .bind(&property.highlights)
            .bind(property.is_pets_allowed)
            .bind(property.is_parking_included)
            .bind(property.beds)
            .bind(property.baths)
            .bind(property.square_feet)
            .bind(property.property_type)
            .bind(location_id)
            .bind(&property.manager_cognito_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::from_insert(e, format!("manager {}", property.manager_cognito_id)))?
            .get("id");

        let row = build_property_query(property_id)
            .build_query_as::<PropertyRow>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Inserted property {} at location {}", property_id, location_id);

        Ok(row)
    }

    async fn get_manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError> {
        let query = r#"
            SELECT id, cognito_id, name, email, phone_number
            FROM managers
            WHERE cognito_id = $1
        "#;

        let manager = sqlx::query_as::<_, Manager>(query)
            .bind(cognito_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(manager)
    }

    async fn create_manager(&self, fields: AccountFields) -> Result<Manager, StoreError> {
        let query = r#"
            INSERT INTO managers (cognito_id, name, email, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, cognito_id, name, email, phone_number
        "#;

        sqlx::query_as::<_, Manager>(query)
            .bind(&fields.cognito_id)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.phone_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_insert(e, format!("manager {}", fields.cognito_id)))
    }

    async fn update_manager(&self, fields: AccountFields) -> Result<Option<Manager>, StoreError> {
        let query = r#"
            UPDATE managers
            SET name = $2, email = $3, phone_number = $4
            WHERE cognito_id = $1
            RETURNING id, cognito_id, name, email, phone_number
        "#;

        let manager = sqlx::query_as::<_, Manager>(query)
            .bind(&fields.cognito_id)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.phone_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(manager)
    }

    async fn get_tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError> {
        let query = r#"
            SELECT id, cognito_id, name, email, phone_number
            FROM tenants
            WHERE cognito_id = $1
        "#;

        let tenant = sqlx::query_as::<_, Tenant>(query)
            .bind(cognito_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }

    async fn create_tenant(&self, fields: AccountFields) -> Result<Tenant, StoreError> {
        let query = r#"
            INSERT INTO tenants (cognito_id, name, email, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, cognito_id, name, email, phone_number
        "#;

        sqlx::query_as::<_, Tenant>(query)
            .bind(&fields.cognito_id)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.phone_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_insert(e, format!("tenant {}", fields.cognito_id)))
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
