//! Rental Listings - property search and listing service
//!
//! This library provides the property search used by the rental marketplace:
//! typed filter criteria, a parameterized PostGIS query builder, and the
//! codec that turns stored point geometry into structured coordinates.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_predicates, build_search_query, decode, encode, FilterCriteria, Predicate};
pub use error::ApiError;
pub use models::{GeoPoint, Property, PropertyQueryParams, PropertyType};
