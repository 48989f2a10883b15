// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccountFields, GeoPoint, Location, Manager, NewLocation, NewProperty, Property, PropertyRow,
    PropertyType, Tenant, UnknownPropertyType,
};
pub use requests::{CreateAccountRequest, CreatePropertyRequest, PropertyQueryParams, UpdateAccountRequest};
pub use responses::{ErrorResponse, HealthResponse};
