// Service exports
pub mod geocoding;
pub mod memory;
pub mod postgres;
pub mod store;

pub use geocoding::{AddressQuery, GeocodingClient, GeocodingError};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{ListingStore, StoreError};
