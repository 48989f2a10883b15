// Core search and geometry exports
pub mod assembly;
pub mod codec;
pub mod criteria;
pub mod distance;
pub mod filters;
pub mod query;

pub use assembly::{assemble, assemble_one};
pub use codec::{decode, encode, WktError, SRID};
pub use criteria::{Criterion, FilterCriteria, FilterError};
pub use distance::{radius_to_degrees, haversine_km, SEARCH_RADIUS_KM};
pub use filters::{build_predicates, matches_all, Candidate, Predicate};
pub use query::{build_property_query, build_search_query};
