//! Proximity secondary index for a document catalog.
//!
//! Documents are mapped to a validated location in radians, and query-time
//! sorting orders a candidate set by great-circle distance from a center
//! point supplied with the query.

pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod index;
pub mod metrics;
pub mod models;
pub mod query;
pub mod testing;

pub use catalog::Catalog;
pub use config::{CatalogSettings, IndexOptions};
pub use error::{ProximityError, Result};
pub use geo::{haversine_distance_km, CenterPoint, GeoValue, LocationRecord};
pub use index::{LocationStore, MemoryStore, ProximityIndex};
pub use models::*;
pub use query::{QueryContext, SortExecutor, SortIndex, SortKeys, SortOptions, SortResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
