//! Query-time sorting
//!
//! A query supplies its options (currently only `center`) through a
//! [`QueryContext`]. Sort indexes turn that context into a [`SortKeys`]
//! provider, and the [`SortExecutor`] orders the host's candidates with it.
//!
//! # Example
//!
//! ```
//! use geoproximity::config::IndexOptions;
//! use geoproximity::index::ProximityIndex;
//! use geoproximity::models::GeoPoint;
//! use geoproximity::query::{QueryContext, SortExecutor, SortIndex, SortOptions};
//!
//! let index = ProximityIndex::new("geolocation", &IndexOptions::default());
//! index.index_document(1, &GeoPoint::new(51.5074, -0.1278)).unwrap();
//! index.index_document(2, &GeoPoint::new(48.8566, 2.3522)).unwrap();
//!
//! let ctx = QueryContext::from_query(&serde_json::json!({ "center": [48.0, 2.0] })).unwrap();
//! let keys = index.sort_keys(&ctx).unwrap();
//! let result = SortExecutor::sort([1, 2], keys.as_ref(), SortOptions::default()).unwrap();
//! assert_eq!(result.doc_ids(), vec![2, 1]);
//! ```

pub mod context;
pub mod executor;
pub mod sort;

pub use context::{QueryContext, QueryContextBuilder};
pub use executor::{SortExecutor, SortOptions, SortResult, SortStats, SortedHit};
pub use sort::{DistanceKeyMap, SortIndex, SortKeys};
