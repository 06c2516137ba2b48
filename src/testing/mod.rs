//! Testing infrastructure for correctness verification
//!
//! This module provides:
//! - Event capture and history tracking
//! - Invariant checking over captured histories
//! - A fault-injecting store for write-conflict scenarios
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use geoproximity::config::IndexOptions;
//! use geoproximity::index::ProximityIndex;
//! use geoproximity::models::GeoPoint;
//! use geoproximity::testing::prelude::*;
//!
//! let index = Arc::new(ProximityIndex::new("geolocation", &IndexOptions::default()));
//! let instrumented = InstrumentedIndex::new(index);
//!
//! instrumented.index_document(1, &GeoPoint::new(1.0, 1.0)).unwrap();
//! instrumented.unindex_document(1).unwrap();
//!
//! let violations = instrumented.check_invariants(&default_invariants());
//! assert!(violations.is_empty());
//! ```
//!
//! # Invariants
//!
//! - **EntryTracksLastIndexedValue**: lookups agree with the last indexed value
//! - **ChangeFlagsConsistent**: `changed` is true iff the entry changed
//! - **SortOrderAscending**: hits are in distance order
//! - **RemovedDocumentNotSorted**: sorts never yield unindexed documents

pub mod events;
pub mod faults;
pub mod history;
pub mod instrumented;
pub mod invariants;

pub use events::{Event, OperationId, OperationResult, OperationType, Timestamp};
pub use faults::ConflictingStore;
pub use history::EventLog;
pub use instrumented::InstrumentedIndex;
pub use invariants::{
    check_all_invariants, default_invariants, ChangeFlagsConsistent,
    EntryTracksLastIndexedValue, Invariant, RemovedDocumentNotSorted, SortOrderAscending,
    Violation,
};

/// Prelude for easy imports
pub mod prelude {
    pub use super::events::*;
    pub use super::faults::ConflictingStore;
    pub use super::history::EventLog;
    pub use super::instrumented::InstrumentedIndex;
    pub use super::invariants::{
        check_all_invariants, default_invariants, Invariant, Violation,
    };
}
