//! Instrumented proximity index wrapper for testing
//!
//! Wraps a [`ProximityIndex`] and captures every operation into an
//! [`EventLog`] for invariant verification.

use std::sync::Arc;

use crate::geo::{GeoValue, LocationRecord};
use crate::index::{LocationStore, MemoryStore, ProximityIndex};
use crate::models::DocumentId;
use crate::query::{QueryContext, SortExecutor, SortIndex, SortOptions, SortResult};
use crate::testing::prelude::*;
use crate::{ProximityError, Result};

/// Wrapper around ProximityIndex that captures events for testing
pub struct InstrumentedIndex<S: LocationStore = MemoryStore> {
    inner: Arc<ProximityIndex<S>>,
    event_log: EventLog,
}

impl<S: LocationStore> InstrumentedIndex<S> {
    pub fn new(inner: Arc<ProximityIndex<S>>) -> Self {
        Self {
            inner,
            event_log: EventLog::new(),
        }
    }

    /// Create with a pre-existing event log (for continuation testing)
    pub fn with_event_log(inner: Arc<ProximityIndex<S>>, event_log: EventLog) -> Self {
        Self { inner, event_log }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn inner(&self) -> &ProximityIndex<S> {
        &self.inner
    }

    /// Index a value with event capture
    pub fn index_document<V: GeoValue + ?Sized>(
        &self,
        doc_id: DocumentId,
        value: &V,
    ) -> Result<bool> {
        let op_id = self.event_log.record_invoke(OperationType::Index {
            doc_id,
            location: LocationRecord::from_value(value),
        });

        let result = self.inner.index_document(doc_id, value);
        self.complete(op_id, &result, |&changed| OperationResult::Indexed {
            doc_id,
            changed,
        });
        result
    }

    /// Unindex a document with event capture
    pub fn unindex_document(&self, doc_id: DocumentId) -> Result<bool> {
        let op_id = self
            .event_log
            .record_invoke(OperationType::Unindex { doc_id });

        let result = self.inner.unindex_document(doc_id);
        self.complete(op_id, &result, |&changed| OperationResult::Unindexed {
            doc_id,
            changed,
        });
        result
    }

    /// Read a stored location with event capture
    pub fn get_location(&self, doc_id: DocumentId) -> Result<Option<LocationRecord>> {
        let op_id = self.event_log.record_invoke(OperationType::Lookup { doc_id });

        let result = self.inner.get_location(doc_id);
        self.complete(op_id, &result, |location| OperationResult::Located {
            doc_id,
            found: location.is_some(),
        });
        result
    }

    /// Sort candidates by distance with event capture
    pub fn sort(
        &self,
        candidates: &[DocumentId],
        ctx: &QueryContext,
        options: SortOptions,
    ) -> Result<SortResult> {
        let op_id = self.event_log.record_invoke(OperationType::Sort {
            center: ctx.center(),
            candidates: candidates.to_vec(),
            reverse: options.reverse,
        });

        let result = self
            .inner
            .sort_keys(ctx)
            .and_then(|keys| SortExecutor::sort(candidates.iter().copied(), keys.as_ref(), options));
        self.complete(op_id, &result, |sorted| OperationResult::Sorted {
            hits: sorted.hits.iter().map(|h| (h.doc_id, h.key)).collect(),
        });
        result
    }

    /// Check all invariants against the captured history
    pub fn check_invariants(&self, invariants: &[Box<dyn Invariant>]) -> Vec<Violation> {
        check_all_invariants(&self.event_log, invariants)
    }

    fn complete<T>(
        &self,
        op_id: OperationId,
        result: &std::result::Result<T, ProximityError>,
        on_success: impl FnOnce(&T) -> OperationResult,
    ) {
        let outcome = match result {
            Ok(value) => on_success(value),
            Err(e) => OperationResult::Error {
                message: e.to_string(),
                retriable: e.is_retriable(),
            },
        };
        self.event_log.record_return(op_id, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexOptions;
    use crate::models::GeoPoint;

    #[test]
    fn test_instrumented_operations_are_captured() {
        let index = Arc::new(ProximityIndex::new("geolocation", &IndexOptions::default()));
        let instrumented = InstrumentedIndex::new(index);

        instrumented
            .index_document(1, &GeoPoint::new(1.0, 1.0))
            .unwrap();
        instrumented
            .index_document(2, &GeoPoint::new(2.0, 2.0))
            .unwrap();
        instrumented.get_location(1).unwrap();
        instrumented
            .sort(&[1, 2], &QueryContext::with_center(0.0, 0.0), SortOptions::default())
            .unwrap();
        instrumented.unindex_document(1).unwrap();

        let log = instrumented.event_log();
        assert_eq!(log.len(), 5);
        assert!(log.pending_events().is_empty());
        assert!(instrumented.check_invariants(&default_invariants()).is_empty());
    }

    #[test]
    fn test_failed_sort_is_recorded_as_error() {
        let index = Arc::new(ProximityIndex::new("geolocation", &IndexOptions::default()));
        let instrumented = InstrumentedIndex::new(index);

        let err = instrumented
            .sort(&[1], &QueryContext::new(), SortOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProximityError::MissingCenter { .. }));

        let events = instrumented.event_log().sort_operations();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
    }
}
