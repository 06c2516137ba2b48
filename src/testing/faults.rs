//! Fault injection for storage writes

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::geo::LocationRecord;
use crate::index::LocationStore;
use crate::models::DocumentId;
use crate::{ProximityError, Result};

/// Store wrapper that fails a configurable number of upcoming writes with
/// a write conflict, the way a contended transactional store would.
///
/// Reads always go through.
pub struct ConflictingStore<S: LocationStore> {
    inner: S,
    failing_inserts: AtomicUsize,
    failing_removes: AtomicUsize,
}

impl<S: LocationStore> ConflictingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing_inserts: AtomicUsize::new(0),
            failing_removes: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` inserts
    pub fn fail_next_inserts(&self, n: usize) {
        self.failing_inserts.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` removes
    pub fn fail_next_removes(&self, n: usize) {
        self.failing_removes.store(n, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl<S: LocationStore> LocationStore for ConflictingStore<S> {
    fn get(&self, doc_id: DocumentId) -> Result<Option<LocationRecord>> {
        self.inner.get(doc_id)
    }

    fn insert(&self, doc_id: DocumentId, record: LocationRecord) -> Result<()> {
        if Self::take(&self.failing_inserts) {
            return Err(ProximityError::conflict(doc_id, "injected insert conflict"));
        }
        self.inner.insert(doc_id, record)
    }

    fn remove(&self, doc_id: DocumentId) -> Result<bool> {
        if Self::take(&self.failing_removes) {
            return Err(ProximityError::conflict(doc_id, "injected remove conflict"));
        }
        self.inner.remove(doc_id)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn doc_ids(&self) -> Vec<DocumentId> {
        self.inner.doc_ids()
    }

    fn clear(&self) {
        self.inner.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryStore;

    #[test]
    fn test_fails_only_requested_writes() {
        let store = ConflictingStore::new(MemoryStore::new());
        let record = LocationRecord::from_degrees(1.0, 1.0).unwrap();

        store.fail_next_inserts(2);
        assert!(store.insert(1, record).unwrap_err().is_retriable());
        assert!(store.insert(1, record).is_err());
        assert!(store.insert(1, record).is_ok());
        assert_eq!(store.get(1).unwrap(), Some(record));

        store.fail_next_removes(1);
        assert!(store.remove(1).is_err());
        assert!(store.remove(1).unwrap());
        assert!(store.inner().is_empty());
    }
}
