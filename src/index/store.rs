//! Storage seam between the index and the host's transactional storage

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::geo::LocationRecord;
use crate::models::DocumentId;
use crate::Result;

/// Host-provided mapping from document id to location
///
/// Each call must be atomic for its key. Conflicting concurrent writers are
/// reported as [`ProximityError::WriteConflict`](crate::ProximityError::WriteConflict);
/// retry policy belongs to the host.
pub trait LocationStore: Send + Sync {
    /// Read the entry for a document
    fn get(&self, doc_id: DocumentId) -> Result<Option<LocationRecord>>;

    /// Insert or overwrite the entry for a document
    fn insert(&self, doc_id: DocumentId, record: LocationRecord) -> Result<()>;

    /// Remove the entry for a document, returning whether one existed
    fn remove(&self, doc_id: DocumentId) -> Result<bool>;

    /// Number of stored entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All document ids with an entry, in no particular order
    fn doc_ids(&self) -> Vec<DocumentId>;

    /// Drop every entry
    fn clear(&self);
}

/// In-memory store used when the host does not supply its own
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<DocumentId, LocationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryStore {
    fn get(&self, doc_id: DocumentId) -> Result<Option<LocationRecord>> {
        Ok(self.entries.read().get(&doc_id).copied())
    }

    fn insert(&self, doc_id: DocumentId, record: LocationRecord) -> Result<()> {
        self.entries.write().insert(doc_id, record);
        Ok(())
    }

    fn remove(&self, doc_id: DocumentId) -> Result<bool> {
        Ok(self.entries.write().remove(&doc_id).is_some())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn doc_ids(&self) -> Vec<DocumentId> {
        self.entries.read().keys().copied().collect()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let record = LocationRecord::from_degrees(10.0, 20.0).unwrap();
        store.insert(1, record).unwrap();
        assert_eq!(store.get(1).unwrap(), Some(record));
        assert_eq!(store.len(), 1);
        assert_eq!(store.doc_ids(), vec![1]);

        assert!(store.remove(1).unwrap());
        assert!(!store.remove(1).unwrap());
        assert!(store.get(1).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryStore::new();
        for id in 0..5 {
            store
                .insert(id, LocationRecord::from_degrees(id as f64, 0.0).unwrap())
                .unwrap();
        }
        assert_eq!(store.len(), 5);
        store.clear();
        assert!(store.is_empty());
    }
}
