//! Proximity index: document id -> location, sorted by distance at query time

use std::sync::Arc;

use tracing::{debug, trace};

use super::guard::{guarded_insert, guarded_remove};
use super::store::{LocationStore, MemoryStore};
use crate::config::IndexOptions;
use crate::geo::{GeoValue, LocationRecord};
use crate::metrics::IndexMetrics;
use crate::models::{CatalogDocument, DocumentId};
use crate::query::context::QueryContext;
use crate::query::sort::{DistanceKeyMap, SortIndex, SortKeys};
use crate::Result;

/// Size reported to the host in place of the real entry count.
///
/// The host treats the length of a sort index as the size of its matching
/// scope and skips indexes that report zero or a small value. A proximity
/// index can order any document, so it claims the largest size the host's
/// length interface accepts (`2^31 - 1`).
pub const UNBOUNDED_SIZE: usize = (1 << 31) - 1;

/// Index kind name the host uses to identify proximity indexes
pub const META_TYPE: &str = "ProximityIndex";

/// Query options this index understands
pub const QUERY_OPTIONS: &[&str] = &["center"];

/// Secondary index mapping documents to their location
pub struct ProximityIndex<S: LocationStore = MemoryStore> {
    identifier: String,
    source_names: Vec<String>,
    store: S,
    metrics: Option<Arc<IndexMetrics>>,
}

impl ProximityIndex<MemoryStore> {
    /// Create an index backed by an in-memory store
    pub fn new(identifier: impl Into<String>, options: &IndexOptions) -> Self {
        Self::with_store(identifier, options, MemoryStore::new())
    }
}

impl<S: LocationStore> ProximityIndex<S> {
    /// Create an index over a host-provided store
    pub fn with_store(identifier: impl Into<String>, options: &IndexOptions, store: S) -> Self {
        let identifier = identifier.into();
        let source_names = options.source_names(&identifier);
        Self {
            identifier,
            source_names,
            store,
            metrics: None,
        }
    }

    /// Attach metrics collection
    pub fn with_metrics(mut self, metrics: Arc<IndexMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn meta_type(&self) -> &'static str {
        META_TYPE
    }

    pub fn query_options(&self) -> &'static [&'static str] {
        QUERY_OPTIONS
    }

    /// Attributes read from documents, in lookup order
    pub fn source_names(&self) -> &[String] {
        &self.source_names
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn metrics(&self) -> Option<&IndexMetrics> {
        self.metrics.as_deref()
    }

    /// Index the raw location value for a document.
    ///
    /// Returns whether the stored entry changed. A value without a usable
    /// location removes any previous entry; a value equal to the stored one
    /// is a no-op and performs no write.
    pub fn index_document<V: GeoValue + ?Sized>(
        &self,
        doc_id: DocumentId,
        value: &V,
    ) -> Result<bool> {
        let record = LocationRecord::from_value(value);
        if record.is_none() {
            trace!(index = %self.identifier, doc_id, "value has no usable location");
            if let Some(metrics) = self.metrics() {
                metrics.record_conversion_failure();
            }
        }

        let previous = self.store.get(doc_id)?;
        if record == previous {
            trace!(index = %self.identifier, doc_id, "location unchanged");
            if let Some(metrics) = self.metrics() {
                metrics.record_unchanged();
            }
            return Ok(false);
        }

        match record {
            Some(record) => {
                guarded_insert(&self.store, &self.identifier, doc_id, record, self.metrics())?;
                debug!(index = %self.identifier, doc_id, "location indexed");
                if let Some(metrics) = self.metrics() {
                    metrics.record_indexed();
                }
            }
            None => {
                guarded_remove(&self.store, &self.identifier, doc_id, self.metrics())?;
                debug!(index = %self.identifier, doc_id, "location dropped");
                if let Some(metrics) = self.metrics() {
                    metrics.record_removed();
                }
            }
        }

        self.update_entry_gauge();
        Ok(true)
    }

    /// Re-index a document whose content changed
    pub fn reindex_document<V: GeoValue + ?Sized>(
        &self,
        doc_id: DocumentId,
        value: &V,
    ) -> Result<bool> {
        self.index_document(doc_id, value)
    }

    /// Index a catalog document, reading the first present source attribute
    pub fn index_object(&self, doc: &CatalogDocument) -> Result<bool> {
        let value = self
            .source_names
            .iter()
            .find_map(|name| doc.attribute(name).filter(|v| !v.is_null()));
        self.index_document(doc.id, &value)
    }

    /// Remove a document's entry; a no-op when the document is not indexed
    pub fn remove_document(&self, doc_id: DocumentId) -> Result<bool> {
        if self.store.get(doc_id)?.is_none() {
            trace!(index = %self.identifier, doc_id, "nothing to unindex");
            return Ok(false);
        }

        let removed = guarded_remove(&self.store, &self.identifier, doc_id, self.metrics())?;
        if removed {
            debug!(index = %self.identifier, doc_id, "document unindexed");
            if let Some(metrics) = self.metrics() {
                metrics.record_removed();
            }
            self.update_entry_gauge();
        }
        Ok(removed)
    }

    /// Alias for [`remove_document`](Self::remove_document) matching the host verb
    pub fn unindex_document(&self, doc_id: DocumentId) -> Result<bool> {
        self.remove_document(doc_id)
    }

    /// Stored location for a document
    pub fn get_location(&self, doc_id: DocumentId) -> Result<Option<LocationRecord>> {
        self.store.get(doc_id)
    }

    /// Size reported to the host; always [`UNBOUNDED_SIZE`]
    pub fn reported_size(&self) -> usize {
        UNBOUNDED_SIZE
    }

    /// Actual number of entries, for diagnostics
    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// Document ids with an entry
    pub fn doc_ids(&self) -> Vec<DocumentId> {
        self.store.doc_ids()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.store.clear();
        self.update_entry_gauge();
    }

    /// Key provider bound to this index and the context's center point
    pub fn distance_keys(&self, ctx: &QueryContext) -> Result<DistanceKeyMap<'_>> {
        DistanceKeyMap::new(&self.identifier, &self.store, ctx, self.metrics())
    }

    fn update_entry_gauge(&self) {
        if let Some(metrics) = self.metrics() {
            metrics.set_indexed_entries(self.store.len());
        }
    }
}

impl<S: LocationStore> SortIndex for ProximityIndex<S> {
    fn name(&self) -> &str {
        &self.identifier
    }

    fn sort_keys<'a>(&'a self, ctx: &QueryContext) -> Result<Box<dyn SortKeys + 'a>> {
        Ok(Box::new(self.distance_keys(ctx)?))
    }

    fn metrics(&self) -> Option<&IndexMetrics> {
        self.metrics.as_deref()
    }
}
