//! Minimal in-process host for proximity indexes
//!
//! The catalog creates indexes from `(identifier, options)`, feeds them
//! documents, and runs sorted queries through the [`SortIndex`] capability.
//! It does no matching of its own: callers pass the candidate ids.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{CatalogSettings, IndexOptions};
use crate::index::ProximityIndex;
use crate::metrics::IndexMetrics;
use crate::models::{CatalogDocument, DocumentId};
use crate::query::{QueryContext, SortExecutor, SortIndex, SortOptions, SortResult};
use crate::{ProximityError, Result};

/// Named collection of proximity indexes
#[derive(Default)]
pub struct Catalog {
    settings: CatalogSettings,
    indexes: BTreeMap<String, ProximityIndex>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CatalogSettings) -> Self {
        Self {
            settings,
            indexes: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Create a proximity index named `identifier`
    pub fn add_index(&mut self, identifier: &str, options: IndexOptions) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(ProximityError::InvalidRequest(
                "index identifier must not be empty".to_string(),
            ));
        }
        if self.indexes.contains_key(identifier) {
            return Err(ProximityError::InvalidRequest(format!(
                "index {} already exists",
                identifier
            )));
        }

        let mut index = ProximityIndex::new(identifier, &options);
        if self.settings.enable_metrics {
            index = index.with_metrics(Arc::new(IndexMetrics::new()?));
        }

        info!(
            index = identifier,
            sources = ?index.source_names(),
            "created {}",
            index.meta_type()
        );
        self.indexes.insert(identifier.to_string(), index);
        Ok(())
    }

    /// Create an index from the JSON "extra" options structure
    pub fn add_index_json(&mut self, identifier: &str, extra: &serde_json::Value) -> Result<()> {
        let options = IndexOptions::from_json(extra)?;
        self.add_index(identifier, options)
    }

    /// Look up an index by name
    pub fn index(&self, name: &str) -> Option<&ProximityIndex> {
        self.indexes.get(name)
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.keys().map(String::as_str).collect()
    }

    /// Index a document in every index; returns how many changed
    pub fn catalog_object(&self, doc: &CatalogDocument) -> Result<usize> {
        let mut changed = 0;
        for index in self.indexes.values() {
            if index.index_object(doc)? {
                changed += 1;
            }
        }
        debug!(doc_id = doc.id, changed, "cataloged document");
        Ok(changed)
    }

    /// Remove a document from every index; returns how many changed
    pub fn uncatalog_object(&self, doc_id: DocumentId) -> Result<usize> {
        let mut changed = 0;
        for index in self.indexes.values() {
            if index.unindex_document(doc_id)? {
                changed += 1;
            }
        }
        debug!(doc_id, changed, "uncataloged document");
        Ok(changed)
    }

    /// Order `candidates` by the named sort index
    ///
    /// Falls back to the catalog's default limit when `options` sets none.
    pub fn sort_by<I>(
        &self,
        index_name: &str,
        candidates: I,
        ctx: &QueryContext,
        options: SortOptions,
    ) -> Result<SortResult>
    where
        I: IntoIterator<Item = DocumentId>,
    {
        let index: &dyn SortIndex = self
            .indexes
            .get(index_name)
            .ok_or_else(|| ProximityError::UnknownIndex(index_name.to_string()))?;

        let options = SortOptions {
            limit: options.limit.or(self.settings.default_sort_limit),
            ..options
        };

        let keys = index.sort_keys(ctx)?;
        let result = SortExecutor::sort(candidates, keys.as_ref(), options)?;

        if let Some(metrics) = index.metrics() {
            metrics.record_sort(result.stats.execution_time_us as f64 / 1_000_000.0);
        }
        debug!(
            index = index.name(),
            candidates = result.total_candidates,
            hits = result.hits.len(),
            "sorted by proximity"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn create_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_index("geolocation", IndexOptions::new("geolocation"))
            .unwrap();
        catalog
    }

    #[test]
    fn test_add_index_rejects_duplicates() {
        let mut catalog = create_catalog();
        let err = catalog
            .add_index("geolocation", IndexOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProximityError::InvalidRequest(_)));

        let err = catalog.add_index(" ", IndexOptions::default()).unwrap_err();
        assert!(matches!(err, ProximityError::InvalidRequest(_)));
    }

    #[test]
    fn test_add_index_json() {
        let mut catalog = Catalog::new();
        catalog
            .add_index_json("near", &serde_json::json!({ "indexed_attrs": "location" }))
            .unwrap();

        let index = catalog.index("near").unwrap();
        assert_eq!(index.source_names(), &["location".to_string()]);
        assert_eq!(catalog.index_names(), vec!["near"]);
    }

    #[test]
    fn test_catalog_and_uncatalog() {
        let catalog = create_catalog();
        let doc = CatalogDocument::new(1).with_location("geolocation", GeoPoint::new(1.0, 1.0));

        assert_eq!(catalog.catalog_object(&doc).unwrap(), 1);
        assert_eq!(catalog.catalog_object(&doc).unwrap(), 0);
        assert_eq!(catalog.uncatalog_object(1).unwrap(), 1);
        assert_eq!(catalog.uncatalog_object(1).unwrap(), 0);
    }

    #[test]
    fn test_sort_by_unknown_index() {
        let catalog = create_catalog();
        let err = catalog
            .sort_by("nope", vec![1], &QueryContext::new(), SortOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProximityError::UnknownIndex(ref name) if name == "nope"));
    }

    #[test]
    fn test_sort_by_missing_center() {
        let catalog = create_catalog();
        let err = catalog
            .sort_by("geolocation", vec![1], &QueryContext::new(), SortOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("geolocation"));

        let metrics = catalog.index("geolocation").unwrap().metrics().unwrap();
        assert_eq!(metrics.missing_center_errors.get(), 1.0);
    }

    #[test]
    fn test_sort_by_default_limit() {
        let mut catalog = Catalog::with_settings(CatalogSettings::default().with_default_sort_limit(1));
        catalog
            .add_index("geolocation", IndexOptions::default())
            .unwrap();
        for (id, lat) in [(1, 10.0), (2, 1.0), (3, 5.0)] {
            let doc = CatalogDocument::new(id).with_location("geolocation", GeoPoint::new(lat, 0.0));
            catalog.catalog_object(&doc).unwrap();
        }

        let result = catalog
            .sort_by(
                "geolocation",
                vec![1, 2, 3],
                &QueryContext::with_center(0.0, 0.0),
                SortOptions::default(),
            )
            .unwrap();
        assert_eq!(result.doc_ids(), vec![2]);
        assert_eq!(result.total_candidates, 3);
    }
}
