//! Sort index capability and the distance key provider

use tracing::debug;

use crate::geo::LocationRecord;
use crate::index::LocationStore;
use crate::metrics::IndexMetrics;
use crate::models::DocumentId;
use crate::query::context::QueryContext;
use crate::{ProximityError, Result};

/// Per-query mapping from document id to a comparable sort key
pub trait SortKeys {
    /// Sort key for a document; errors when the document cannot be keyed
    fn key(&self, doc_id: DocumentId) -> Result<f64>;
}

/// Index that can order documents for a query
pub trait SortIndex {
    /// Name the index was created under
    fn name(&self) -> &str;

    /// Build the key provider for one query
    fn sort_keys<'a>(&'a self, ctx: &QueryContext) -> Result<Box<dyn SortKeys + 'a>>;

    fn metrics(&self) -> Option<&IndexMetrics> {
        None
    }
}

/// Distance from one query's center to each indexed document, in km
///
/// Borrows the index's store for the duration of the query and never writes
/// to it.
pub struct DistanceKeyMap<'a> {
    index: &'a str,
    store: &'a dyn LocationStore,
    center: LocationRecord,
    metrics: Option<&'a IndexMetrics>,
}

impl<'a> DistanceKeyMap<'a> {
    /// Bind `store` to the center point carried by `ctx`.
    ///
    /// Fails with [`ProximityError::MissingCenter`] when the query supplied
    /// no center; this is a caller error and is never defaulted.
    pub fn new(
        index: &'a str,
        store: &'a dyn LocationStore,
        ctx: &QueryContext,
        metrics: Option<&'a IndexMetrics>,
    ) -> Result<Self> {
        let Some(center) = ctx.center() else {
            if let Some(metrics) = metrics {
                metrics.record_missing_center();
            }
            return Err(ProximityError::MissingCenter {
                index: index.to_string(),
            });
        };

        debug!(index, lat = center.lat, lng = center.lng, "distance keys bound");
        Ok(Self {
            index,
            store,
            center: center.to_record(),
            metrics,
        })
    }

    /// Center point in radians
    pub fn center(&self) -> LocationRecord {
        self.center
    }

    /// Great-circle distance to a document in kilometers
    pub fn distance_to(&self, doc_id: DocumentId) -> Result<f64> {
        let record = self
            .store
            .get(doc_id)?
            .ok_or_else(|| ProximityError::DocumentNotIndexed {
                index: self.index.to_string(),
                doc_id,
            })?;

        if let Some(metrics) = self.metrics {
            metrics.record_sort_key_lookup();
        }
        Ok(self.center.distance_km(&record))
    }
}

impl SortKeys for DistanceKeyMap<'_> {
    fn key(&self, doc_id: DocumentId) -> Result<f64> {
        self.distance_to(doc_id)
    }
}
