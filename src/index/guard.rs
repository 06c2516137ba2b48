//! Write-conflict contract for index mutations
//!
//! Mutations run inside the host's optimistic transaction. Nothing here
//! retries or locks: a conflict reported by the store is logged, counted and
//! handed back untouched so the host can redo the whole logical operation.
//! Removal in particular must never swallow a conflict, or the mapping would
//! silently drift from the documents it describes.

use tracing::warn;

use super::store::LocationStore;
use crate::geo::LocationRecord;
use crate::metrics::IndexMetrics;
use crate::models::DocumentId;
use crate::{ProximityError, Result};

/// Insert or overwrite an entry, surfacing conflicts unmodified
pub fn guarded_insert(
    store: &dyn LocationStore,
    index: &str,
    doc_id: DocumentId,
    record: LocationRecord,
    metrics: Option<&IndexMetrics>,
) -> Result<()> {
    store
        .insert(doc_id, record)
        .map_err(|e| surface_conflict(e, index, doc_id, "insert", metrics))
}

/// Remove an entry, surfacing conflicts unmodified
pub fn guarded_remove(
    store: &dyn LocationStore,
    index: &str,
    doc_id: DocumentId,
    metrics: Option<&IndexMetrics>,
) -> Result<bool> {
    store
        .remove(doc_id)
        .map_err(|e| surface_conflict(e, index, doc_id, "remove", metrics))
}

fn surface_conflict(
    err: ProximityError,
    index: &str,
    doc_id: DocumentId,
    op: &str,
    metrics: Option<&IndexMetrics>,
) -> ProximityError {
    if err.is_retriable() {
        warn!(index, doc_id, op, error = %err, "write conflict during index mutation");
        if let Some(metrics) = metrics {
            metrics.record_write_conflict();
        }
    }
    err
}
