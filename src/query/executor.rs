//! Generic sort routine over a candidate set
//!
//! The executor takes candidate ids from the host's matching step and orders
//! them by the keys of a [`SortKeys`] provider.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::models::DocumentId;
use crate::query::sort::SortKeys;
use crate::Result;

/// A candidate with its computed sort key
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortedHit {
    pub doc_id: DocumentId,
    pub key: f64,
}

/// Sort execution statistics
#[derive(Clone, Debug, Default)]
pub struct SortStats {
    /// Number of keys computed
    pub keys_computed: u64,
    /// Execution time in microseconds
    pub execution_time_us: u64,
}

/// Ordered candidates
#[derive(Debug)]
pub struct SortResult {
    /// Hits in sort order, truncated to the limit
    pub hits: Vec<SortedHit>,
    /// Number of candidates considered
    pub total_candidates: u64,
    /// Execution statistics
    pub stats: SortStats,
}

impl SortResult {
    pub fn doc_ids(&self) -> Vec<DocumentId> {
        self.hits.iter().map(|h| h.doc_id).collect()
    }
}

/// How to order candidates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Maximum number of hits to keep
    pub limit: Option<usize>,
    /// Largest keys first
    pub reverse: bool,
}

impl SortOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Heap entry ordered so that the heap top is the worst hit kept so far
#[derive(PartialEq, Eq)]
struct Ranked {
    key: OrderedFloat<f64>,
    doc_id: DocumentId,
    reverse: bool,
}

impl Ranked {
    fn rank(&self, other: &Self) -> Ordering {
        let by_key = if self.reverse {
            other.key.cmp(&self.key)
        } else {
            self.key.cmp(&other.key)
        };
        by_key.then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort executor
pub struct SortExecutor;

impl SortExecutor {
    /// Order `candidates` by their keys.
    ///
    /// Ties break by ascending document id. The first key that cannot be
    /// computed aborts the sort.
    pub fn sort<I>(candidates: I, keys: &dyn SortKeys, options: SortOptions) -> Result<SortResult>
    where
        I: IntoIterator<Item = DocumentId>,
    {
        let start = Instant::now();
        let mut total_candidates = 0u64;

        let hits = match options.limit {
            Some(0) => {
                total_candidates = candidates.into_iter().count() as u64;
                Vec::new()
            }
            Some(limit) => {
                // Max-heap holding the best `limit` hits; top is the worst of them
                let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(limit + 1);
                for doc_id in candidates {
                    total_candidates += 1;
                    let ranked = Ranked {
                        key: OrderedFloat(keys.key(doc_id)?),
                        doc_id,
                        reverse: options.reverse,
                    };
                    if heap.len() < limit {
                        heap.push(ranked);
                    } else if let Some(worst) = heap.peek() {
                        if ranked < *worst {
                            heap.pop();
                            heap.push(ranked);
                        }
                    }
                }
                Self::into_hits(heap.into_sorted_vec())
            }
            None => {
                let mut ranked = Vec::new();
                for doc_id in candidates {
                    total_candidates += 1;
                    ranked.push(Ranked {
                        key: OrderedFloat(keys.key(doc_id)?),
                        doc_id,
                        reverse: options.reverse,
                    });
                }
                ranked.sort_unstable();
                Self::into_hits(ranked)
            }
        };

        let keys_computed = if options.limit == Some(0) {
            0
        } else {
            total_candidates
        };
        let stats = SortStats {
            keys_computed,
            execution_time_us: start.elapsed().as_micros() as u64,
        };

        Ok(SortResult {
            hits,
            total_candidates,
            stats,
        })
    }

    fn into_hits(ranked: Vec<Ranked>) -> Vec<SortedHit> {
        ranked
            .into_iter()
            .map(|r| SortedHit {
                doc_id: r.doc_id,
                key: r.key.into_inner(),
            })
            .collect()
    }
}
