use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

/// Prometheus metrics for a proximity index
#[derive(Clone)]
pub struct IndexMetrics {
    // Counters
    pub documents_indexed: Counter,
    pub documents_removed: Counter,
    pub documents_unchanged: Counter,
    pub conversion_failures: Counter,
    pub write_conflicts: Counter,
    pub missing_center_errors: Counter,
    pub sort_key_lookups: Counter,

    // Gauges
    pub indexed_entries: Gauge,

    // Histograms
    pub sort_latency: Histogram,

    registry: Arc<Registry>,
}

impl IndexMetrics {
    /// Create a new IndexMetrics instance with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_indexed = Counter::with_opts(Opts::new(
            "geoproximity_documents_indexed_total",
            "Documents whose location was inserted or changed",
        ))?;
        registry.register(Box::new(documents_indexed.clone()))?;

        let documents_removed = Counter::with_opts(Opts::new(
            "geoproximity_documents_removed_total",
            "Documents whose location entry was removed",
        ))?;
        registry.register(Box::new(documents_removed.clone()))?;

        let documents_unchanged = Counter::with_opts(Opts::new(
            "geoproximity_documents_unchanged_total",
            "Index calls that left the entry untouched",
        ))?;
        registry.register(Box::new(documents_unchanged.clone()))?;

        let conversion_failures = Counter::with_opts(Opts::new(
            "geoproximity_conversion_failures_total",
            "Raw values without a usable latitude/longitude",
        ))?;
        registry.register(Box::new(conversion_failures.clone()))?;

        let write_conflicts = Counter::with_opts(Opts::new(
            "geoproximity_write_conflicts_total",
            "Host write conflicts surfaced during index mutation",
        ))?;
        registry.register(Box::new(write_conflicts.clone()))?;

        let missing_center_errors = Counter::with_opts(Opts::new(
            "geoproximity_missing_center_errors_total",
            "Sorts requested without a center point",
        ))?;
        registry.register(Box::new(missing_center_errors.clone()))?;

        let sort_key_lookups = Counter::with_opts(Opts::new(
            "geoproximity_sort_key_lookups_total",
            "Distances computed for sort keys",
        ))?;
        registry.register(Box::new(sort_key_lookups.clone()))?;

        let indexed_entries = Gauge::with_opts(Opts::new(
            "geoproximity_indexed_entries",
            "Actual number of location entries held by the index",
        ))?;
        registry.register(Box::new(indexed_entries.clone()))?;

        let sort_latency = Histogram::with_opts(
            HistogramOpts::new("geoproximity_sort_latency_seconds", "Distance sort latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(sort_latency.clone()))?;

        Ok(Self {
            documents_indexed,
            documents_removed,
            documents_unchanged,
            conversion_failures,
            write_conflicts,
            missing_center_errors,
            sort_key_lookups,
            indexed_entries,
            sort_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn record_indexed(&self) {
        self.documents_indexed.inc();
    }

    pub fn record_removed(&self) {
        self.documents_removed.inc();
    }

    pub fn record_unchanged(&self) {
        self.documents_unchanged.inc();
    }

    pub fn record_conversion_failure(&self) {
        self.conversion_failures.inc();
    }

    pub fn record_write_conflict(&self) {
        self.write_conflicts.inc();
    }

    pub fn record_missing_center(&self) {
        self.missing_center_errors.inc();
    }

    pub fn record_sort_key_lookup(&self) {
        self.sort_key_lookups.inc();
    }

    /// Record a completed sort
    pub fn record_sort(&self, duration_secs: f64) {
        self.sort_latency.observe(duration_secs);
    }

    pub fn set_indexed_entries(&self, count: usize) {
        self.indexed_entries.set(count as f64);
    }
}
