use serde::{Deserialize, Serialize};

/// Options accepted when a proximity index is created
///
/// Only `indexed_attrs` is interpreted; any other key in the incoming
/// structure is ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Attribute (or comma-separated attributes) supplying the raw location
    #[serde(default)]
    pub indexed_attrs: Option<String>,
}

impl IndexOptions {
    /// Options reading the location from a single attribute
    pub fn new(indexed_attrs: impl Into<String>) -> Self {
        Self {
            indexed_attrs: Some(indexed_attrs.into()),
        }
    }

    /// Parse options from the JSON "extra" structure handed over by the host
    pub fn from_json(extra: &serde_json::Value) -> crate::Result<Self> {
        if extra.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(extra.clone())?)
    }

    /// Source attribute names, falling back to the index identifier
    pub fn source_names(&self, identifier: &str) -> Vec<String> {
        let names: Vec<String> = self
            .indexed_attrs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            vec![identifier.to_string()]
        } else {
            names
        }
    }
}

/// Catalog-wide settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Default number of hits returned by a sorted query (None = all)
    pub default_sort_limit: Option<usize>,
    /// Attach prometheus metrics to newly created indexes
    pub enable_metrics: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_sort_limit: None,
            enable_metrics: true,
        }
    }
}

impl CatalogSettings {
    /// Set the default sort limit
    pub fn with_default_sort_limit(mut self, limit: usize) -> Self {
        self.default_sort_limit = Some(limit);
        self
    }

    /// Enable or disable metrics collection
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.enable_metrics = enabled;
        self
    }
}
