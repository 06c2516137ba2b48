use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::Result;

/// Unique document identifier assigned by the host catalog
pub type DocumentId = u64;

/// Degree-valued point exposing latitude/longitude accessors
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Content object handed to the catalog for indexing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub id: DocumentId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CatalogDocument {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Set an attribute, replacing any previous value
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set a location attribute from a point
    pub fn with_location(self, name: impl Into<String>, point: GeoPoint) -> Self {
        let value = serde_json::json!({
            "latitude": point.latitude,
            "longitude": point.longitude,
        });
        self.with_attribute(name, value)
    }

    /// Look up a raw attribute value
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Load a JSON array of documents from a file
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<CatalogDocument>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
