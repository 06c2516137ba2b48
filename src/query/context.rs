//! Query execution context
//!
//! The `QueryContext` carries per-query values from the query entry point
//! down to sort key construction. Nothing is read from ambient state.

use serde_json::Value;

use crate::geo::CenterPoint;
use crate::{ProximityError, Result};

/// Per-query values handed to sort indexes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryContext {
    /// Reference point for distance sorting, in degrees
    center: Option<CenterPoint>,
}

impl QueryContext {
    /// Context without a center point
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context builder
    pub fn builder() -> QueryContextBuilder {
        QueryContextBuilder::default()
    }

    /// Context centered on `(lat, lng)`
    pub fn with_center(lat: f64, lng: f64) -> Self {
        Self::builder().center(lat, lng).build()
    }

    /// Read query options from a JSON query.
    ///
    /// `center` may be `[lat, lng]` or `{"lat": .., "lng": ..}`. An absent
    /// or null center leaves the context without one.
    pub fn from_query(query: &Value) -> Result<Self> {
        let center = match query.get("center") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_center(value)?),
        };
        Ok(Self { center })
    }

    /// The center point, if the query supplied one
    pub fn center(&self) -> Option<CenterPoint> {
        self.center
    }
}

fn parse_center(value: &Value) -> Result<CenterPoint> {
    let coords = match value {
        Value::Array(items) if items.len() == 2 => (items[0].as_f64(), items[1].as_f64()),
        Value::Object(map) => (
            map.get("lat").and_then(Value::as_f64),
            map.get("lng").and_then(Value::as_f64),
        ),
        _ => (None, None),
    };

    match coords {
        (Some(lat), Some(lng)) => Ok(CenterPoint::new(lat, lng)),
        _ => Err(ProximityError::InvalidQuery(format!(
            "center must be [lat, lng] or {{\"lat\", \"lng\"}}, got {}",
            value
        ))),
    }
}

/// Builder for QueryContext
#[derive(Default)]
pub struct QueryContextBuilder {
    center: Option<CenterPoint>,
}

impl QueryContextBuilder {
    /// Set the center point in degrees
    pub fn center(mut self, lat: f64, lng: f64) -> Self {
        self.center = Some(CenterPoint::new(lat, lng));
        self
    }

    /// Set or clear the center point
    pub fn center_point(mut self, center: Option<CenterPoint>) -> Self {
        self.center = center;
        self
    }

    /// Build the QueryContext
    pub fn build(self) -> QueryContext {
        QueryContext {
            center: self.center,
        }
    }
}
