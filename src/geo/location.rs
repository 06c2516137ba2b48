//! Validated locations and the raw-value conversion contract

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::distance::haversine_distance_km;
use crate::models::GeoPoint;

/// Anything exposing degree-valued latitude and longitude
///
/// Returning `None` for either coordinate means the value carries no usable
/// location.
pub trait GeoValue {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;
}

impl GeoValue for GeoPoint {
    fn latitude(&self) -> Option<f64> {
        Some(self.latitude)
    }

    fn longitude(&self) -> Option<f64> {
        Some(self.longitude)
    }
}

/// `(lat, lng)` in degrees
impl GeoValue for (f64, f64) {
    fn latitude(&self) -> Option<f64> {
        Some(self.0)
    }

    fn longitude(&self) -> Option<f64> {
        Some(self.1)
    }
}

impl<T: GeoValue> GeoValue for Option<T> {
    fn latitude(&self) -> Option<f64> {
        self.as_ref().and_then(GeoValue::latitude)
    }

    fn longitude(&self) -> Option<f64> {
        self.as_ref().and_then(GeoValue::longitude)
    }
}

impl<T: GeoValue + ?Sized> GeoValue for &T {
    fn latitude(&self) -> Option<f64> {
        (**self).latitude()
    }

    fn longitude(&self) -> Option<f64> {
        (**self).longitude()
    }
}

/// JSON objects with numeric `latitude` and `longitude` members
impl GeoValue for Value {
    fn latitude(&self) -> Option<f64> {
        self.get("latitude").and_then(Value::as_f64)
    }

    fn longitude(&self) -> Option<f64> {
        self.get("longitude").and_then(Value::as_f64)
    }
}

/// A validated point stored in radians
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub lat_rad: f64,
    pub lng_rad: f64,
}

impl LocationRecord {
    /// Convert a raw value, or `None` when it has no usable location
    ///
    /// Both coordinates must be present, finite, and within
    /// [-90, 90] / [-180, 180] degrees.
    pub fn from_value<V: GeoValue + ?Sized>(value: &V) -> Option<Self> {
        let lat = value.latitude()?;
        let lng = value.longitude()?;
        Self::from_degrees(lat, lng)
    }

    /// Build from degrees, validating the range
    pub fn from_degrees(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self {
            lat_rad: lat.to_radians(),
            lng_rad: lng.to_radians(),
        })
    }

    pub fn as_radians(&self) -> (f64, f64) {
        (self.lat_rad, self.lng_rad)
    }

    pub fn to_degrees(&self) -> (f64, f64) {
        (self.lat_rad.to_degrees(), self.lng_rad.to_degrees())
    }

    /// Great-circle distance to another record in kilometers
    pub fn distance_km(&self, other: &LocationRecord) -> f64 {
        haversine_distance_km(self.as_radians(), other.as_radians())
    }
}

/// Per-query reference point, in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterPoint {
    pub lat: f64,
    pub lng: f64,
}

impl CenterPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Radian form used for distance computation
    pub fn to_record(&self) -> LocationRecord {
        LocationRecord {
            lat_rad: self.lat.to_radians(),
            lng_rad: self.lng.to_radians(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_radians() {
        let record = LocationRecord::from_value(&GeoPoint::new(90.0, -180.0)).unwrap();
        assert!((record.lat_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((record.lng_rad + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_conversion_failures_yield_none() {
        assert!(LocationRecord::from_value(&None::<GeoPoint>).is_none());
        assert!(LocationRecord::from_value(&Value::Null).is_none());
        assert!(LocationRecord::from_value(&serde_json::json!({ "latitude": 1.0 })).is_none());
        assert!(LocationRecord::from_value(&serde_json::json!({
            "latitude": "north",
            "longitude": 2.0
        }))
        .is_none());
        assert!(LocationRecord::from_value(&(f64::NAN, 0.0)).is_none());
        assert!(LocationRecord::from_value(&(91.0, 0.0)).is_none());
        assert!(LocationRecord::from_value(&(0.0, 180.5)).is_none());
    }

    #[test]
    fn test_json_value_conversion() {
        let value = serde_json::json!({ "latitude": 48.8566, "longitude": 2.3522 });
        let from_json = LocationRecord::from_value(&value).unwrap();
        let from_point = LocationRecord::from_value(&GeoPoint::new(48.8566, 2.3522)).unwrap();
        assert_eq!(from_json, from_point);
    }

    #[test]
    fn test_record_distance_km() {
        let london = LocationRecord::from_degrees(51.5074, -0.1278).unwrap();
        let paris = LocationRecord::from_degrees(48.8566, 2.3522).unwrap();

        let d = london.distance_km(&paris);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
        assert_eq!(d, paris.distance_km(&london));
        assert!(london.distance_km(&london).abs() < 1e-9);
    }

    #[test]
    fn test_center_point_to_record() {
        let center = CenterPoint::new(39.8283, -98.5795);
        let record = center.to_record();
        let (lat, lng) = record.to_degrees();
        assert!((lat - 39.8283).abs() < 1e-9);
        assert!((lng + 98.5795).abs() < 1e-9);
    }
}
