//! Geographic primitives: distance functions and validated locations

pub mod distance;
pub mod location;

pub use distance::{
    distance_in_degrees, distance_in_km, euclidean_distance, haversine_distance_km,
    EARTH_RADIUS_KM,
};
pub use location::{CenterPoint, GeoValue, LocationRecord};
