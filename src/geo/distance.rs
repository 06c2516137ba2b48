//! Distance functions between latitude/longitude pairs
//!
//! Only [`haversine_distance_km`] is used on the sort path. The Euclidean
//! variants are kept for callers that still compare raw coordinates.

/// Mean Earth radius in kilometers (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Planar Euclidean distance between two `(lat, lng)` pairs.
///
/// Works on whatever unit the inputs are in and ignores the curvature of the
/// Earth entirely.
pub fn euclidean_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lng1) = a;
    let (lat2, lng2) = b;

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    (dlat * dlat + dlng * dlng).sqrt()
}

/// Euclidean distance of two degree-valued pairs, measured in radians.
pub fn distance_in_degrees(a: (f64, f64), b: (f64, f64)) -> f64 {
    euclidean_distance(to_radians(a), to_radians(b))
}

/// Great-circle distance in kilometers between two `(lat, lng)` pairs
/// expressed in radians.
///
/// With `y = b.lat - a.lat` and `x = b.lng - a.lng`:
///
/// ```text
/// h = sin²(y/2) + cos(a.lat)·cos(b.lat)·sin²(x/2)
/// d = 2·R·asin(√h)
/// ```
///
/// Points are treated as lying on a sphere of radius [`EARTH_RADIUS_KM`].
/// There is no special handling of the antimeridian or the poles beyond what
/// the trigonometric identities give; error against the ellipsoid stays
/// within about 0.5%.
///
/// # Example
///
/// ```
/// use geoproximity::geo::{haversine_distance_km, EARTH_RADIUS_KM};
///
/// let origin = (0.0, 0.0);
/// let antipode = (0.0, std::f64::consts::PI);
/// let d = haversine_distance_km(origin, antipode);
/// assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
/// ```
pub fn haversine_distance_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lng1) = a;
    let (lat2, lng2) = b;

    let y = lat2 - lat1;
    let x = lng2 - lng1;

    let h = (y * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (x * 0.5).sin().powi(2);

    // rounding can push h a hair past 1.0 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance in kilometers between two degree-valued pairs.
pub fn distance_in_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    haversine_distance_km(to_radians(a), to_radians(b))
}

fn to_radians((lat, lng): (f64, f64)) -> (f64, f64) {
    (lat.to_radians(), lng.to_radians())
}
