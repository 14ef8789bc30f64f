//! Great-circle distance.

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance in kilometers between two `(lat, lng)` points in degrees.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::great_circle_km;
///
/// // Paris to Lyon is roughly 392 km as the crow flies.
/// let d = great_circle_km((48.8566, 2.3522), (45.7640, 4.8357));
/// assert!((d - 392.0).abs() < 2.0);
/// ```
pub fn great_circle_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lng2) = (to.0.to_radians(), to.1.to_radians());

    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
