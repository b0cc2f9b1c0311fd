//! Great-circle distance on a spherical Earth.

use geo::Coord;

/// Mean Earth radius used by every distance in the engine.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Return the haversine distance in kilometres between two WGS84 points.
///
/// Coordinates follow the `geo` convention of `x = longitude` and
/// `y = latitude`, both in degrees. The function is total over finite
/// inputs.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use smartpoi_core::haversine_km;
///
/// let a = Coord { x: 77.5, y: 12.9 };
/// assert_eq!(haversine_km(a, a), 0.0);
/// ```
#[must_use]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.y.to_radians().cos() * b.y.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `h` marginally above one for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
