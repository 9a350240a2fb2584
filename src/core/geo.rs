//! Great-circle distance and perimeter containment.

use crate::models::location::LatLng;

/// Mean equatorial radius used by the mobile clients' distance helper,
/// so server and client agree on borderline points.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Haversine distance in meters.
///
/// Symmetric by construction: every term depends only on absolute
/// differences or on commutative products of the two endpoints.
pub fn distance_meters(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (a.latitude - b.latitude).abs().to_radians();
    let d_lambda = (a.longitude - b.longitude).abs().to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // rounding can push h marginally above 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// True when `point` lies within `radius_meters` of `center`.
///
/// Fails closed: non-finite input or a non-positive radius is never inside.
pub fn is_within(point: LatLng, center: LatLng, radius_meters: f64) -> bool {
    let finite = [
        point.latitude,
        point.longitude,
        center.latitude,
        center.longitude,
        radius_meters,
    ]
    .iter()
    .all(|v| v.is_finite());

    if !finite || radius_meters <= 0.0 {
        return false;
    }

    let d = distance_meters(point, center);
    d.is_finite() && d <= radius_meters
}
