//! Great-circle distance
//!
//! Pure geometry. Callers are responsible for checking
//! [`Coordinates::is_valid`] first; nothing here re-validates.

use crate::constants::geo::{EARTH_RADIUS_MILES, METERS_PER_MILE};
use crate::coord::Coordinates;

/// Calculate the distance between two points in miles (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in miles, never negative
pub fn distance_miles(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Convert miles to meters (for drawing coverage circles)
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}
