//! Distance between places and the "near me" filter.

use crate::model::{Coordinates, Location};

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621_371;

impl Coordinates {
    /// Great-circle (haversine) distance in miles.
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c * MILES_PER_KM
    }
}

/// Locations within `radius_miles` of `origin`, nearest first, with their
/// distance.
pub fn nearby<'a>(
    locations: &'a [Location],
    origin: &Coordinates,
    radius_miles: f64,
) -> Vec<(&'a Location, f64)> {
    let mut found: Vec<_> = locations
        .iter()
        .map(|l| (l, origin.distance_miles(&l.place.coordinates)))
        .filter(|(_, d)| *d <= radius_miles)
        .collect();
    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found
}
