// Distance calculation utilities

use geo::{HaversineDistance, Point};

use crate::models::{Location, Miles};

/// Multiplier turning great-circle miles into approximate road miles
pub const ROAD_FACTOR: f64 = 1.17;

const METERS_PER_MILE: f64 = 1609.344;

/// Great-circle distance in miles between two lon/lat coordinates
pub fn haversine_miles(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Miles {
    let from = Point::new(lon1, lat1);
    let to = Point::new(lon2, lat2);
    from.haversine_distance(&to) / METERS_PER_MILE
}

/// Approximate driving distance in miles between two lon/lat coordinates
pub fn distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Miles {
    haversine_miles(lon1, lat1, lon2, lat2) * ROAD_FACTOR
}

/// Approximate driving distance in miles between two locations
pub fn road_distance(from: &Location, to: &Location) -> Miles {
    distance(from.lon, from.lat, to.lon, to.lat)
}
