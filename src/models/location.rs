// Location model representing geographic coordinates

use serde::{Deserialize, Serialize};

use crate::models::Miles;
use crate::utils::distance::road_distance;

/// Represents a location as (longitude, latitude) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    /// Creates a new location with the given coordinates
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Approximate road distance in miles to another location
    pub fn distance_to(&self, other: &Location) -> Miles {
        road_distance(self, other)
    }

    /// Whether both coordinates are finite and inside the lon/lat ranges
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Coordinate key rounded to 6 decimals, used to match sites across inputs
    pub fn rounded_key(&self) -> (i64, i64) {
        (
            (self.lon * 1e6).round() as i64,
            (self.lat * 1e6).round() as i64,
        )
    }
}
