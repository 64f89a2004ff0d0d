// Demand and candidate site models

use serde::{Deserialize, Serialize};

use crate::models::{Location, Weight};

/// A customer location with annual demand in pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    /// Geographic location of the demand
    pub location: Location,

    /// Demand weight (lbs), never negative
    pub weight: Weight,
}

impl DemandPoint {
    /// Creates a new demand point
    pub fn new(lon: f64, lat: f64, weight: Weight) -> Self {
        Self {
            location: Location::new(lon, lat),
            weight,
        }
    }
}

/// A possible facility location supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub location: Location,

    /// Site specific cost per area unit, replacing the global rate
    pub cost_per_area: Option<f64>,
}

impl CandidateSite {
    /// Creates a candidate site without a cost override
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            location: Location::new(lon, lat),
            cost_per_area: None,
        }
    }

    /// Creates a candidate site with its own cost per area unit
    pub fn with_cost(lon: f64, lat: f64, cost_per_area: f64) -> Self {
        Self {
            location: Location::new(lon, lat),
            cost_per_area: Some(cost_per_area),
        }
    }
}
