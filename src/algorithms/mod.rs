pub mod assign;
pub mod cost;
pub mod kmeans;
pub mod search;
pub mod swap;
pub mod transfer;

// Common algorithm traits
use crate::error::Result;
use crate::models::{DemandPoint, Location};

use self::assign::Partition;

/// A chosen facility position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub location: Location,
    pub is_fixed: bool,
    pub cost_per_area: Option<f64>,
}

impl Site {
    pub fn fixed(location: Location) -> Self {
        Self {
            location,
            is_fixed: true,
            cost_per_area: None,
        }
    }

    pub fn free(location: Location) -> Self {
        Self {
            location,
            is_fixed: false,
            cost_per_area: None,
        }
    }
}

/// Facility positions for one k together with the demand partition they induce
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Fixed sites first, in caller order, then located sites
    pub sites: Vec<Site>,
    pub partition: Partition,
}

impl Placement {
    pub fn locations(&self) -> Vec<Location> {
        self.sites.iter().map(|s| s.location).collect()
    }

    /// Total weighted assignment distance
    pub fn objective(&self, demand: &[DemandPoint]) -> f64 {
        self.partition.weighted_distance(demand)
    }
}

/// Trait for facility siting strategies
pub trait FacilityLocator: Sync {
    /// Places `k` facilities, `fixed` included, to minimize weighted distance
    fn locate(
        &self,
        demand: &[DemandPoint],
        fixed: &[Location],
        k: usize,
        seed: u64,
    ) -> Result<Placement>;

    /// Largest facility count this locator can place, if bounded
    fn max_facilities(&self, fixed_count: usize) -> Option<usize>;
}
