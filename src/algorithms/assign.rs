// Nearest-facility demand partition

use crate::models::{DemandPoint, FacilityId, Location, Miles, Weight};

/// Nearest-facility partition of a demand set
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Serving facility per demand point, parallel to the demand list
    pub facility_of: Vec<FacilityId>,

    /// Road miles from each demand point to its serving facility
    pub distances: Vec<Miles>,
}

impl Partition {
    /// Sum of weight times distance, the locators' objective
    pub fn weighted_distance(&self, demand: &[DemandPoint]) -> f64 {
        demand
            .iter()
            .zip(&self.distances)
            .map(|(point, distance)| point.weight * distance)
            .sum()
    }

    /// Assigned demand per facility for `facility_count` facilities
    pub fn demand_per_facility(&self, demand: &[DemandPoint], facility_count: usize) -> Vec<Weight> {
        let mut totals = vec![0.0; facility_count];
        for (point, &facility) in demand.iter().zip(&self.facility_of) {
            totals[facility] += point.weight;
        }
        totals
    }
}

/// Index and distance of the nearest facility, lowest index wins ties
pub fn nearest_facility(location: &Location, facilities: &[Location]) -> Option<(FacilityId, Miles)> {
    let mut best: Option<(FacilityId, Miles)> = None;

    for (idx, facility) in facilities.iter().enumerate() {
        let distance = location.distance_to(facility);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }

    best
}

/// Assigns every demand point to its nearest facility.
///
/// Returns `None` when there is demand but no facility to serve it.
pub fn assign_nearest(facilities: &[Location], demand: &[DemandPoint]) -> Option<Partition> {
    let mut facility_of = Vec::with_capacity(demand.len());
    let mut distances = Vec::with_capacity(demand.len());

    for point in demand {
        let (facility, distance) = nearest_facility(&point.location, facilities)?;
        facility_of.push(facility);
        distances.push(distance);
    }

    Some(Partition {
        facility_of,
        distances,
    })
}
