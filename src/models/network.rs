// Network configuration produced for a single facility count

use serde::{Deserialize, Serialize};

use crate::models::{Cost, FacilityId, Location, Miles, Weight};

/// An open warehouse in a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Index into the configuration's facility list
    pub id: FacilityId,

    pub location: Location,

    /// Total demand (lbs) assigned to this warehouse
    pub demand: Weight,

    /// Mandated by the caller, never relocated
    pub is_fixed: bool,

    /// Site specific cost per area unit, when the site came with one
    pub cost_per_area: Option<f64>,
}

/// Assignment of one demand point to its serving warehouse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Position of the demand point in the scenario's demand list
    pub demand_index: usize,
    pub facility_id: FacilityId,
    pub distance: Miles,
    pub location: Location,
    pub weight: Weight,
}

/// Upstream flow from a supply point or RDC into a warehouse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub origin: Location,
    pub facility_id: FacilityId,
    pub distance: Miles,
    pub weight: Weight,
}

/// Cost components of a configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: Cost,
    pub outbound: Cost,
    pub inbound: Cost,
    pub transfer: Cost,
    pub facility: Cost,
}

impl CostBreakdown {
    /// Creates a breakdown, the total is always the sum of the four parts
    pub fn new(outbound: Cost, inbound: Cost, transfer: Cost, facility: Cost) -> Self {
        Self {
            total: outbound + inbound + transfer + facility,
            outbound,
            inbound,
            transfer,
            facility,
        }
    }
}

/// One evaluated network design for a given facility count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfiguration {
    /// Facility count asked for by the search
    pub requested_k: usize,

    /// Facility count actually evaluated
    pub k: usize,

    pub facilities: Vec<Facility>,
    pub assignments: Vec<Assignment>,
    pub inbound_flows: Vec<Flow>,
    pub transfer_flows: Vec<Flow>,
    pub costs: CostBreakdown,
}

impl NetworkConfiguration {
    pub fn total_cost(&self) -> Cost {
        self.costs.total
    }

    /// Facility coordinates in facility id order
    pub fn facility_locations(&self) -> Vec<Location> {
        self.facilities.iter().map(|f| f.location).collect()
    }

    /// Assigned demand per facility in facility id order
    pub fn demand_per_facility(&self) -> Vec<Weight> {
        self.facilities.iter().map(|f| f.demand).collect()
    }

    /// Total assigned demand over all facilities
    pub fn total_demand(&self) -> Weight {
        self.facilities.iter().map(|f| f.demand).sum()
    }

    /// Whether the evaluated count differs from the requested one
    pub fn is_adjusted(&self) -> bool {
        self.requested_k != self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total() {
        let costs = CostBreakdown::new(10.0, 2.5, 1.5, 100.0);
        assert_eq!(costs.total, 114.0);
        assert_eq!(CostBreakdown::default().total, 0.0);
    }

    #[test]
    fn test_configuration_accessors() {
        let config = NetworkConfiguration {
            requested_k: 3,
            k: 2,
            facilities: vec![
                Facility {
                    id: 0,
                    location: Location::new(1.0, 1.0),
                    demand: 40.0,
                    is_fixed: true,
                    cost_per_area: None,
                },
                Facility {
                    id: 1,
                    location: Location::new(2.0, 2.0),
                    demand: 60.0,
                    is_fixed: false,
                    cost_per_area: Some(3.0),
                },
            ],
            assignments: Vec::new(),
            inbound_flows: Vec::new(),
            transfer_flows: Vec::new(),
            costs: CostBreakdown::default(),
        };

        assert_eq!(config.demand_per_facility(), vec![40.0, 60.0]);
        assert_eq!(config.total_demand(), 100.0);
        assert_eq!(config.facility_locations()[1], Location::new(2.0, 2.0));
        assert!(config.is_adjusted());
    }
}
