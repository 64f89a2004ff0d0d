// Annual cost of a configured network

use crate::config::CostParameters;
use crate::models::{Assignment, Cost, CostBreakdown, Facility, Flow, Weight};

/// Converts flows and open facilities into cost components
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    params: &'a CostParameters,
}

impl<'a> CostModel<'a> {
    pub fn new(params: &'a CostParameters) -> Self {
        Self { params }
    }

    /// Σ weight × distance × outbound rate
    pub fn outbound_cost(&self, assignments: &[Assignment]) -> Cost {
        assignments
            .iter()
            .map(|a| a.weight * a.distance * self.params.outbound_rate)
            .sum()
    }

    /// Σ flow weight × distance × inbound rate
    pub fn inbound_cost(&self, flows: &[Flow]) -> Cost {
        flows
            .iter()
            .map(|f| f.weight * f.distance * self.params.inbound_rate)
            .sum()
    }

    /// Σ flow weight × distance × transfer rate
    pub fn transfer_cost(&self, flows: &[Flow]) -> Cost {
        flows
            .iter()
            .map(|f| f.weight * f.distance * self.params.transfer_rate)
            .sum()
    }

    /// Fixed cost plus area cost; a site rate replaces the global cost per area
    pub fn warehouse_cost(&self, facility: &Facility) -> Cost {
        let cost_per_area = facility
            .cost_per_area
            .unwrap_or(self.params.cost_per_area);
        self.params.fixed_cost + facility.demand * self.params.area_per_weight * cost_per_area
    }

    /// Area cost of the RDC tier for the weight each node handles
    pub fn transfer_node_cost(&self, throughput: &[Weight]) -> Cost {
        throughput
            .iter()
            .map(|w| w * self.params.rdc_area_per_weight * self.params.rdc_cost_per_area)
            .sum()
    }

    pub fn breakdown(
        &self,
        facilities: &[Facility],
        assignments: &[Assignment],
        inbound: &[Flow],
        transfer: &[Flow],
        rdc_throughput: &[Weight],
    ) -> CostBreakdown {
        let facility = facilities
            .iter()
            .map(|f| self.warehouse_cost(f))
            .sum::<Cost>()
            + self.transfer_node_cost(rdc_throughput);

        CostBreakdown::new(
            self.outbound_cost(assignments),
            self.inbound_cost(inbound),
            self.transfer_cost(transfer),
            facility,
        )
    }
}
