// Inbound supply and RDC transfer flows on top of the outbound network

use crate::models::{Facility, Flow, SupplyPoint, TransferNode, Weight};

/// Upstream tiers feeding the open warehouses
#[derive(Debug, Clone, Copy)]
pub struct TransferNetwork<'a> {
    supply_points: &'a [SupplyPoint],
    nodes: &'a [TransferNode],
}

impl<'a> TransferNetwork<'a> {
    pub fn new(supply_points: &'a [SupplyPoint], nodes: &'a [TransferNode]) -> Self {
        Self {
            supply_points,
            nodes,
        }
    }

    /// Nodes that generate transfer lanes; SDC nodes are left out
    pub fn rdc_nodes(&self) -> Vec<&'a TransferNode> {
        self.nodes.iter().filter(|node| node.is_rdc()).collect()
    }

    /// Share of every warehouse's demand supplied by each RDC
    pub fn rdc_share(&self) -> f64 {
        match self.rdc_nodes().len() {
            0 => 0.0,
            count => 1.0 / count as f64,
        }
    }

    /// One flow per (supply point, warehouse), each supplying its own fraction
    pub fn inbound_flows(&self, facilities: &[Facility]) -> Vec<Flow> {
        self.supply_points
            .iter()
            .flat_map(|supply| {
                facilities.iter().map(move |facility| Flow {
                    origin: supply.location,
                    facility_id: facility.id,
                    distance: supply.location.distance_to(&facility.location),
                    weight: facility.demand * supply.fraction,
                })
            })
            .collect()
    }

    /// One flow per (RDC, warehouse), each carrying an equal share of the demand
    pub fn transfer_flows(&self, facilities: &[Facility]) -> Vec<Flow> {
        let share = self.rdc_share();

        self.rdc_nodes()
            .into_iter()
            .flat_map(|node| {
                facilities.iter().map(move |facility| Flow {
                    origin: node.location,
                    facility_id: facility.id,
                    distance: node.location.distance_to(&facility.location),
                    weight: facility.demand * share,
                })
            })
            .collect()
    }

    /// Weight handled by each RDC across all warehouses
    pub fn rdc_throughput(&self, facilities: &[Facility]) -> Vec<Weight> {
        let total: Weight = facilities.iter().map(|f| f.demand).sum();
        let share = self.rdc_share();
        self.rdc_nodes().iter().map(|_| total * share).collect()
    }
}
