// Final outcome of a facility count search

use serde::{Deserialize, Serialize};

use crate::config::CostParameters;
use crate::models::{Cost, CostBreakdown, Location, NetworkConfiguration, TransferNode, Weight};
use crate::utils::lanes::{build_lanes, Lane};

/// Cost of one evaluated facility count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KEvaluation {
    pub k: usize,
    pub costs: CostBreakdown,
}

/// Why a requested facility count could not be evaluated as asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Fewer fixed facilities plus candidate sites than requested
    CandidateLimit,
    /// More fixed facilities than requested, all of them stay open
    FixedFacilities,
    /// No demand to serve, only the fixed facilities are kept
    NoDemand,
}

/// A requested facility count replaced by the count actually evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KAdjustment {
    pub requested: usize,
    pub effective: usize,
    pub reason: AdjustmentReason,
}

/// Best configuration across the searched facility counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best: NetworkConfiguration,

    /// One entry per distinct evaluated facility count, ascending by k
    pub cost_curve: Vec<KEvaluation>,

    pub adjustments: Vec<KAdjustment>,

    /// Transfer nodes active in the run, for downstream lane computation
    pub transfer_nodes: Vec<TransferNode>,
}

impl OptimizationResult {
    pub fn total_cost(&self) -> Cost {
        self.best.costs.total
    }

    pub fn costs(&self) -> &CostBreakdown {
        &self.best.costs
    }

    pub fn facility_locations(&self) -> Vec<Location> {
        self.best.facility_locations()
    }

    pub fn demand_per_facility(&self) -> Vec<Weight> {
        self.best.demand_per_facility()
    }

    /// Lane-level records of the selected configuration
    pub fn lanes(&self, costs: &CostParameters) -> Vec<Lane> {
        build_lanes(&self.best, costs)
    }

    /// Whether any requested facility count was changed before evaluation
    pub fn is_adjusted(&self) -> bool {
        !self.adjustments.is_empty()
    }
}
