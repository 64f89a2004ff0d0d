// Immutable input for one optimization run

use std::collections::HashMap;

use crate::config::{
    CostParameters, ScenarioSettings, SearchMode, SitingMode, SolverOptions, MAX_TRANSFER_NODES,
};
use crate::error::{NetworkError, Result};
use crate::models::{CandidateSite, DemandPoint, Location, SupplyPoint, TransferNode};
use crate::utils::parse::{parse_fixed_facilities, parse_supply_points};

/// Fully formed scenario consumed by the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub demand: Vec<DemandPoint>,

    /// Candidate sites; restrict siting to them with `SitingMode::Candidates`
    pub candidates: Vec<CandidateSite>,

    /// Always open, count toward k
    pub fixed_facilities: Vec<Location>,

    pub supply_points: Vec<SupplyPoint>,
    pub transfer_nodes: Vec<TransferNode>,
    pub costs: CostParameters,
    pub search: SearchMode,
    pub siting: SitingMode,
    pub solver: SolverOptions,
}

impl Scenario {
    /// Creates a continuous siting scenario with default costs and budgets
    pub fn new(demand: Vec<DemandPoint>, search: SearchMode) -> Self {
        Self {
            demand,
            candidates: Vec::new(),
            fixed_facilities: Vec::new(),
            supply_points: Vec::new(),
            transfer_nodes: Vec::new(),
            costs: CostParameters::default(),
            search,
            siting: SitingMode::Continuous,
            solver: SolverOptions::default(),
        }
    }

    /// Combines loaded demand and candidate rows with scenario settings
    pub fn from_settings(
        settings: ScenarioSettings,
        demand: Vec<DemandPoint>,
        candidates: Vec<CandidateSite>,
    ) -> Self {
        Self {
            demand,
            candidates,
            fixed_facilities: parse_fixed_facilities(&settings.fixed_facilities),
            supply_points: parse_supply_points(&settings.supply_points),
            transfer_nodes: settings
                .transfer_nodes
                .iter()
                .map(|node| TransferNode::new(node.lon, node.lat, node.role))
                .collect(),
            costs: settings.costs,
            search: settings.search,
            siting: settings.siting,
            solver: settings.solver,
        }
    }

    pub fn with_costs(mut self, costs: CostParameters) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateSite>, siting: SitingMode) -> Self {
        self.candidates = candidates;
        self.siting = siting;
        self
    }

    pub fn with_fixed_facilities(mut self, fixed: Vec<Location>) -> Self {
        self.fixed_facilities = fixed;
        self
    }

    pub fn with_supply_points(mut self, supply_points: Vec<SupplyPoint>) -> Self {
        self.supply_points = supply_points;
        self
    }

    pub fn with_transfer_nodes(mut self, nodes: Vec<TransferNode>) -> Self {
        self.transfer_nodes = nodes;
        self
    }

    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    /// Total demand weight (lbs)
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().map(|p| p.weight).sum()
    }

    /// Checks every boundary rule before any optimization work starts
    pub fn validate(&self) -> Result<()> {
        for (idx, point) in self.demand.iter().enumerate() {
            if !point.location.is_valid() {
                return Err(NetworkError::InvalidDemand(format!(
                    "demand point {} has invalid coordinates ({}, {})",
                    idx, point.location.lon, point.location.lat
                )));
            }
            if !point.weight.is_finite() || point.weight < 0.0 {
                return Err(NetworkError::InvalidDemand(format!(
                    "demand point {} has invalid weight {}",
                    idx, point.weight
                )));
            }
        }

        self.costs.validate()?;
        self.solver.validate()?;
        self.search.k_values()?;

        if self.transfer_nodes.len() > MAX_TRANSFER_NODES {
            return Err(NetworkError::InvalidConfig(format!(
                "at most {} transfer nodes are supported, got {}",
                MAX_TRANSFER_NODES,
                self.transfer_nodes.len()
            )));
        }

        let invalid_location = self
            .fixed_facilities
            .iter()
            .chain(self.candidates.iter().map(|c| &c.location))
            .chain(self.supply_points.iter().map(|s| &s.location))
            .chain(self.transfer_nodes.iter().map(|n| &n.location))
            .find(|loc| !loc.is_valid());
        if let Some(loc) = invalid_location {
            return Err(NetworkError::InvalidConfig(format!(
                "invalid coordinates ({}, {})",
                loc.lon, loc.lat
            )));
        }

        if let Some(supply) = self
            .supply_points
            .iter()
            .find(|s| !(0.0..=1.0).contains(&s.fraction))
        {
            return Err(NetworkError::InvalidConfig(format!(
                "supply fraction {} is outside 0..=1",
                supply.fraction
            )));
        }

        if let Some(cost) = self
            .candidates
            .iter()
            .filter_map(|c| c.cost_per_area)
            .find(|cost| !cost.is_finite() || *cost < 0.0)
        {
            return Err(NetworkError::InvalidConfig(format!(
                "candidate cost per area {} is negative",
                cost
            )));
        }

        Ok(())
    }

    /// Candidate cost overrides keyed by rounded coordinates
    pub fn candidate_costs(&self) -> HashMap<(i64, i64), f64> {
        self.candidates
            .iter()
            .filter_map(|c| c.cost_per_area.map(|cost| (c.location.rounded_key(), cost)))
            .collect()
    }
}
