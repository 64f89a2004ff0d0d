// Facility count search: locate, assign, route and cost every k, keep the cheapest

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::algorithms::cost::CostModel;
use crate::algorithms::kmeans::WeightedKMeans;
use crate::algorithms::swap::CandidateSwap;
use crate::algorithms::transfer::TransferNetwork;
use crate::algorithms::FacilityLocator;
use crate::config::SitingMode;
use crate::error::{NetworkError, Result};
use crate::models::{
    AdjustmentReason, Assignment, CostBreakdown, Facility, KAdjustment, KEvaluation,
    NetworkConfiguration, OptimizationResult, Scenario,
};

/// Runs the full optimization for one scenario
pub struct NetworkOptimizer {
    scenario: Scenario,

    /// Candidate cost-per-area overrides keyed by rounded coordinates
    candidate_costs: HashMap<(i64, i64), f64>,
}

impl NetworkOptimizer {
    /// Validates the scenario and prepares lookups
    pub fn new(scenario: Scenario) -> Result<Self> {
        scenario.validate()?;
        let candidate_costs = scenario.candidate_costs();

        Ok(Self {
            scenario,
            candidate_costs,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    fn locator(&self) -> Box<dyn FacilityLocator> {
        match self.scenario.siting {
            SitingMode::Continuous => Box::new(WeightedKMeans::from_options(&self.scenario.solver)),
            SitingMode::Candidates => Box::new(CandidateSwap::new(
                &self.scenario.candidates,
                &self.scenario.fixed_facilities,
                self.scenario.solver.max_swap_rounds,
            )),
        }
    }

    /// Facility counts to evaluate as (requested, effective) pairs, plus every adjustment made
    pub fn plan(&self) -> Result<(Vec<(usize, usize)>, Vec<KAdjustment>)> {
        let requested = self.scenario.search.k_values()?;
        let fixed_count = self.scenario.fixed_facilities.len();
        let capacity = self.locator().max_facilities(fixed_count);

        let mut plan: Vec<(usize, usize)> = Vec::new();
        let mut adjustments = Vec::new();

        for k in requested {
            let mut effective = k;

            if effective < fixed_count {
                effective = fixed_count;
                adjustments.push(KAdjustment {
                    requested: k,
                    effective,
                    reason: AdjustmentReason::FixedFacilities,
                });
            }

            if let Some(capacity) = capacity {
                if effective > capacity {
                    effective = capacity;
                    adjustments.push(KAdjustment {
                        requested: k,
                        effective,
                        reason: AdjustmentReason::CandidateLimit,
                    });
                }
            }

            if effective == 0 {
                return Err(NetworkError::InvalidConfig(
                    "candidate siting requested without candidate or fixed sites".to_string(),
                ));
            }

            if self.scenario.demand.is_empty() && effective != fixed_count {
                effective = fixed_count;
                adjustments.push(KAdjustment {
                    requested: k,
                    effective,
                    reason: AdjustmentReason::NoDemand,
                });
            }

            if !plan.iter().any(|&(_, e)| e == effective) {
                plan.push((k, effective));
            }
        }

        for adjustment in &adjustments {
            warn!(
                requested = adjustment.requested,
                effective = adjustment.effective,
                reason = ?adjustment.reason,
                "facility count adjusted"
            );
        }

        Ok((plan, adjustments))
    }

    /// Builds the configuration for exactly `k` facilities
    pub fn evaluate(&self, requested_k: usize, k: usize) -> Result<NetworkConfiguration> {
        let scenario = &self.scenario;
        let seed = scenario.solver.seed ^ ((k as u64) << 32);
        let placement =
            self.locator()
                .locate(&scenario.demand, &scenario.fixed_facilities, k, seed)?;

        let totals = placement
            .partition
            .demand_per_facility(&scenario.demand, placement.sites.len());

        let facilities: Vec<Facility> = placement
            .sites
            .iter()
            .zip(totals)
            .enumerate()
            .map(|(id, (site, demand))| Facility {
                id,
                location: site.location,
                demand,
                is_fixed: site.is_fixed,
                cost_per_area: site.cost_per_area.or_else(|| {
                    self.candidate_costs
                        .get(&site.location.rounded_key())
                        .copied()
                }),
            })
            .collect();

        let assignments: Vec<Assignment> = scenario
            .demand
            .iter()
            .zip(placement.partition.facility_of.iter().zip(&placement.partition.distances))
            .enumerate()
            .map(|(demand_index, (point, (&facility_id, &distance)))| Assignment {
                demand_index,
                facility_id,
                distance,
                location: point.location,
                weight: point.weight,
            })
            .collect();

        if scenario.demand.is_empty() {
            return Ok(NetworkConfiguration {
                requested_k,
                k: facilities.len(),
                facilities,
                assignments,
                inbound_flows: Vec::new(),
                transfer_flows: Vec::new(),
                costs: CostBreakdown::default(),
            });
        }

        let network = TransferNetwork::new(&scenario.supply_points, &scenario.transfer_nodes);
        let inbound_flows = network.inbound_flows(&facilities);
        let transfer_flows = network.transfer_flows(&facilities);
        let throughput = network.rdc_throughput(&facilities);

        let costs = CostModel::new(&scenario.costs).breakdown(
            &facilities,
            &assignments,
            &inbound_flows,
            &transfer_flows,
            &throughput,
        );

        debug!(k, total = costs.total, "evaluated facility count");

        Ok(NetworkConfiguration {
            requested_k,
            k,
            facilities,
            assignments,
            inbound_flows,
            transfer_flows,
            costs,
        })
    }

    /// Evaluates every planned facility count in parallel and keeps the cheapest.
    ///
    /// Ties on total cost go to the smaller facility count.
    pub fn solve(&self) -> Result<OptimizationResult> {
        let (plan, adjustments) = self.plan()?;
        let facility_counts: Vec<usize> = plan.iter().map(|&(_, k)| k).collect();

        info!(
            demand_points = self.scenario.demand.len(),
            facility_counts = ?facility_counts,
            siting = ?self.scenario.siting,
            "starting network optimization"
        );

        let configurations = plan
            .par_iter()
            .map(|&(requested, k)| self.evaluate(requested, k))
            .collect::<Result<Vec<_>>>()?;

        let mut cost_curve: Vec<KEvaluation> = configurations
            .iter()
            .map(|c| KEvaluation {
                k: c.k,
                costs: c.costs,
            })
            .collect();
        cost_curve.sort_by_key(|e| e.k);

        let best = configurations
            .into_iter()
            .min_by(|a, b| {
                a.costs
                    .total
                    .total_cmp(&b.costs.total)
                    .then(a.k.cmp(&b.k))
            })
            .ok_or_else(|| NetworkError::InvalidConfig("no viable facility count".to_string()))?;

        info!(k = best.k, total_cost = best.costs.total, "selected network");

        Ok(OptimizationResult {
            best,
            cost_curve,
            adjustments,
            transfer_nodes: self.scenario.transfer_nodes.clone(),
        })
    }
}

/// Validates and optimizes a scenario in one call
pub fn optimize(scenario: Scenario) -> Result<OptimizationResult> {
    NetworkOptimizer::new(scenario)?.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CostParameters, SearchMode};
    use crate::models::{CandidateSite, DemandPoint, Location};

    fn demand() -> Vec<DemandPoint> {
        vec![
            DemandPoint::new(-87.70, 41.80, 1000.0),
            DemandPoint::new(-87.60, 41.90, 1500.0),
            DemandPoint::new(-95.40, 29.70, 800.0),
            DemandPoint::new(-95.30, 29.80, 1200.0),
            DemandPoint::new(-118.20, 34.00, 900.0),
        ]
    }

    #[test]
    fn test_plan_dedupes_clamped_counts() {
        let scenario = Scenario::new(demand(), SearchMode::Range { min: 1, max: 4 })
            .with_candidates(
                vec![CandidateSite::new(-87.6, 41.8), CandidateSite::new(-95.3, 29.7)],
                SitingMode::Candidates,
            );
        let optimizer = NetworkOptimizer::new(scenario).unwrap();
        let (plan, adjustments) = optimizer.plan().unwrap();

        assert_eq!(plan, vec![(1, 1), (2, 2)]);
        assert_eq!(adjustments.len(), 2);
        assert!(adjustments
            .iter()
            .all(|a| a.effective == 2 && a.reason == AdjustmentReason::CandidateLimit));
    }

    #[test]
    fn test_plan_raises_to_fixed_count() {
        let scenario = Scenario::new(demand(), SearchMode::Fixed { k: 1 }).with_fixed_facilities(
            vec![Location::new(-87.6, 41.8), Location::new(-95.3, 29.7)],
        );
        let (plan, adjustments) = NetworkOptimizer::new(scenario).unwrap().plan().unwrap();

        assert_eq!(plan, vec![(1, 2)]);
        assert_eq!(adjustments[0].reason, AdjustmentReason::FixedFacilities);
    }

    #[test]
    fn test_plan_without_demand_keeps_fixed_count() {
        let scenario = Scenario::new(Vec::new(), SearchMode::Range { min: 1, max: 3 })
            .with_fixed_facilities(vec![Location::new(-87.6, 41.8)]);
        let (plan, adjustments) = NetworkOptimizer::new(scenario).unwrap().plan().unwrap();

        assert_eq!(plan, vec![(1, 1)]);
        assert_eq!(adjustments.len(), 2);
        assert!(adjustments
            .iter()
            .all(|a| a.effective == 1 && a.reason == AdjustmentReason::NoDemand));
    }

    #[test]
    fn test_fixed_site_candidate_not_counted() {
        let scenario = Scenario::new(demand(), SearchMode::Fixed { k: 2 })
            .with_fixed_facilities(vec![Location::new(-87.6, 41.8)])
            .with_candidates(
                vec![CandidateSite::new(-87.6, 41.8), CandidateSite::new(-95.3, 29.7)],
                SitingMode::Candidates,
            );
        let optimizer = NetworkOptimizer::new(scenario).unwrap();
        let (plan, adjustments) = optimizer.plan().unwrap();
        assert_eq!(plan, vec![(2, 2)]);
        assert!(adjustments.is_empty());

        let result = optimizer.solve().unwrap();
        assert_eq!(
            result.facility_locations(),
            vec![Location::new(-87.6, 41.8), Location::new(-95.3, 29.7)]
        );
    }

    #[test]
    fn test_candidate_siting_without_sites() {
        let scenario = Scenario::new(demand(), SearchMode::Fixed { k: 2 })
            .with_candidates(Vec::new(), SitingMode::Candidates);
        assert!(matches!(
            optimize(scenario),
            Err(NetworkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tie_prefers_fewer_facilities() {
        // everything free: any k costs zero
        let costs = CostParameters {
            outbound_rate: 0.0,
            fixed_cost: 0.0,
            cost_per_area: 0.0,
            ..CostParameters::default()
        };
        let scenario =
            Scenario::new(demand(), SearchMode::Range { min: 2, max: 4 }).with_costs(costs);
        let result = optimize(scenario).unwrap();

        assert_eq!(result.best.k, 2);
        assert_eq!(result.cost_curve.len(), 3);
    }

    #[test]
    fn test_high_fixed_cost_prefers_one_facility() {
        let costs = CostParameters {
            fixed_cost: 1e12,
            ..CostParameters::default()
        };
        let scenario =
            Scenario::new(demand(), SearchMode::Range { min: 1, max: 3 }).with_costs(costs);
        let result = optimize(scenario).unwrap();

        assert_eq!(result.best.k, 1);
        assert_eq!(result.best.facilities.len(), 1);
    }

    #[test]
    fn test_candidate_cost_applies_to_matching_fixed_site() {
        let scenario = Scenario::new(demand(), SearchMode::Fixed { k: 1 })
            .with_fixed_facilities(vec![Location::new(-87.6, 41.8)])
            .with_candidates(
                vec![CandidateSite::with_cost(-87.6, 41.8, 1.5)],
                SitingMode::Continuous,
            );
        let result = optimize(scenario).unwrap();

        assert_eq!(result.best.facilities[0].cost_per_area, Some(1.5));
        assert!(result.best.facilities[0].is_fixed);
    }
}
