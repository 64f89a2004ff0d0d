// Integration tests for end-to-end network optimization scenarios
use std::error::Error;

use warehouse_network::models::{AdjustmentReason, NodeRole};
use warehouse_network::utils::distance::distance;
use warehouse_network::{
    optimize, CandidateSite, CostParameters, DemandPoint, Location, NetworkError, Scenario,
    SearchMode, SitingMode, SolverOptions, SupplyPoint, TransferNode,
};

const TOLERANCE: f64 = 1e-6;

fn midwest_demand() -> Vec<DemandPoint> {
    vec![
        DemandPoint::new(-87.63, 41.88, 12000.0),
        DemandPoint::new(-87.90, 42.05, 8000.0),
        DemandPoint::new(-86.16, 39.77, 9500.0),
        DemandPoint::new(-86.30, 39.90, 4000.0),
        DemandPoint::new(-90.20, 38.63, 11000.0),
        DemandPoint::new(-90.50, 38.75, 3000.0),
        DemandPoint::new(-84.51, 39.10, 7000.0),
        DemandPoint::new(-83.05, 42.33, 10000.0),
        DemandPoint::new(-83.20, 42.50, 2500.0),
        DemandPoint::new(-93.27, 44.98, 6000.0),
    ]
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_square_corners_single_facility() {
    // 10 x 10 mile square around (-88.0, 40.0)
    let half_lat = 5.0 / 69.05;
    let half_lon = 5.0 / (69.17 * 40.0_f64.to_radians().cos());
    let weight = 1000.0;
    let demand = vec![
        DemandPoint::new(-88.0 - half_lon, 40.0 - half_lat, weight),
        DemandPoint::new(-88.0 + half_lon, 40.0 - half_lat, weight),
        DemandPoint::new(-88.0 + half_lon, 40.0 + half_lat, weight),
        DemandPoint::new(-88.0 - half_lon, 40.0 + half_lat, weight),
    ];

    let costs = CostParameters::default();
    let result = optimize(Scenario::new(demand, SearchMode::Fixed { k: 1 })).unwrap();

    let center = result.best.facilities[0].location;
    assert!(distance(center.lon, center.lat, -88.0, 40.0) < 0.1);

    let corner_distance = distance(-88.0, 40.0, -88.0 + half_lon, 40.0 + half_lat);
    let expected = 4.0 * weight * corner_distance * costs.outbound_rate;
    assert!(
        (result.costs().outbound - expected).abs() / expected < 2e-3,
        "outbound {} expected {}",
        result.costs().outbound,
        expected
    );

    let exact: f64 = result
        .best
        .assignments
        .iter()
        .map(|a| a.weight * a.distance * costs.outbound_rate)
        .sum();
    assert!(relative_eq(result.costs().outbound, exact));
}

#[test]
fn test_candidate_clamp_is_reported() {
    let scenario = Scenario::new(midwest_demand(), SearchMode::Range { min: 3, max: 6 })
        .with_candidates(
            vec![
                CandidateSite::new(-87.7, 41.9),
                CandidateSite::new(-86.2, 39.8),
            ],
            SitingMode::Candidates,
        );

    let result = optimize(scenario).unwrap();

    assert_eq!(result.best.k, 2);
    assert_eq!(result.best.requested_k, 3);
    assert!(result.best.is_adjusted());
    assert_eq!(result.cost_curve.len(), 1);
    assert_eq!(result.adjustments.len(), 4);
    assert!(result
        .adjustments
        .iter()
        .all(|a| a.effective == 2 && a.reason == AdjustmentReason::CandidateLimit));
}

#[test]
fn test_rdc_shares() {
    let demand = vec![
        DemandPoint::new(-87.63, 41.88, 5000.0),
        DemandPoint::new(-95.37, 29.76, 5000.0),
    ];
    let fixed = vec![Location::new(-87.63, 41.88), Location::new(-95.37, 29.76)];

    let one_rdc = Scenario::new(demand.clone(), SearchMode::Fixed { k: 2 })
        .with_fixed_facilities(fixed.clone())
        .with_transfer_nodes(vec![TransferNode::rdc(-90.2, 38.6)]);
    let result = optimize(one_rdc).unwrap();

    assert_eq!(result.best.transfer_flows.len(), 2);
    for flow in &result.best.transfer_flows {
        assert_eq!(flow.weight, 5000.0);
    }

    let two_rdc = Scenario::new(demand, SearchMode::Fixed { k: 2 })
        .with_fixed_facilities(fixed)
        .with_transfer_nodes(vec![
            TransferNode::rdc(-90.2, 38.6),
            TransferNode::rdc(-84.4, 33.7),
            TransferNode::sdc(-86.2, 39.8),
        ]);
    let result = optimize(two_rdc).unwrap();

    assert_eq!(result.best.transfer_flows.len(), 4);
    for flow in &result.best.transfer_flows {
        assert_eq!(flow.weight, 2500.0);
    }
    assert_eq!(result.transfer_nodes.len(), 3);
    assert_eq!(result.transfer_nodes[2].role, NodeRole::Sdc);
    assert!(result.costs().transfer > 0.0);
}

#[test]
fn test_zero_demand() {
    let result = optimize(Scenario::new(Vec::new(), SearchMode::Range { min: 1, max: 3 })).unwrap();

    assert_eq!(result.total_cost(), 0.0);
    assert!(result.best.assignments.is_empty());
    assert!(result.best.facilities.is_empty());
    assert_eq!(result.cost_curve.len(), 1);
    assert_eq!(*result.costs(), Default::default());

    assert!(result.is_adjusted());
    assert_eq!(result.best.k, 0);
    assert_eq!(result.adjustments.len(), 3);
    assert!(result
        .adjustments
        .iter()
        .all(|a| a.effective == 0 && a.reason == AdjustmentReason::NoDemand));
}

#[test]
fn test_zero_demand_candidate_siting() {
    let scenario = Scenario::new(Vec::new(), SearchMode::Fixed { k: 2 })
        .with_fixed_facilities(vec![Location::new(-87.63, 41.88)])
        .with_candidates(
            vec![
                CandidateSite::new(-86.2, 39.8),
                CandidateSite::new(-90.3, 38.7),
            ],
            SitingMode::Candidates,
        );

    let result = optimize(scenario).unwrap();

    assert_eq!(result.total_cost(), 0.0);
    assert_eq!(result.facility_locations(), vec![Location::new(-87.63, 41.88)]);
    assert_eq!(result.best.requested_k, 2);
    assert_eq!(result.adjustments.len(), 1);
    assert_eq!(result.adjustments[0].reason, AdjustmentReason::NoDemand);
}

#[test]
fn test_demand_conservation_and_cost_identity() {
    let scenario = Scenario::new(midwest_demand(), SearchMode::Range { min: 1, max: 5 })
        .with_fixed_facilities(vec![Location::new(-87.63, 41.88)])
        .with_supply_points(vec![
            SupplyPoint::new(-90.0, 35.0, 0.6),
            SupplyPoint::new(-80.0, 40.0, 0.4),
        ])
        .with_transfer_nodes(vec![TransferNode::rdc(-88.0, 40.0)]);
    let total_demand = scenario.total_demand();

    let result = optimize(scenario).unwrap();

    assert!(relative_eq(result.best.total_demand(), total_demand));
    assert_eq!(result.best.assignments.len(), midwest_demand().len());
    assert!(result.best.facilities[0].is_fixed);
    assert_eq!(result.best.facilities[0].location, Location::new(-87.63, 41.88));

    for evaluation in &result.cost_curve {
        let c = evaluation.costs;
        assert!(relative_eq(c.total, c.outbound + c.inbound + c.transfer + c.facility));
        assert!(c.outbound >= 0.0 && c.inbound >= 0.0 && c.transfer >= 0.0 && c.facility >= 0.0);
    }

    let min_total = result
        .cost_curve
        .iter()
        .map(|e| e.costs.total)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.total_cost(), min_total);
}

#[test]
fn test_fixed_facility_on_demand_point() {
    let demand = midwest_demand();
    let target = demand[4].location;
    let scenario = Scenario::new(demand, SearchMode::Fixed { k: 3 })
        .with_fixed_facilities(vec![target]);

    let result = optimize(scenario).unwrap();
    let assignment = &result.best.assignments[4];

    assert_eq!(assignment.distance, 0.0);
    assert!(result.best.assignments.iter().all(|a| a.distance >= 0.0));
}

#[test]
fn test_same_seed_same_result() {
    let build = || {
        Scenario::new(midwest_demand(), SearchMode::Range { min: 2, max: 4 }).with_solver(
            SolverOptions {
                seed: 1234,
                restarts: 4,
                ..SolverOptions::default()
            },
        )
    };

    let first = optimize(build()).unwrap();
    let second = optimize(build()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_invalid_inputs_rejected() {
    let negative = Scenario::new(
        vec![DemandPoint::new(-87.6, 41.8, -10.0)],
        SearchMode::Fixed { k: 1 },
    );
    assert!(matches!(optimize(negative), Err(NetworkError::InvalidDemand(_))));

    let zero_k = Scenario::new(midwest_demand(), SearchMode::Fixed { k: 0 });
    assert!(matches!(optimize(zero_k), Err(NetworkError::InvalidConfig(_))));

    let empty_range = Scenario::new(midwest_demand(), SearchMode::Range { min: 4, max: 2 });
    assert!(matches!(
        optimize(empty_range),
        Err(NetworkError::InvalidConfig(_))
    ));
}

#[test]
fn test_candidate_siting_uses_site_costs() -> Result<(), Box<dyn Error>> {
    let candidates = vec![
        CandidateSite::with_cost(-87.7, 41.9, 3.0),
        CandidateSite::new(-86.2, 39.8),
        CandidateSite::new(-90.3, 38.7),
        CandidateSite::with_cost(-83.1, 42.4, 9.0),
        CandidateSite::new(-120.0, 47.0),
    ];
    let scenario = Scenario::new(midwest_demand(), SearchMode::Fixed { k: 3 })
        .with_candidates(candidates.clone(), SitingMode::Candidates);

    let result = optimize(scenario)?;

    assert_eq!(result.best.facilities.len(), 3);
    for facility in &result.best.facilities {
        let site = candidates
            .iter()
            .find(|c| c.location == facility.location)
            .ok_or("facility placed off the candidate list")?;
        assert_eq!(facility.cost_per_area, site.cost_per_area);
    }
    assert!(!result
        .facility_locations()
        .contains(&Location::new(-120.0, 47.0)));

    Ok(())
}
