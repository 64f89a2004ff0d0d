// Discrete siting over a candidate set: greedy add, then single-site swaps

use std::collections::HashSet;

use tracing::debug;

use crate::algorithms::assign::assign_nearest;
use crate::algorithms::{FacilityLocator, Placement, Site};
use crate::error::{NetworkError, Result};
use crate::models::{CandidateSite, DemandPoint, Location};

const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Selects facility sites from a fixed candidate list.
///
/// Candidates sharing a fixed facility's coordinates are left out of the pool.
#[derive(Debug, Clone)]
pub struct CandidateSwap {
    pool: Vec<CandidateSite>,
    max_swap_rounds: usize,
}

/// Distances from every demand point to every fixed site and candidate
struct DistanceTable<'a> {
    demand: &'a [DemandPoint],
    /// Weighted distance to the nearest fixed site, per demand point
    fixed_floor: Vec<f64>,
    /// Weighted distance per demand point (row) and candidate (column)
    candidate: Vec<Vec<f64>>,
}

/// Nearest open distance, the open position providing it and the runner-up distance
type OpenDistance = (f64, Option<usize>, f64);

impl<'a> DistanceTable<'a> {
    fn new(demand: &'a [DemandPoint], fixed: &[Location], candidates: &[CandidateSite]) -> Self {
        let fixed_floor = demand
            .iter()
            .map(|p| {
                fixed
                    .iter()
                    .map(|f| p.weight * p.location.distance_to(f))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let candidate = demand
            .iter()
            .map(|p| {
                candidates
                    .iter()
                    .map(|c| p.weight * p.location.distance_to(&c.location))
                    .collect()
            })
            .collect();

        Self {
            demand,
            fixed_floor,
            candidate,
        }
    }

    /// Total weighted distance with the given candidates open
    fn objective(&self, open: &[usize]) -> f64 {
        (0..self.demand.len())
            .map(|row| {
                open.iter()
                    .map(|&col| self.candidate[row][col])
                    .fold(self.fixed_floor[row], f64::min)
            })
            .map(|d| if d.is_finite() { d } else { 0.0 })
            .sum()
    }

    /// Per demand point, the nearest and second-nearest open distance.
    ///
    /// A position of `None` means a fixed site serves the point.
    fn open_distances(&self, open: &[usize]) -> Vec<OpenDistance> {
        (0..self.demand.len())
            .map(|row| {
                let mut first = self.fixed_floor[row];
                let mut owner = None;
                let mut second = f64::INFINITY;
                for (position, &col) in open.iter().enumerate() {
                    let d = self.candidate[row][col];
                    if d < first {
                        second = first;
                        first = d;
                        owner = Some(position);
                    } else if d < second {
                        second = d;
                    }
                }
                (first, owner, second)
            })
            .collect()
    }
}

impl CandidateSwap {
    pub fn new(candidates: &[CandidateSite], fixed: &[Location], max_swap_rounds: usize) -> Self {
        let taken: HashSet<(i64, i64)> = fixed.iter().map(Location::rounded_key).collect();
        let pool: Vec<CandidateSite> = candidates
            .iter()
            .filter(|c| !taken.contains(&c.location.rounded_key()))
            .copied()
            .collect();

        if pool.len() < candidates.len() {
            debug!(
                skipped = candidates.len() - pool.len(),
                "candidates on fixed facility sites left out"
            );
        }

        Self {
            pool,
            max_swap_rounds,
        }
    }

    fn unselected(&self, selected: &[usize]) -> Vec<usize> {
        (0..self.pool.len())
            .filter(|c| !selected.contains(c))
            .collect()
    }

    /// Adds candidates one at a time, each time the one lowering the objective most
    fn greedy_selection(&self, table: &DistanceTable, count: usize) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::with_capacity(count);
        let mut serving = table.fixed_floor.clone();

        while selected.len() < count {
            let mut best: Option<(usize, f64)> = None;
            for col in self.unselected(&selected) {
                let objective: f64 = serving
                    .iter()
                    .enumerate()
                    .map(|(row, &d)| d.min(table.candidate[row][col]))
                    .sum();

                if best.map_or(true, |(_, b)| objective < b) {
                    best = Some((col, objective));
                }
            }

            match best {
                Some((col, _)) => {
                    for (row, d) in serving.iter_mut().enumerate() {
                        *d = d.min(table.candidate[row][col]);
                    }
                    selected.push(col);
                }
                None => break,
            }
        }

        selected
    }

    /// Applies the best improving single swap until none is left or the budget runs out.
    ///
    /// Each round caches nearest and runner-up open distances, so pricing every
    /// (outgoing, incoming) pair takes one pass over demand per incoming candidate.
    fn improve(&self, table: &DistanceTable, mut selected: Vec<usize>) -> Vec<usize> {
        let mut current = table.objective(&selected);

        for round in 0..self.max_swap_rounds {
            let open = table.open_distances(&selected);
            let mut best: Option<(usize, usize, f64)> = None;

            for col in self.unselected(&selected) {
                let mut gain = 0.0;
                let mut loss = vec![0.0; selected.len()];

                for (row, &(first, owner, second)) in open.iter().enumerate() {
                    let d = table.candidate[row][col];
                    if d < first {
                        gain += first - d;
                    } else if let Some(position) = owner {
                        loss[position] += d.min(second) - first;
                    }
                }

                for (position, loss) in loss.into_iter().enumerate() {
                    let delta = loss - gain;
                    if best.map_or(true, |(_, _, b)| delta < b) {
                        best = Some((position, col, delta));
                    }
                }
            }

            match best {
                Some((position, col, delta))
                    if delta < -IMPROVEMENT_EPSILON * current.abs().max(1.0) =>
                {
                    selected[position] = col;
                    current = table.objective(&selected);
                    debug!(round, objective = current, "candidate swap accepted");
                }
                _ => break,
            }
        }

        selected
    }
}

impl FacilityLocator for CandidateSwap {
    fn locate(
        &self,
        demand: &[DemandPoint],
        fixed: &[Location],
        k: usize,
        _seed: u64,
    ) -> Result<Placement> {
        let count = k.saturating_sub(fixed.len());
        if count > self.pool.len() {
            return Err(NetworkError::InvalidConfig(format!(
                "{} candidate sites requested but only {} available",
                count,
                self.pool.len()
            )));
        }

        let table = DistanceTable::new(demand, fixed, &self.pool);
        let selected = self.greedy_selection(&table, count);
        let selected = self.improve(&table, selected);

        let sites: Vec<Site> = fixed
            .iter()
            .map(|&location| Site::fixed(location))
            .chain(selected.iter().map(|&col| Site {
                location: self.pool[col].location,
                is_fixed: false,
                cost_per_area: self.pool[col].cost_per_area,
            }))
            .collect();

        let locations: Vec<Location> = sites.iter().map(|s| s.location).collect();
        let partition = assign_nearest(&locations, demand).ok_or_else(|| {
            NetworkError::InvalidConfig("no facility available to serve demand".to_string())
        })?;

        Ok(Placement { sites, partition })
    }

    fn max_facilities(&self, fixed_count: usize) -> Option<usize> {
        Some(fixed_count + self.pool.len())
    }
}
