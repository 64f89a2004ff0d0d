// Continuous siting by weighted centroid refinement

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::algorithms::assign::{assign_nearest, Partition};
use crate::algorithms::{FacilityLocator, Placement, Site};
use crate::config::SolverOptions;
use crate::error::{NetworkError, Result};
use crate::models::{DemandPoint, Location};
use crate::utils::distance::haversine_miles;

/// Weighted k-means over lon/lat with fixed facilities pinned in place
#[derive(Debug, Clone, Copy)]
pub struct WeightedKMeans {
    restarts: usize,
    max_iterations: usize,
    tolerance_miles: f64,
}

impl WeightedKMeans {
    pub fn new(restarts: usize, max_iterations: usize, tolerance_miles: f64) -> Self {
        Self {
            restarts: restarts.max(1),
            max_iterations: max_iterations.max(1),
            tolerance_miles,
        }
    }

    pub fn from_options(options: &SolverOptions) -> Self {
        Self::new(
            options.restarts,
            options.max_iterations,
            options.tolerance_miles,
        )
    }

    /// Weighted k-means++ seeding: first pick by weight, then by weight × D²
    fn initialize(
        &self,
        demand: &[DemandPoint],
        fixed: &[Location],
        k: usize,
        rng: &mut StdRng,
    ) -> Vec<Location> {
        let mut centers = fixed.to_vec();
        let mut nearest: Vec<f64> = demand
            .iter()
            .map(|p| {
                fixed
                    .iter()
                    .map(|f| p.location.distance_to(f))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        while centers.len() < k {
            let scores: Vec<f64> = demand
                .iter()
                .zip(&nearest)
                .map(|(p, d)| {
                    if d.is_finite() {
                        p.weight * d * d
                    } else {
                        p.weight
                    }
                })
                .collect();

            let idx = match WeightedIndex::new(&scores) {
                Ok(dist) => dist.sample(rng),
                // every remaining point is co-located with a center or weightless
                Err(_) => rng.gen_range(0..demand.len()),
            };

            let center = demand[idx].location;
            for (d, p) in nearest.iter_mut().zip(demand) {
                *d = d.min(p.location.distance_to(&center));
            }
            centers.push(center);
        }

        centers
    }

    /// Moves every free center to the weighted centroid of its assigned points
    fn recenter(
        centers: &[Location],
        fixed_count: usize,
        partition: &Partition,
        demand: &[DemandPoint],
    ) -> Vec<Location> {
        // (weight, weighted lon, weighted lat, count, lon, lat)
        let mut sums = vec![(0.0, 0.0, 0.0, 0usize, 0.0, 0.0); centers.len()];
        for (point, &facility) in demand.iter().zip(&partition.facility_of) {
            let entry = &mut sums[facility];
            entry.0 += point.weight;
            entry.1 += point.weight * point.location.lon;
            entry.2 += point.weight * point.location.lat;
            entry.3 += 1;
            entry.4 += point.location.lon;
            entry.5 += point.location.lat;
        }

        centers
            .iter()
            .zip(&sums)
            .enumerate()
            .map(|(idx, (center, &(w, wlon, wlat, count, lon, lat)))| {
                if idx < fixed_count {
                    *center
                } else if w > 0.0 {
                    Location::new(wlon / w, wlat / w)
                } else if count > 0 {
                    Location::new(lon / count as f64, lat / count as f64)
                } else {
                    *center
                }
            })
            .collect()
    }

    fn refine(
        &self,
        demand: &[DemandPoint],
        fixed_count: usize,
        mut centers: Vec<Location>,
    ) -> Result<(Vec<Location>, Partition)> {
        for iteration in 0..self.max_iterations {
            let partition = assign_nearest(&centers, demand).ok_or_else(no_facilities)?;
            let moved = Self::recenter(&centers, fixed_count, &partition, demand);

            let shift = centers
                .iter()
                .zip(&moved)
                .map(|(a, b)| haversine_miles(a.lon, a.lat, b.lon, b.lat))
                .fold(0.0, f64::max);
            centers = moved;

            if shift <= self.tolerance_miles {
                debug!(iteration, "centroids converged");
                break;
            }
        }

        let partition = assign_nearest(&centers, demand).ok_or_else(no_facilities)?;
        Ok((centers, partition))
    }
}

fn no_facilities() -> NetworkError {
    NetworkError::InvalidConfig("no facility available to serve demand".to_string())
}

fn into_placement(centers: Vec<Location>, fixed_count: usize, partition: Partition) -> Placement {
    let sites = centers
        .into_iter()
        .enumerate()
        .map(|(idx, location)| {
            if idx < fixed_count {
                Site::fixed(location)
            } else {
                Site::free(location)
            }
        })
        .collect();

    Placement { sites, partition }
}

impl FacilityLocator for WeightedKMeans {
    fn locate(
        &self,
        demand: &[DemandPoint],
        fixed: &[Location],
        k: usize,
        seed: u64,
    ) -> Result<Placement> {
        let k = k.max(fixed.len());

        if demand.is_empty() || k == fixed.len() {
            let partition = assign_nearest(fixed, demand).ok_or_else(no_facilities)?;
            return Ok(into_placement(fixed.to_vec(), fixed.len(), partition));
        }

        let mut best: Option<(f64, Vec<Location>, Partition)> = None;
        for restart in 0..self.restarts {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(restart as u64));
            let initial = self.initialize(demand, fixed, k, &mut rng);
            let (centers, partition) = self.refine(demand, fixed.len(), initial)?;
            let objective = partition.weighted_distance(demand);

            debug!(k, restart, objective, "continuous siting restart");

            if best.as_ref().map_or(true, |(b, _, _)| objective < *b) {
                best = Some((objective, centers, partition));
            }
        }

        let (_, centers, partition) = best.ok_or_else(no_facilities)?;
        Ok(into_placement(centers, fixed.len(), partition))
    }

    fn max_facilities(&self, _fixed_count: usize) -> Option<usize> {
        None
    }
}
