//! Scenario configuration.
//!
//! Cost rates, facility count selection and solver budgets are loaded from
//! TOML so a scenario can be rerun without code changes.
//!
//! ```
//! use warehouse_network::config::{ScenarioSettings, SearchMode};
//!
//! let settings = ScenarioSettings::from_toml_str(r#"
//!     fixed_facilities = """
//!     -87.63,41.88
//!     """
//!
//!     [costs]
//!     outbound_rate = 0.4
//!
//!     [search]
//!     mode = "fixed"
//!     k = 4
//! "#).unwrap();
//!
//! assert_eq!(settings.search, SearchMode::Fixed { k: 4 });
//! assert_eq!(settings.costs.outbound_rate, 0.4);
//! assert_eq!(settings.costs.inbound_rate, 0.30);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::models::NodeRole;

/// Most transfer nodes a scenario may configure
pub const MAX_TRANSFER_NODES: usize = 3;

/// Transportation and facility cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CostParameters {
    /// $ per lb-mile, warehouse to customer
    pub outbound_rate: f64,
    /// $ per lb-mile, supply point to warehouse
    pub inbound_rate: f64,
    /// $ per lb-mile, RDC to warehouse
    pub transfer_rate: f64,
    /// Warehouse sq ft needed per lb of annual demand
    pub area_per_weight: f64,
    /// Warehouse $ per sq ft per year
    pub cost_per_area: f64,
    /// Fixed $ per open warehouse per year
    pub fixed_cost: f64,
    pub rdc_area_per_weight: f64,
    pub rdc_cost_per_area: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            outbound_rate: 0.35,
            inbound_rate: 0.30,
            transfer_rate: 0.32,
            area_per_weight: 0.02,
            cost_per_area: 6.0,
            fixed_cost: 250_000.0,
            rdc_area_per_weight: 0.02,
            rdc_cost_per_area: 6.0,
        }
    }
}

impl CostParameters {
    /// Rejects negative or non-finite rates
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("outbound_rate", self.outbound_rate),
            ("inbound_rate", self.inbound_rate),
            ("transfer_rate", self.transfer_rate),
            ("area_per_weight", self.area_per_weight),
            ("cost_per_area", self.cost_per_area),
            ("fixed_cost", self.fixed_cost),
            ("rdc_area_per_weight", self.rdc_area_per_weight),
            ("rdc_cost_per_area", self.rdc_cost_per_area),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Facility counts to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchMode {
    /// Every count in `min..=max`
    Range { min: usize, max: usize },
    /// Exactly one count
    Fixed { k: usize },
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Range { min: 3, max: 6 }
    }
}

impl SearchMode {
    /// Facility counts in ascending order
    pub fn k_values(&self) -> Result<Vec<usize>> {
        match *self {
            SearchMode::Fixed { k: 0 } => Err(NetworkError::InvalidConfig(
                "facility count must be at least 1".to_string(),
            )),
            SearchMode::Fixed { k } => Ok(vec![k]),
            SearchMode::Range { min: 0, .. } => Err(NetworkError::InvalidConfig(
                "facility count range must start at 1 or above".to_string(),
            )),
            SearchMode::Range { min, max } if min > max => Err(NetworkError::InvalidConfig(
                format!("empty facility count range {}..={}", min, max),
            )),
            SearchMode::Range { min, max } => Ok((min..=max).collect()),
        }
    }
}

/// How warehouse positions are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SitingMode {
    /// Anywhere, by weighted centroid refinement
    #[default]
    Continuous,
    /// Only at the supplied candidate sites
    Candidates,
}

/// Iteration budgets and randomness for the locators
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Base seed, combined with k and restart index
    pub seed: u64,
    /// Independent initializations for continuous siting
    pub restarts: usize,
    /// Refinement iterations per restart
    pub max_iterations: usize,
    /// Largest facility movement (miles) still treated as converged
    pub tolerance_miles: f64,
    /// Swap improvement rounds for candidate siting
    pub max_swap_rounds: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance_miles: 0.01,
            max_swap_rounds: 100,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<()> {
        if self.restarts == 0 || self.max_iterations == 0 {
            return Err(NetworkError::InvalidConfig(
                "restarts and max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.tolerance_miles.is_finite() || self.tolerance_miles < 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "tolerance_miles must be non-negative, got {}",
                self.tolerance_miles
            )));
        }
        Ok(())
    }
}

/// Transfer node entry as written in the scenario file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TransferNodeSettings {
    pub lon: f64,
    pub lat: f64,
    #[serde(default = "default_role")]
    pub role: NodeRole,
}

fn default_role() -> NodeRole {
    NodeRole::Rdc
}

/// Everything about a scenario except the demand and candidate files
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioSettings {
    pub costs: CostParameters,
    pub search: SearchMode,
    pub siting: SitingMode,
    pub solver: SolverOptions,

    /// "lon,lat" per line
    pub fixed_facilities: String,

    /// "lon,lat,percent" per line, percent in 0..=100
    pub supply_points: String,

    pub transfer_nodes: Vec<TransferNodeSettings>,
}

impl ScenarioSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
