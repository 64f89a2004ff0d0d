// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::search::{optimize, NetworkOptimizer};
pub use config::{CostParameters, ScenarioSettings, SearchMode, SitingMode, SolverOptions};
pub use error::{NetworkError, Result};
pub use models::{
    CandidateSite, DemandPoint, Location, NetworkConfiguration, OptimizationResult, Scenario,
    SupplyPoint, TransferNode,
};
