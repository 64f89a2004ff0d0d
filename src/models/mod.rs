// Models module - exports all model types

mod demand;
mod location;
mod network;
mod node;
mod result;
mod scenario;

// Re-export model types
pub use self::demand::{CandidateSite, DemandPoint};
pub use self::location::Location;
pub use self::network::{Assignment, CostBreakdown, Facility, Flow, NetworkConfiguration};
pub use self::node::{NodeRole, SupplyPoint, TransferNode};
pub use self::result::{AdjustmentReason, KAdjustment, KEvaluation, OptimizationResult};
pub use self::scenario::Scenario;

// Common type aliases for improved code readability
pub type FacilityId = usize;
pub type Cost = f64;
pub type Miles = f64;
pub type Weight = f64;
