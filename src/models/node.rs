// Upstream network nodes: inbound supply points and RDC/SDC transfer nodes

use serde::{Deserialize, Serialize};

use crate::models::Location;

/// Inbound supply point feeding a fraction of every warehouse's demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub location: Location,

    /// Share of each warehouse's demand, 0.0..=1.0
    pub fraction: f64,
}

impl SupplyPoint {
    pub fn new(lon: f64, lat: f64, fraction: f64) -> Self {
        Self {
            location: Location::new(lon, lat),
            fraction,
        }
    }
}

/// Role of a secondary tier node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Regional distribution center, supplies transfer flow to warehouses
    Rdc,
    /// Collected and reported, but generates no flow
    Sdc,
}

/// A regional or secondary distribution center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferNode {
    pub location: Location,
    pub role: NodeRole,
}

impl TransferNode {
    pub fn new(lon: f64, lat: f64, role: NodeRole) -> Self {
        Self {
            location: Location::new(lon, lat),
            role,
        }
    }

    pub fn rdc(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, NodeRole::Rdc)
    }

    pub fn sdc(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, NodeRole::Sdc)
    }

    pub fn is_rdc(&self) -> bool {
        self.role == NodeRole::Rdc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert!(TransferNode::rdc(0.0, 0.0).is_rdc());
        assert!(!TransferNode::sdc(0.0, 0.0).is_rdc());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&NodeRole::Sdc).unwrap();
        assert_eq!(json, "\"sdc\"");
    }
}
