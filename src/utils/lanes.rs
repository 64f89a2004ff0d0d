// Lane-level flow records and their CSV export

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::CostParameters;
use crate::error::Result;
use crate::models::{Cost, Flow, Location, Miles, NetworkConfiguration, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneType {
    Outbound,
    Inbound,
    Transfer,
}

/// One origin-destination flow with its cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub lane_type: LaneType,
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub dest_lon: f64,
    pub dest_lat: f64,
    pub distance_mi: Miles,
    pub weight_lbs: Weight,
    pub rate: f64,
    pub cost: Cost,
}

impl Lane {
    fn new(
        lane_type: LaneType,
        origin: Location,
        dest: Location,
        distance: Miles,
        weight: Weight,
        rate: f64,
    ) -> Self {
        Self {
            lane_type,
            origin_lon: origin.lon,
            origin_lat: origin.lat,
            dest_lon: dest.lon,
            dest_lat: dest.lat,
            distance_mi: distance,
            weight_lbs: weight,
            rate,
            cost: weight * distance * rate,
        }
    }
}

/// Every outbound, inbound and transfer lane of a configuration, in that order
pub fn build_lanes(config: &NetworkConfiguration, costs: &CostParameters) -> Vec<Lane> {
    let facility_location = |id: usize| config.facilities[id].location;
    let flow_lane = |lane_type: LaneType, rate: f64| {
        move |flow: &Flow| {
            Lane::new(
                lane_type,
                flow.origin,
                facility_location(flow.facility_id),
                flow.distance,
                flow.weight,
                rate,
            )
        }
    };

    let outbound = config.assignments.iter().map(|a| {
        Lane::new(
            LaneType::Outbound,
            facility_location(a.facility_id),
            a.location,
            a.distance,
            a.weight,
            costs.outbound_rate,
        )
    });
    let inbound = config
        .inbound_flows
        .iter()
        .map(flow_lane(LaneType::Inbound, costs.inbound_rate));
    let transfer = config
        .transfer_flows
        .iter()
        .map(flow_lane(LaneType::Transfer, costs.transfer_rate));

    outbound.chain(inbound).chain(transfer).collect()
}

/// Writes lanes as CSV with a header row
pub fn write_lanes_csv<W: Write>(lanes: &[Lane], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for lane in lanes {
        writer.serialize(lane)?;
    }
    writer.flush()?;
    Ok(())
}
