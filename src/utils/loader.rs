// CSV intake for demand and candidate site files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{NetworkError, Result};
use crate::models::{CandidateSite, DemandPoint, Location};

#[derive(Debug, Deserialize)]
struct DemandRow {
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "DemandLbs")]
    demand_lbs: Option<f64>,
}

/// Reads demand rows with a `Longitude,Latitude,DemandLbs` header.
///
/// Rows with an empty required field are dropped. Unparseable values,
/// out-of-range coordinates, negative weights and an empty result are errors.
pub fn read_demand<R: Read>(reader: R) -> Result<Vec<DemandPoint>> {
    let mut reader = csv::Reader::from_reader(BufReader::new(reader));
    let mut points = Vec::new();
    let mut dropped = 0;

    for (row_no, row) in reader.deserialize::<DemandRow>().enumerate() {
        let row = row?;
        let (lon, lat, weight) = match (row.longitude, row.latitude, row.demand_lbs) {
            (Some(lon), Some(lat), Some(weight)) => (lon, lat, weight),
            _ => {
                dropped += 1;
                continue;
            }
        };

        if !Location::new(lon, lat).is_valid() {
            return Err(NetworkError::InvalidDemand(format!(
                "row {} has invalid coordinates ({}, {})",
                row_no + 1,
                lon,
                lat
            )));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(NetworkError::InvalidDemand(format!(
                "row {} has invalid demand weight {}",
                row_no + 1,
                weight
            )));
        }

        points.push(DemandPoint::new(lon, lat, weight));
    }

    if points.is_empty() {
        return Err(NetworkError::InvalidDemand(
            "no usable demand rows".to_string(),
        ));
    }

    info!(rows = points.len(), dropped, "loaded demand");
    Ok(points)
}

/// Loads a demand CSV file
pub fn load_demand(path: impl AsRef<Path>) -> Result<Vec<DemandPoint>> {
    read_demand(File::open(path)?)
}

/// Reads headerless `lon,lat[,cost_per_area]` candidate rows.
///
/// Rows with missing or unparseable coordinates are skipped; an unparseable
/// cost leaves the site without an override.
pub fn read_candidates<R: Read>(reader: R) -> Result<Vec<CandidateSite>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(reader));
    let mut sites = Vec::new();

    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        let coordinate = |idx: usize| record.get(idx).and_then(|v| v.parse::<f64>().ok());

        let (lon, lat) = match (coordinate(0), coordinate(1)) {
            (Some(lon), Some(lat)) if Location::new(lon, lat).is_valid() => (lon, lat),
            _ => {
                debug!(row = row_no + 1, "skipping candidate row without coordinates");
                continue;
            }
        };

        let site = match coordinate(2) {
            Some(cost) if cost.is_finite() && cost >= 0.0 => {
                CandidateSite::with_cost(lon, lat, cost)
            }
            _ => CandidateSite::new(lon, lat),
        };
        sites.push(site);
    }

    info!(sites = sites.len(), "loaded candidate sites");
    Ok(sites)
}

/// Loads a candidate site CSV file
pub fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<CandidateSite>> {
    read_candidates(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_demand_drops_incomplete_rows() {
        let data = "Longitude,Latitude,DemandLbs,Store\n\
                    -87.6,41.8,100,a\n\
                    -88.0,,50,b\n\
                    -86.1,39.7,250.5,c\n";
        let points = read_demand(data.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].weight, 250.5);
    }

    #[test]
    fn test_read_demand_rejects_negative_weight() {
        let data = "Longitude,Latitude,DemandLbs\n-87.6,41.8,-5\n";
        assert!(matches!(
            read_demand(data.as_bytes()),
            Err(NetworkError::InvalidDemand(_))
        ));
    }

    #[test]
    fn test_read_demand_rejects_malformed_value() {
        let data = "Longitude,Latitude,DemandLbs\n-87.6,41.8,lots\n";
        assert!(matches!(
            read_demand(data.as_bytes()),
            Err(NetworkError::Csv(_))
        ));
    }

    #[test]
    fn test_read_demand_rejects_empty_file() {
        let data = "Longitude,Latitude,DemandLbs\n";
        assert!(matches!(
            read_demand(data.as_bytes()),
            Err(NetworkError::InvalidDemand(_))
        ));
    }

    #[test]
    fn test_read_candidates() {
        let data = "-87.6,41.8,5.5\n-86.1,39.7\n,39.0,4\n-85.0,38.0,n/a\n";
        let sites = read_candidates(data.as_bytes()).unwrap();
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].cost_per_area, Some(5.5));
        assert_eq!(sites[1].cost_per_area, None);
        assert_eq!(sites[2].cost_per_area, None);
    }

    #[test]
    fn test_load_demand_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Longitude,Latitude,DemandLbs").unwrap();
        writeln!(file, "-87.6,41.8,10").unwrap();

        let points = load_demand(file.path()).unwrap();
        assert_eq!(points, vec![DemandPoint::new(-87.6, 41.8, 10.0)]);
    }
}
