// Free-text coordinate list parsing

use tracing::debug;

use crate::models::{Location, SupplyPoint};

fn parse_fields(line: &str) -> Option<Vec<f64>> {
    line.split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect()
}

/// Parses "lon,lat" per line, skipping lines that don't hold exactly two numbers
pub fn parse_fixed_facilities(text: &str) -> Vec<Location> {
    let mut locations = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_fields(line).as_deref() {
            Some(&[lon, lat]) if Location::new(lon, lat).is_valid() => {
                locations.push(Location::new(lon, lat))
            }
            _ => debug!(line = line_no + 1, "skipping malformed fixed facility line"),
        }
    }

    locations
}

/// Parses "lon,lat,percent" per line, percent in 0..=100 stored as a fraction
pub fn parse_supply_points(text: &str) -> Vec<SupplyPoint> {
    let mut points = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_fields(line).as_deref() {
            Some(&[lon, lat, percent])
                if Location::new(lon, lat).is_valid() && (0.0..=100.0).contains(&percent) =>
            {
                points.push(SupplyPoint::new(lon, lat, percent / 100.0))
            }
            _ => debug!(line = line_no + 1, "skipping malformed supply point line"),
        }
    }

    points
}
