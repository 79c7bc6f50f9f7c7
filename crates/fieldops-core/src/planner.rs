//! Reference route generation used by the in-memory planner.
//!
//! Real deployments consume a remote planner; this keeps local development and
//! tests independent of it while producing plausible routes.

use crate::geometry::{self, Bounds, GeometryError, GeometryKind};
use crate::models::{Coordinate, MissionType};

const METERS_PER_DEG_LAT: f64 = 111_320.0;
/// Distance between two sweep passes
pub const DEFAULT_SWATH_M: f64 = 30.0;
const MAX_SWEEP_ROWS: usize = 500;

/// Route for `mission_type` over a field boundary.
pub fn plan_route(
    boundary: &[Coordinate],
    mission_type: MissionType,
    swath_m: f64,
) -> Result<Vec<Coordinate>, GeometryError> {
    geometry::validate(GeometryKind::Boundary, boundary)?;
    Ok(match mission_type {
        MissionType::Patrol => perimeter_loop(boundary),
        MissionType::Research => sweep(boundary, swath_m),
    })
}

/// The boundary flown once, returning to the first vertex.
fn perimeter_loop(boundary: &[Coordinate]) -> Vec<Coordinate> {
    let mut route = boundary.to_vec();
    if let Some(&first) = boundary.first() {
        route.push(first);
    }
    route
}

/// Back-and-forth passes along parallels, each spanning the row between its
/// outermost boundary crossings.
fn sweep(boundary: &[Coordinate], swath_m: f64) -> Vec<Coordinate> {
    let Some(bounds) = Bounds::from_coordinates(boundary) else {
        return Vec::new();
    };

    let spacing_deg = swath_m.max(1.0) / METERS_PER_DEG_LAT;
    let height = bounds.north - bounds.south;
    let rows = ((height / spacing_deg).floor() as usize).clamp(1, MAX_SWEEP_ROWS);
    let step = height / rows as f64;

    let mut route = Vec::with_capacity(rows * 2);
    for row in 0..rows {
        let lat = bounds.south + step * (row as f64 + 0.5);
        let Some((west, east)) = row_extent(boundary, lat) else {
            continue;
        };
        let (from, to) = if route.len() % 4 == 0 {
            (west, east)
        } else {
            (east, west)
        };
        route.push(Coordinate::new(lat, from));
        route.push(Coordinate::new(lat, to));
    }
    route
}

fn row_extent(boundary: &[Coordinate], lat: f64) -> Option<(f64, f64)> {
    let n = boundary.len();
    let mut extent: Option<(f64, f64)> = None;

    for i in 0..n {
        let a = boundary[i];
        let b = boundary[(i + 1) % n];
        if (a.latitude > lat) == (b.latitude > lat) {
            continue;
        }
        let t = (lat - a.latitude) / (b.latitude - a.latitude);
        let lon = a.longitude + t * (b.longitude - a.longitude);
        extent = Some(match extent {
            Some((west, east)) => (west.min(lon), east.max(lon)),
            None => (lon, lon),
        });
    }

    extent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec<Coordinate> {
        // roughly 220 m x 130 m
        vec![
            Coordinate::new(55.7500, 37.6100),
            Coordinate::new(55.7520, 37.6100),
            Coordinate::new(55.7520, 37.6120),
            Coordinate::new(55.7500, 37.6120),
        ]
    }

    #[test]
    fn patrol_closes_the_perimeter() {
        let route = plan_route(&field(), MissionType::Patrol, DEFAULT_SWATH_M).unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.first(), route.last());
    }

    #[test]
    fn research_sweeps_inside_the_boundary() {
        let boundary = field();
        let bounds = Bounds::from_coordinates(&boundary).unwrap();
        let route = plan_route(&boundary, MissionType::Research, DEFAULT_SWATH_M).unwrap();

        assert!(route.len() >= 4);
        assert_eq!(route.len() % 2, 0);
        assert!(route.iter().all(|c| {
            (bounds.south..=bounds.north).contains(&c.latitude)
                && (bounds.west..=bounds.east).contains(&c.longitude)
        }));
        // passes alternate direction
        assert!(route[0].longitude < route[1].longitude);
        assert!(route[2].longitude > route[3].longitude);
    }

    #[test]
    fn rejects_degenerate_boundaries() {
        let err = plan_route(&field()[..2], MissionType::Research, DEFAULT_SWATH_M).unwrap_err();
        assert!(matches!(err, GeometryError::TooFewPoints { .. }));
    }
}
