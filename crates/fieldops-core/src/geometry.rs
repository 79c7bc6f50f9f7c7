//! Geometry rules for field boundaries and mission routes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Coordinate;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Which kind of sequence a coordinate list represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Closed polygon around a field
    Boundary,
    /// Open polyline flown by a drone
    Route,
}

impl GeometryKind {
    /// Minimum number of points that may be persisted.
    pub fn min_points(self) -> usize {
        match self {
            GeometryKind::Boundary => 3,
            GeometryKind::Route => 0,
        }
    }

    /// Whether a sequence of `len` points draws anything on the map.
    pub fn is_renderable(self, len: usize) -> bool {
        match self {
            GeometryKind::Boundary => len >= 3,
            GeometryKind::Route => len >= 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{kind:?} needs at least {min} points, got {actual}")]
    TooFewPoints {
        kind: GeometryKind,
        min: usize,
        actual: usize,
    },
    #[error("point {index} is not a valid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
}

/// Check that a sequence may be saved as the given kind.
pub fn validate(kind: GeometryKind, coordinates: &[Coordinate]) -> Result<(), GeometryError> {
    if coordinates.len() < kind.min_points() {
        return Err(GeometryError::TooFewPoints {
            kind,
            min: kind.min_points(),
            actual: coordinates.len(),
        });
    }

    for (index, c) in coordinates.iter().enumerate() {
        let lat_ok = c.latitude.is_finite() && c.latitude.abs() <= 90.0;
        let lon_ok = c.longitude.is_finite() && c.longitude.abs() <= 180.0;
        if !lat_ok || !lon_ok {
            return Err(GeometryError::InvalidCoordinate {
                index,
                latitude: c.latitude,
                longitude: c.longitude,
            });
        }
    }

    Ok(())
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Bounding box of a sequence, `None` when it is empty.
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Option<Self> {
        let first = coordinates.first()?;
        let initial = Bounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };

        Some(coordinates.iter().skip(1).fold(initial, |b, c| Bounds {
            south: b.south.min(c.latitude),
            west: b.west.min(c.longitude),
            north: b.north.max(c.latitude),
            east: b.east.max(c.longitude),
        }))
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Calculate distance between two points in meters (Haversine formula).
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Total flown length of a route in meters.
pub fn route_length_m(route: &[Coordinate]) -> f64 {
    route
        .windows(2)
        .map(|pair| {
            haversine_distance(
                pair[0].latitude,
                pair[0].longitude,
                pair[1].latitude,
                pair[1].longitude,
            )
        })
        .sum()
}
