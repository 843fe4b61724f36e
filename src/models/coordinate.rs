use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate ingested from a "lat,long" line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
#[error("origin or destination invalid: {value:?}")]
pub struct CoordinateError {
    pub value: String,
}

impl GeoPoint {
    /// Parses the "latitude,longitude" syntax used by coordinate files and
    /// routing providers.
    pub fn parse(value: &str) -> Result<Self, CoordinateError> {
        let invalid = || CoordinateError {
            value: value.to_string(),
        };

        let (lat, lng) = value.trim().split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }

        Ok(Self { lat, lng })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A planar node coordinate from a synthetic instance, optionally 3-D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance truncated to an integer value. The z axis
    /// participates only when both endpoints carry it.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => a - b,
            _ => 0.0,
        };

        (dx * dx + dy * dy + dz * dz).sqrt().floor()
    }
}
