use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Rejected polygon input. Indicates a bug in the caller or bad source data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("polygon ring has no points")]
    EmptyRing,
    #[error("malformed position at index {index}: expected at least two finite numbers")]
    MalformedPosition { index: usize },
    #[error("coordinates are not nested as the geometry type requires")]
    MalformedCoordinates,
}

/// A point in map order: latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `[lat, lon]`, the order Leaflet expects.
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// How a dataset picks the point its marker sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorStrategy {
    #[default]
    TopLeft,
    Centroid,
}

impl AnchorStrategy {
    pub fn anchor(self, ring: &[Coord<f64>]) -> Result<LatLon, GeometryError> {
        match self {
            AnchorStrategy::TopLeft => top_left_corner(ring),
            AnchorStrategy::Centroid => centroid(ring),
        }
    }
}

/// Northernmost point of the ring, westernmost among exact latitude ties.
///
/// Always returns one of the input points, swapped to `[lat, lon]`.
pub fn top_left_corner(ring: &[Coord<f64>]) -> Result<LatLon, GeometryError> {
    let (first, rest) = ring.split_first().ok_or(GeometryError::EmptyRing)?;

    let top_left = rest.iter().fold(*first, |best, &c| {
        if c.y > best.y || (c.y == best.y && c.x < best.x) {
            c
        } else {
            best
        }
    });

    Ok(LatLon::new(top_left.y, top_left.x))
}

/// Vertex average of the ring.
///
/// This is not the area-weighted centroid: every listed vertex counts once,
/// including a repeated closing point. Good enough for placing a marker on
/// regular shapes.
pub fn centroid(ring: &[Coord<f64>]) -> Result<LatLon, GeometryError> {
    if ring.is_empty() {
        return Err(GeometryError::EmptyRing);
    }

    let (sum_x, sum_y) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
    let n = ring.len() as f64;

    Ok(LatLon::new(sum_y / n, sum_x / n))
}

/// Convert GeoJSON positions (`[x, y, ...]`) into ring coordinates.
///
/// Altitude and any further members are ignored. Anything that is not an
/// array of at least two numbers is rejected.
pub fn ring_from_positions(positions: &[Value]) -> Result<Vec<Coord<f64>>, GeometryError> {
    positions
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let members = p.as_array().map(Vec::as_slice).unwrap_or_default();
            match members {
                [x, y, ..] => match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
                    _ => Err(GeometryError::MalformedPosition { index }),
                },
                _ => Err(GeometryError::MalformedPosition { index }),
            }
        })
        .collect()
}
