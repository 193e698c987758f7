use std::fmt;

use serde::{Deserialize, Serialize};

/// Metric used when measuring between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    /// Straight-line distance.
    Euclidean,
    /// Axis-aligned distance; rail segments and walking both follow the
    /// grid, so this is the network's working metric.
    Manhattan,
}

/// A position on the map plane.
///
/// The plane is viewed from above: `x` grows to the east and `z` to the
/// south. There is no vertical component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord2D {
    pub x: f64,
    pub z: f64,
}

impl Coord2D {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Distance to `other` under the given metric.
    pub fn distance_to(&self, other: Coord2D, mode: DistanceMode) -> f64 {
        match mode {
            DistanceMode::Euclidean => {
                ((self.x - other.x).powi(2) + (self.z - other.z).powi(2)).sqrt()
            }
            DistanceMode::Manhattan => (self.x - other.x).abs() + (self.z - other.z).abs(),
        }
    }
}

impl fmt::Display for Coord2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Cross product of two position vectors: `a.z * b.x - a.x * b.z`.
///
/// Summed over consecutive corners of a closed run this doubles the
/// polygon's signed area; the sign tells the winding sense in the
/// x-east/z-south screen frame.
pub(crate) fn cross(a: Coord2D, b: Coord2D) -> f64 {
    a.z * b.x - a.x * b.z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_component_sum() {
        let a = Coord2D::new(0.0, 0.0);
        let b = Coord2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(b, DistanceMode::Manhattan), 7.0);
        assert_eq!(a.distance_to(b, DistanceMode::Euclidean), 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coord2D::new(-120.0, 35.5);
        let b = Coord2D::new(64.0, -7.25);
        assert_eq!(
            a.distance_to(b, DistanceMode::Manhattan),
            b.distance_to(a, DistanceMode::Manhattan)
        );
    }

    #[test]
    fn displays_as_pair() {
        assert_eq!(Coord2D::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
