//! Data models for simulated magnetic domains and motor commands
//!
//! This module provides:
//! - Domain identifiers and 3-axis vectors in the model frame
//! - Per-domain geometry and magnetization records as read from the model
//! - Linked domain records consumed by traversal and encoding
//! - Motor command rows (one per domain) written to the command table

pub mod spherical;

pub use spherical::{cartesian_to_spherical, SphericalDirection};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a domain in the simulation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub u32);

impl DomainId {
    /// Convert a raw model entity number into a domain id
    ///
    /// Returns `None` for negative values or values beyond `u32::MAX`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(DomainId)
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Motor-addressable axis of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Linear X stage
    X,
    /// Linear Y stage
    Y,
    /// Linear Z stage (layer height)
    Z,
    /// Print head inclination
    Theta,
    /// Print head azimuth
    Phi,
}

impl Axis {
    /// All axes in command table column order
    pub const ALL: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::Theta, Axis::Phi];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
            Axis::Theta => write!(f, "Theta"),
            Axis::Phi => write!(f, "Phi"),
        }
    }
}

/// A 3-component real vector in the model frame (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a vector from a slice holding exactly three components
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, z] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Distance from the Z axis, sqrt(x² + y²)
    pub fn radial(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Scale every component by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Geometry of one domain-defining block feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainGeometry {
    /// Authoritative domain id picked for the feature
    pub domain_id: DomainId,
    /// Tag of the geometry feature this domain came from
    pub tag: String,
    /// Block position in the model frame
    pub position: Vec3,
    /// Block extent in the model frame
    pub size: Vec3,
}

/// Magnetization direction assigned to one or more domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMagnetization {
    /// Tag of the physics feature that declares the magnetization
    pub tag: String,
    /// Domains covered by this magnetization, in model order
    pub domain_ids: Vec<DomainId>,
    /// Orientation of the magnetization vector
    pub direction: SphericalDirection,
}

/// A domain with both geometry and magnetization resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Domain id
    pub domain_id: DomainId,
    /// Block position in the model frame
    pub position: Vec3,
    /// Block extent in the model frame
    pub size: Vec3,
    /// Target head orientation
    pub direction: SphericalDirection,
}

impl DomainRecord {
    /// Combine a geometry entry with a magnetization direction
    pub fn link(geometry: &DomainGeometry, direction: SphericalDirection) -> Self {
        Self {
            domain_id: geometry.domain_id,
            position: geometry.position,
            size: geometry.size,
            direction,
        }
    }
}

/// One row of the command table: absolute motor targets for a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MotorCommandRow {
    /// X stage steps
    #[serde(rename = "X")]
    pub x: i64,
    /// Y stage steps
    #[serde(rename = "Y")]
    pub y: i64,
    /// Z stage steps
    #[serde(rename = "Z")]
    pub z: i64,
    /// Inclination motor steps
    #[serde(rename = "Theta")]
    pub theta: i64,
    /// Azimuth motor steps
    #[serde(rename = "Phi")]
    pub phi: i64,
}

impl MotorCommandRow {
    /// Column headers of the command table, in order
    pub const HEADER: [&'static str; 5] = ["X", "Y", "Z", "Theta", "Phi"];

    /// Step count for one axis
    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Theta => self.theta,
            Axis::Phi => self.phi,
        }
    }

    /// Step counts in column order
    pub fn as_array(&self) -> [i64; 5] {
        [self.x, self.y, self.z, self.theta, self.phi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_id_from_raw() {
        assert_eq!(DomainId::from_raw(7), Some(DomainId(7)));
        assert_eq!(DomainId::from_raw(-1), None);
        assert_eq!(DomainId::from_raw(i64::from(u32::MAX) + 1), None);
    }

    #[test]
    fn test_vec3_from_slice() {
        assert_eq!(Vec3::from_slice(&[1.0, 2.0, 3.0]), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Vec3::from_slice(&[1.0, 2.0]), None);
        assert_eq!(Vec3::from_slice(&[1.0, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn test_vec3_radial_ignores_z() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert_eq!(v.radial(), 5.0);
    }

    #[test]
    fn test_vec3_magnitude_does_not_overflow() {
        assert_eq!(Vec3::new(3.0, 4.0, 12.0).magnitude(), 13.0);
        assert!(Vec3::new(1.0e200, 1.0e200, 1.0e200).magnitude().is_finite());
    }

    #[test]
    fn test_command_row_column_order() {
        let row = MotorCommandRow {
            x: 1,
            y: 2,
            z: 3,
            theta: 4,
            phi: 5,
        };
        assert_eq!(row.as_array(), [1, 2, 3, 4, 5]);
        let by_axis: Vec<i64> = Axis::ALL.iter().map(|a| row.get(*a)).collect();
        assert_eq!(by_axis, vec![1, 2, 3, 4, 5]);
    }
}
