//! Cartesian to spherical conversion for magnetization vectors
//!
//! The rig orients its head with two motors, so only the direction of a
//! magnetization vector is kept. Magnitude is discarded.

use crate::data::Vec3;
use crate::error::DegenerateVectorError;
use serde::{Deserialize, Serialize};

/// Orientation as inclination/azimuth in degrees
///
/// `theta` lies in [0, 180] measured from +Z, `phi` lies in (-180, 180]
/// measured from +X towards +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SphericalDirection {
    /// Inclination in degrees
    pub theta: f64,
    /// Azimuth in degrees
    pub phi: f64,
}

impl SphericalDirection {
    /// Unit vector pointing along this direction
    pub fn to_unit_vector(&self) -> Vec3 {
        let theta = self.theta.to_radians();
        let phi = self.phi.to_radians();
        Vec3::new(
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        )
    }
}

/// Convert a Cartesian magnetization vector into spherical angles
///
/// r = sqrt(x²+y²+z²), θ = degrees(acos(z/r)), φ = degrees(atan2(y, x)).
/// Fails when the vector has zero length or a non-finite component, since
/// its direction is undefined.
pub fn cartesian_to_spherical(v: Vec3) -> Result<SphericalDirection, DegenerateVectorError> {
    let r = v.magnitude();
    if !v.is_finite() || !r.is_finite() || r == 0.0 {
        return Err(DegenerateVectorError {
            x: v.x,
            y: v.y,
            z: v.z,
        });
    }

    // Rounding can push |z/r| a hair past 1 for axis-aligned vectors
    let cos_theta = (v.z / r).clamp(-1.0, 1.0);
    let theta = cos_theta.acos().to_degrees();

    let mut phi = v.y.atan2(v.x).to_degrees();
    if phi <= -180.0 {
        phi += 360.0;
    }

    Ok(SphericalDirection { theta, phi })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_vectors() {
        let up = cartesian_to_spherical(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(up, SphericalDirection { theta: 0.0, phi: 0.0 });

        let x = cartesian_to_spherical(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(x, SphericalDirection { theta: 90.0, phi: 0.0 });

        let y = cartesian_to_spherical(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert_eq!(y, SphericalDirection { theta: 90.0, phi: 90.0 });

        let down = cartesian_to_spherical(Vec3::new(0.0, 0.0, -2.0)).unwrap();
        assert_eq!(down.theta, 180.0);
    }

    #[test]
    fn test_magnitude_is_discarded() {
        let small = cartesian_to_spherical(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let large = cartesian_to_spherical(Vec3::new(1.0e5, 1.0e5, 0.0)).unwrap();
        assert_eq!(small, large);
        assert_eq!(small.phi, 45.0);
    }

    #[test]
    fn test_negative_x_axis_maps_to_positive_180() {
        let dir = cartesian_to_spherical(Vec3::new(-1.0, -0.0, 0.0)).unwrap();
        assert_eq!(dir.phi, 180.0);
        let dir = cartesian_to_spherical(Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        assert_eq!(dir.phi, 180.0);
    }

    #[test]
    fn test_huge_components_keep_direction() {
        let dir = cartesian_to_spherical(Vec3::new(1.0e200, 0.0, 1.0e200)).unwrap();
        assert!((dir.theta - 45.0).abs() < 1e-9);
        assert_eq!(dir.phi, 0.0);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        let err = cartesian_to_spherical(Vec3::new(0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            DegenerateVectorError {
                x: 0.0,
                y: 0.0,
                z: 0.0
            }
        );
    }

    #[test]
    fn test_non_finite_vector_is_degenerate() {
        assert!(cartesian_to_spherical(Vec3::new(f64::NAN, 0.0, 1.0)).is_err());
        assert!(cartesian_to_spherical(Vec3::new(f64::INFINITY, 0.0, 1.0)).is_err());
    }

    #[test]
    fn test_unit_vector_round_trip() {
        let dir = SphericalDirection {
            theta: 60.0,
            phi: -30.0,
        };
        let back = cartesian_to_spherical(dir.to_unit_vector()).unwrap();
        assert!((back.theta - 60.0).abs() < 1e-9);
        assert!((back.phi + 30.0).abs() < 1e-9);
    }
}
