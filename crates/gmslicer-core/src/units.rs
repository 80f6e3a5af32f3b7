//! Motor unit conversion utilities
//!
//! Handles conversion between physical quantities (meters, degrees) and
//! discrete stepper-motor pulses. Quantization truncates toward zero; each
//! command is an absolute target, so no error is carried between domains.

use crate::error::CalibrationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default linear travel per lead-screw revolution (meters)
pub const DEFAULT_DISTANCE_PER_REV: f64 = 3.0e-3;
/// Default full steps per motor revolution (with microstepping)
pub const DEFAULT_STEPS_PER_REV: i64 = 800;
/// Default head rotation per step (degrees)
pub const DEFAULT_DEGREES_PER_STEP: f64 = 0.45;

/// Rig calibration used to quantize positions and angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConstants {
    /// Linear travel per motor revolution (meters)
    pub distance_per_rev: f64,
    /// Motor steps per revolution
    pub steps_per_rev: i64,
    /// Head rotation per motor step (degrees)
    pub degrees_per_step: f64,
}

impl Default for CalibrationConstants {
    fn default() -> Self {
        Self {
            distance_per_rev: DEFAULT_DISTANCE_PER_REV,
            steps_per_rev: DEFAULT_STEPS_PER_REV,
            degrees_per_step: DEFAULT_DEGREES_PER_STEP,
        }
    }
}

impl fmt::Display for CalibrationConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} m/rev, {} steps/rev, {} deg/step",
            self.distance_per_rev, self.steps_per_rev, self.degrees_per_step
        )
    }
}

impl CalibrationConstants {
    /// Create calibration constants without validating them
    pub fn new(distance_per_rev: f64, steps_per_rev: i64, degrees_per_step: f64) -> Self {
        Self {
            distance_per_rev,
            steps_per_rev,
            degrees_per_step,
        }
    }

    /// Reject non-positive or non-finite constants
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !(self.distance_per_rev.is_finite() && self.distance_per_rev > 0.0) {
            return Err(CalibrationError::DistancePerRev {
                value: self.distance_per_rev,
            });
        }
        if self.steps_per_rev <= 0 {
            return Err(CalibrationError::StepsPerRev {
                value: self.steps_per_rev,
            });
        }
        if !(self.degrees_per_step.is_finite() && self.degrees_per_step > 0.0) {
            return Err(CalibrationError::DegreesPerStep {
                value: self.degrees_per_step,
            });
        }
        Ok(())
    }

    /// Unquantized steps for a linear position: S × (meters / D)
    pub fn distance_to_steps(&self, meters: f64) -> f64 {
        self.steps_per_rev as f64 * (meters / self.distance_per_rev)
    }

    /// Unquantized steps for an angle: degrees / A
    pub fn angle_to_steps(&self, degrees: f64) -> f64 {
        degrees / self.degrees_per_step
    }

    /// Linear position reached by a step count (meters)
    pub fn steps_to_distance(&self, steps: i64) -> f64 {
        steps as f64 / self.steps_per_rev as f64 * self.distance_per_rev
    }

    /// Angle reached by a step count (degrees)
    pub fn steps_to_degrees(&self, steps: i64) -> f64 {
        steps as f64 * self.degrees_per_step
    }
}

/// Relative distance from an integer below which a step value counts as
/// that integer
pub const STEP_SNAP_TOLERANCE: f64 = 1.0e-9;

/// Truncate a step value toward zero
///
/// Values within [`STEP_SNAP_TOLERANCE`] (relative) of an integer are taken
/// as that integer first, so `S × (p / D)` gives the same count whatever
/// length unit `p` and `D` share. Returns `None` when the value is not
/// finite or does not fit in `i64`.
pub fn truncate_steps(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let nearest = value.round();
    let truncated = if (value - nearest).abs() <= STEP_SNAP_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        value.trunc()
    };
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calibration_is_valid() {
        assert!(CalibrationConstants::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let c = CalibrationConstants::new(0.0, 800, 0.45);
        assert_eq!(
            c.validate(),
            Err(CalibrationError::DistancePerRev { value: 0.0 })
        );

        let c = CalibrationConstants::new(3.0e-3, -5, 0.45);
        assert_eq!(c.validate(), Err(CalibrationError::StepsPerRev { value: -5 }));

        let c = CalibrationConstants::new(3.0e-3, 800, -0.45);
        assert_eq!(
            c.validate(),
            Err(CalibrationError::DegreesPerStep { value: -0.45 })
        );
    }

    #[test]
    fn test_validate_rejects_nan() {
        let c = CalibrationConstants::new(f64::NAN, 800, 0.45);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_truncate_toward_zero() {
        assert_eq!(truncate_steps(266666.67), Some(266666));
        assert_eq!(truncate_steps(-1.9), Some(-1));
        assert_eq!(truncate_steps(0.999), Some(0));
        assert_eq!(truncate_steps(f64::NAN), None);
        assert_eq!(truncate_steps(1.0e19), None);
        assert_eq!(truncate_steps(-1.0e19), None);
    }

    #[test]
    fn test_reference_conversion() {
        let c = CalibrationConstants::default();
        assert_eq!(truncate_steps(c.distance_to_steps(1.0)), Some(266666));
        assert_eq!(truncate_steps(c.angle_to_steps(90.0)), Some(200));
        assert_eq!(truncate_steps(c.distance_to_steps(0.0015)), Some(400));
    }

    #[test]
    fn test_rounding_error_below_integer_is_snapped() {
        assert_eq!(truncate_steps(25439.999999999996), Some(25440));
        assert_eq!(truncate_steps(-25439.999999999996), Some(-25440));
        assert_eq!(truncate_steps(25439.9999), Some(25439));
        assert_eq!(truncate_steps(0.999999), Some(0));
    }

    #[test]
    fn test_length_unit_does_not_change_steps() {
        let meters = CalibrationConstants::default();
        let millimeters = CalibrationConstants::new(3.0, 800, 0.45);
        assert_eq!(truncate_steps(meters.distance_to_steps(0.0954)), Some(25440));
        assert_eq!(truncate_steps(millimeters.distance_to_steps(95.4)), Some(25440));
    }
}
