//! Motor command encoding
//!
//! Quantizes each domain's position and head angles into absolute motor
//! step targets. Rows are emitted in the order given.

use crate::table::CommandTable;
use gmslicer_core::{
    truncate_steps, Axis, CalibrationConstants, DomainRecord, EncodeError, MotorCommandRow,
};

/// Converts ordered domain records into a command table
#[derive(Debug, Clone, Copy)]
pub struct CommandEncoder {
    calibration: CalibrationConstants,
}

impl CommandEncoder {
    /// Create an encoder, rejecting invalid calibration up front
    pub fn new(calibration: CalibrationConstants) -> Result<Self, EncodeError> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    /// Calibration in use
    pub fn calibration(&self) -> &CalibrationConstants {
        &self.calibration
    }

    /// Encode a single record
    pub fn encode_record(&self, record: &DomainRecord) -> Result<MotorCommandRow, EncodeError> {
        let c = &self.calibration;
        let step = |axis: Axis, value: f64| {
            truncate_steps(value).ok_or(EncodeError::StepOutOfRange {
                domain_id: record.domain_id.0,
                axis,
                value,
            })
        };

        Ok(MotorCommandRow {
            x: step(Axis::X, c.distance_to_steps(record.position.x))?,
            y: step(Axis::Y, c.distance_to_steps(record.position.y))?,
            z: step(Axis::Z, c.distance_to_steps(record.position.z))?,
            theta: step(Axis::Theta, c.angle_to_steps(record.direction.theta))?,
            phi: step(Axis::Phi, c.angle_to_steps(record.direction.phi))?,
        })
    }

    /// Encode every record, preserving order
    ///
    /// Fails on the first record that cannot be encoded; no partial table is
    /// returned.
    pub fn encode(&self, records: &[DomainRecord]) -> Result<CommandTable, EncodeError> {
        let mut table = CommandTable::with_capacity(records.len());
        for record in records {
            let row = self.encode_record(record)?;
            tracing::debug!(domain = %record.domain_id, ?row, "Encoded domain");
            table.push(row);
        }
        tracing::info!(rows = table.len(), calibration = %self.calibration, "Encoded command table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmslicer_core::{CalibrationError, DomainId, SphericalDirection, Vec3};

    fn record(position: Vec3, theta: f64, phi: f64) -> DomainRecord {
        DomainRecord {
            domain_id: DomainId(1),
            position,
            size: Vec3::new(1.0e-3, 1.0e-3, 1.0e-3),
            direction: SphericalDirection { theta, phi },
        }
    }

    #[test]
    fn test_reference_calibration() {
        let encoder = CommandEncoder::new(CalibrationConstants::default()).unwrap();
        let row = encoder
            .encode_record(&record(Vec3::new(1.0, 0.0, 0.0015), 90.0, 45.0))
            .unwrap();
        assert_eq!(
            row,
            MotorCommandRow {
                x: 266666,
                y: 0,
                z: 400,
                theta: 200,
                phi: 100
            }
        );
    }

    #[test]
    fn test_negative_values_truncate_toward_zero() {
        let encoder = CommandEncoder::new(CalibrationConstants::new(1.0, 10, 1.0)).unwrap();
        let row = encoder
            .encode_record(&record(Vec3::new(-0.19, 0.0, 0.0), 0.0, -90.5))
            .unwrap();
        assert_eq!(row.x, -1);
        assert_eq!(row.phi, -90);
    }

    #[test]
    fn test_same_steps_in_meters_and_millimeters() {
        let meters = CommandEncoder::new(CalibrationConstants::new(3.0e-3, 800, 0.45)).unwrap();
        let millimeters = CommandEncoder::new(CalibrationConstants::new(3.0, 800, 0.45)).unwrap();
        let a = meters
            .encode_record(&record(Vec3::new(0.0954, 0.0, 0.0), 0.0, 0.0))
            .unwrap();
        let b = millimeters
            .encode_record(&record(Vec3::new(95.4, 0.0, 0.0), 0.0, 0.0))
            .unwrap();
        assert_eq!(a.x, 25440);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let err = CommandEncoder::new(CalibrationConstants::new(3.0e-3, 0, 0.45)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Calibration(CalibrationError::StepsPerRev { value: 0 })
        );
    }

    #[test]
    fn test_step_overflow_reported() {
        let encoder = CommandEncoder::new(CalibrationConstants::new(1.0e-300, 800, 0.45)).unwrap();
        let err = encoder
            .encode_record(&record(Vec3::new(1.0, 0.0, 0.0), 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::StepOutOfRange { axis: Axis::X, .. }
        ));
    }
}
