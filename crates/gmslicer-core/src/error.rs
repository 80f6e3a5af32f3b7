//! Error handling for GMSlicer
//!
//! Provides error types for every stage of the domain pipeline:
//! - Model errors (queries against the simulation model)
//! - Extraction errors (malformed or missing feature attributes)
//! - Parse and degenerate-vector errors (magnetization input)
//! - Calibration and encoding errors (motor step quantization)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::data::Axis;
use thiserror::Error;

/// Model query error type
///
/// Represents a failed query against the simulation model. A failed query is
/// terminal for the feature being read, never for the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The model has no feature with this tag
    #[error("Unknown feature: {tag}")]
    UnknownFeature {
        /// The tag that was queried.
        tag: String,
    },

    /// The feature exists but does not declare the attribute
    #[error("Attribute '{attribute}' not set on feature {tag}")]
    MissingAttribute {
        /// The feature tag.
        tag: String,
        /// The attribute name.
        attribute: String,
    },

    /// Geometry re-evaluation failed
    #[error("Geometry recompute failed: {reason}")]
    RecomputeFailed {
        /// The reason reported by the model.
        reason: String,
    },

    /// Generic query failure
    #[error("Model query failed: {reason}")]
    QueryFailed {
        /// The reason reported by the model.
        reason: String,
    },
}

/// A numeric field held a non-numeric string
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot parse {field} value '{value}' as a number")]
pub struct ParseError {
    /// The field being parsed (e.g. `M[1]`).
    pub field: String,
    /// The offending raw value.
    pub value: String,
}

/// A magnetization vector with no defined direction
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Magnetization vector ({x}, {y}, {z}) has no defined direction")]
pub struct DegenerateVectorError {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

/// Extraction error type
///
/// Raised while reading a single geometry or physics feature. The feature tag
/// is carried by the surrounding failure record, not by the error itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Re-evaluation produced no domain entities for the feature
    #[error("Feature yielded no domain entities")]
    NoDomainEntities,

    /// The model returned a domain id that is not a valid non-negative id
    #[error("Invalid domain id {value}")]
    InvalidDomainId {
        /// The raw id value.
        value: i64,
    },

    /// A magnetization feature is not assigned to any domain
    #[error("Feature has no assigned domains")]
    NoAssignedDomains,

    /// A vector attribute has the wrong number of components
    #[error("Attribute '{attribute}' has {actual} components, expected {expected}")]
    WrongLength {
        /// The attribute name.
        attribute: String,
        /// Required component count.
        expected: usize,
        /// Component count found.
        actual: usize,
    },

    /// A vector attribute holds NaN or infinity
    #[error("Attribute '{attribute}' has a non-finite component")]
    NonFinite {
        /// The attribute name.
        attribute: String,
    },

    /// Model query failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Non-numeric magnetization component
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Zero-magnitude magnetization
    #[error(transparent)]
    DegenerateVector(#[from] DegenerateVectorError),
}

/// Calibration error type
///
/// A calibration constant is non-positive or non-finite. Encoding is aborted
/// entirely so that no table with undefined units is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Linear travel per motor revolution is invalid
    #[error("Distance per revolution must be > 0, got {value}")]
    DistancePerRev {
        /// The rejected value in meters.
        value: f64,
    },

    /// Motor steps per revolution is invalid
    #[error("Steps per revolution must be > 0, got {value}")]
    StepsPerRev {
        /// The rejected value.
        value: i64,
    },

    /// Angular resolution is invalid
    #[error("Degrees per step must be > 0, got {value}")]
    DegreesPerStep {
        /// The rejected value in degrees.
        value: f64,
    },
}

/// Encoding error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Calibration constants rejected before encoding started
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// A step count does not fit a signed 64-bit motor target
    #[error("Step count {value} for domain {domain_id} on axis {axis} is out of range")]
    StepOutOfRange {
        /// The domain being encoded.
        domain_id: u32,
        /// The offending axis.
        axis: Axis,
        /// The unquantized step value.
        value: f64,
    },
}

/// Main error type for GMSlicer
///
/// A unified error type that can represent any error from the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Model error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Extraction error
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Calibration error
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Encoding error
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error aborts encoding because of bad calibration
    pub fn is_calibration_error(&self) -> bool {
        matches!(
            self,
            Error::Calibration(_) | Error::Encode(EncodeError::Calibration(_))
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_display() {
        let err = ExtractionError::WrongLength {
            attribute: "pos".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Attribute 'pos' has 2 components, expected 3");

        let err: ExtractionError = ParseError {
            field: "M[0]".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Cannot parse M[0] value 'abc' as a number");
    }

    #[test]
    fn test_calibration_error_display() {
        let err = CalibrationError::StepsPerRev { value: 0 };
        assert_eq!(err.to_string(), "Steps per revolution must be > 0, got 0");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = CalibrationError::DegreesPerStep { value: -1.0 }.into();
        assert!(err.is_calibration_error());

        let err: Error = EncodeError::from(CalibrationError::DistancePerRev { value: 0.0 }).into();
        assert!(err.is_calibration_error());

        let err: Error = ModelError::UnknownFeature {
            tag: "blk9".to_string(),
        }
        .into();
        assert!(!err.is_calibration_error());
        assert_eq!(err.to_string(), "Unknown feature: blk9");
    }
}
