//! # GMSlicer Core
//!
//! Core types, errors, and utilities for GMSlicer.
//! Provides the domain data model shared by the extractors, the traversal
//! planner and the command encoder, plus conversion from physical units to
//! motor steps.

pub mod data;
pub mod error;
pub mod units;

pub use data::{
    cartesian_to_spherical, Axis, DomainGeometry, DomainId, DomainMagnetization, DomainRecord,
    MotorCommandRow, SphericalDirection, Vec3,
};

pub use error::{
    CalibrationError, DegenerateVectorError, EncodeError, Error, ExtractionError, ModelError,
    ParseError, Result,
};

pub use units::{truncate_steps, CalibrationConstants, STEP_SNAP_TOLERANCE};
