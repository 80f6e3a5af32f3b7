//! Error types for the planner crate.
//!
//! This module provides structured error types for running the pipeline and
//! for reading and writing command tables.

use gmslicer_core::{Axis, CalibrationError, EncodeError, ModelError};
use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing a command table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The CSV data could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The table does not use the command table header.
    #[error("Unexpected table header: expected {expected}, found {found}")]
    Header { expected: String, found: String },

    /// A relative move or total step count does not fit in 64 bits.
    #[error("Step count overflow on axis {axis} at row {row}")]
    MotionOverflow { row: usize, axis: Axis },
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The model could not list its features.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Calibration constants are unusable.
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// A record could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// The layering tolerance is negative or not finite.
    #[error("Invalid layer tolerance: {0}")]
    InvalidLayering(f64),

    /// The command table could not be written.
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Result type alias for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;
