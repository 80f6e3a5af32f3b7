//! # GMSlicer
//!
//! Converts simulated magnetic domains into an ordered table of stepper-motor
//! targets for a magnet-placement curing rig.
//!
//! ## Architecture
//!
//! GMSlicer is organized as a workspace with multiple crates:
//!
//! 1. **gmslicer-core** - Domain types, errors, calibration and unit conversion
//! 2. **gmslicer-model** - Model session contract, snapshot model, extractors
//! 3. **gmslicer-planner** - Linking, traversal ordering, encoding, reports
//! 4. **gmslicer-settings** - Configuration files and validation
//! 5. **gmslicer** - Command-line binary that ties the crates together

pub mod commands;

pub use gmslicer_core::{
    Axis, CalibrationConstants, DomainGeometry, DomainId, DomainMagnetization, DomainRecord,
    Error, MotorCommandRow, Result, SphericalDirection, Vec3,
};
pub use gmslicer_model::{
    GeometryExtractor, MagnetizationExtractor, ModelSession, SelectionPolicy, SelectionStrategy,
    SnapshotModel,
};
pub use gmslicer_planner::{
    CommandEncoder, CommandTable, DomainLinker, LayeringPolicy, MotionSummary, Pipeline,
    PipelineOutput, RunReport, TraversalSorter,
};
pub use gmslicer_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so that command output on stdout stays clean. The
/// `RUST_LOG` environment variable overrides the default level, which is
/// `debug` when `verbose` is set and `info` otherwise.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
