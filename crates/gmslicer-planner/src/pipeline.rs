//! Slicing pipeline
//!
//! Drives a model session through extraction, linking, ordering and
//! encoding, and collects everything that was skipped into a [`RunReport`].

use crate::encoder::CommandEncoder;
use crate::error::{PipelineError, PipelineResult};
use crate::linker::DomainLinker;
use crate::report::RunReport;
use crate::summary::MotionSummary;
use crate::table::CommandTable;
use crate::traversal::{LayeringPolicy, TraversalSorter};
use gmslicer_core::{CalibrationConstants, DomainRecord};
use gmslicer_model::{
    GeometryExtractor, LastEntity, MagnetizationExtractor, ModelSession, SelectionPolicy,
};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Linked records in traversal order
    pub records: Vec<DomainRecord>,
    /// One row per record, same order
    pub table: CommandTable,
    /// Skipped features, linkage problems and motion totals
    pub report: RunReport,
}

/// Complete model-to-table run
pub struct Pipeline<P = LastEntity> {
    calibration: CalibrationConstants,
    geometry: GeometryExtractor<P>,
    magnetization: MagnetizationExtractor,
    layering: LayeringPolicy,
}

impl Default for Pipeline<LastEntity> {
    fn default() -> Self {
        Self::new(
            CalibrationConstants::default(),
            GeometryExtractor::default(),
            MagnetizationExtractor::default(),
            LayeringPolicy::default(),
        )
    }
}

impl<P: SelectionPolicy> Pipeline<P> {
    pub fn new(
        calibration: CalibrationConstants,
        geometry: GeometryExtractor<P>,
        magnetization: MagnetizationExtractor,
        layering: LayeringPolicy,
    ) -> Self {
        Self {
            calibration,
            geometry,
            magnetization,
            layering,
        }
    }

    /// Replace the calibration constants
    pub fn with_calibration(mut self, calibration: CalibrationConstants) -> Self {
        self.calibration = calibration;
        self
    }

    /// Replace the layering policy
    pub fn with_layering(mut self, layering: LayeringPolicy) -> Self {
        self.layering = layering;
        self
    }

    pub fn calibration(&self) -> &CalibrationConstants {
        &self.calibration
    }

    pub fn layering(&self) -> LayeringPolicy {
        self.layering
    }

    /// Run the pipeline against a model session
    ///
    /// Calibration and layering are checked before the model is queried.
    /// Per-feature problems and linkage gaps are reported, not raised; only
    /// an unreadable feature list or an unencodable record aborts the run.
    pub fn run<S>(&self, session: &mut S) -> PipelineResult<PipelineOutput>
    where
        S: ModelSession + ?Sized,
    {
        self.calibration.validate()?;
        if let LayeringPolicy::Tolerance(eps) = self.layering {
            if !self.layering.is_valid() {
                return Err(PipelineError::InvalidLayering(eps));
            }
        }
        let encoder = CommandEncoder::new(self.calibration)?;
        let mut report = RunReport::new(self.calibration);
        tracing::info!(run = %report.run_id, calibration = %self.calibration, "Starting run");

        let geometry = self.geometry.extract(session)?;
        let magnetization = self.magnetization.extract(&*session)?;
        report.geometry_failures = geometry.failures;
        report.magnetization_failures = magnetization.failures;

        let linkage = DomainLinker::new().link(&geometry.items, &magnetization.items);
        report.linkage_gaps = linkage.gaps;
        report.duplicate_assignments = linkage.duplicate_assignments;
        report.duplicate_geometries = linkage.duplicate_geometries;
        report.unmagnetized_domains = linkage.unmagnetized;

        let records = TraversalSorter::new(self.layering).sorted(linkage.records);
        let table = encoder.encode(&records)?;

        let summary = MotionSummary::from_table(&table)?;
        report.rows_written = table.len();
        report.layer_count = summary.layer_count;
        report.total_steps = summary.total_steps;

        Ok(PipelineOutput {
            records,
            table,
            report,
        })
    }
}
