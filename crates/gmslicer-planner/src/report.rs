//! Run report
//!
//! Everything a run skipped or resolved on its own, so the operator can see
//! which tags and domain ids did not make it into the command table.

use crate::linker::{DuplicateAssignment, DuplicateGeometry, LinkageGap};
use crate::summary::AxisTotals;
use chrono::{DateTime, Utc};
use gmslicer_core::{CalibrationConstants, DomainId};
use gmslicer_model::FeatureFailure;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tags every log line of the run
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Constants the table was encoded with
    pub calibration: CalibrationConstants,
    /// Block features that could not be read
    pub geometry_failures: Vec<FeatureFailure>,
    /// Magnetization features that could not be read
    pub magnetization_failures: Vec<FeatureFailure>,
    /// Magnetized domain ids with no geometry
    pub linkage_gaps: Vec<LinkageGap>,
    /// Domain ids claimed by more than one magnetization feature
    pub duplicate_assignments: Vec<DuplicateAssignment>,
    /// Domain ids resolved by more than one block
    pub duplicate_geometries: Vec<DuplicateGeometry>,
    /// Geometry left out because nothing magnetizes it
    pub unmagnetized_domains: Vec<DomainId>,
    /// Rows in the command table
    pub rows_written: usize,
    /// Distinct Z targets in the command table
    pub layer_count: usize,
    /// Absolute steps each motor travels over the table
    pub total_steps: AxisTotals,
}

impl RunReport {
    /// Start an empty report for a run using `calibration`
    pub fn new(calibration: CalibrationConstants) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            calibration,
            geometry_failures: Vec::new(),
            magnetization_failures: Vec::new(),
            linkage_gaps: Vec::new(),
            duplicate_assignments: Vec::new(),
            duplicate_geometries: Vec::new(),
            unmagnetized_domains: Vec::new(),
            rows_written: 0,
            layer_count: 0,
            total_steps: AxisTotals::default(),
        }
    }

    /// True when no feature failed, every magnetized id was linked and no
    /// assignment conflicted
    ///
    /// Unmagnetized geometry does not make a run unclean.
    pub fn is_clean(&self) -> bool {
        self.geometry_failures.is_empty()
            && self.magnetization_failures.is_empty()
            && self.linkage_gaps.is_empty()
            && self.duplicate_assignments.is_empty()
            && self.duplicate_geometries.is_empty()
    }

    /// Number of distinct problems recorded
    pub fn issue_count(&self) -> usize {
        self.geometry_failures.len()
            + self.magnetization_failures.len()
            + self.linkage_gaps.len()
            + self.duplicate_assignments.len()
            + self.duplicate_geometries.len()
    }

    /// Log every skipped tag and id with its reason
    pub fn log_summary(&self) {
        for failure in &self.geometry_failures {
            tracing::warn!(run = %self.run_id, tag = %failure.tag, reason = %failure.error, "Geometry feature skipped");
        }
        for failure in &self.magnetization_failures {
            tracing::warn!(run = %self.run_id, tag = %failure.tag, reason = %failure.error, "Magnetization feature skipped");
        }
        for gap in &self.linkage_gaps {
            tracing::warn!(run = %self.run_id, domain = %gap.domain_id, tag = %gap.magnetization_tag, "Domain has no geometry");
        }
        for duplicate in &self.duplicate_assignments {
            tracing::warn!(run = %self.run_id, "{}", duplicate);
        }
        for duplicate in &self.duplicate_geometries {
            tracing::warn!(
                run = %self.run_id,
                domain = %duplicate.domain_id,
                kept = %duplicate.kept_tag,
                dropped = %duplicate.dropped_tag,
                "Duplicate geometry"
            );
        }
        if !self.unmagnetized_domains.is_empty() {
            tracing::info!(
                run = %self.run_id,
                domains = ?self.unmagnetized_domains,
                "Geometry without magnetization left out"
            );
        }

        if self.is_clean() {
            tracing::info!(run = %self.run_id, rows = self.rows_written, layers = self.layer_count, "Run complete");
        } else {
            tracing::warn!(
                run = %self.run_id,
                rows = self.rows_written,
                issues = self.issue_count(),
                "Run complete with skipped data"
            );
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "Wrote run report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmslicer_core::ExtractionError;

    #[test]
    fn test_new_report_is_clean() {
        let report = RunReport::new(CalibrationConstants::default());
        assert!(report.is_clean());
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn test_unmagnetized_alone_stays_clean() {
        let mut report = RunReport::new(CalibrationConstants::default());
        report.unmagnetized_domains.push(DomainId(4));
        assert!(report.is_clean());
    }

    #[test]
    fn test_failures_make_report_unclean() {
        let mut report = RunReport::new(CalibrationConstants::default());
        report.geometry_failures.push(FeatureFailure {
            tag: "blk7".to_string(),
            error: ExtractionError::NoDomainEntities,
        });
        report.linkage_gaps.push(LinkageGap {
            domain_id: DomainId(99),
            magnetization_tag: "mfc1".to_string(),
        });
        assert!(!report.is_clean());
        assert_eq!(report.issue_count(), 2);
    }

    #[test]
    fn test_json_names_skipped_tags() {
        let mut report = RunReport::new(CalibrationConstants::default());
        report.geometry_failures.push(FeatureFailure {
            tag: "blk7".to_string(),
            error: ExtractionError::NoDomainEntities,
        });
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["geometry_failures"][0]["tag"], "blk7");
        assert_eq!(value["run_id"], report.run_id.to_string());
    }
}
