//! Command implementations behind the `gmslicer` binary

use anyhow::{bail, Context};
use gmslicer_model::SnapshotModel;
use gmslicer_planner::{CommandTable, MotionSummary, RunReport};
use gmslicer_settings::Config;
use std::path::{Path, PathBuf};

/// Inputs for a slicing run
///
/// Every `Option` left unset falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct SliceOptions {
    /// Exported model snapshot (JSON)
    pub model: PathBuf,
    /// Config file; the platform default is used when absent
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub distance_per_rev: Option<f64>,
    pub steps_per_rev: Option<i64>,
    pub degrees_per_step: Option<f64>,
    pub layer_tolerance: Option<f64>,
}

impl SliceOptions {
    pub fn new(model: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Load the config and apply command-line overrides on top
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => match Config::default_path() {
                Ok(path) => Config::load_or_default(&path)?,
                Err(e) => {
                    tracing::debug!("{}, using defaults", e);
                    Config::default()
                }
            },
        };

        if let Some(value) = self.distance_per_rev {
            config.calibration.distance_per_rev = value;
        }
        if let Some(value) = self.steps_per_rev {
            config.calibration.steps_per_rev = value;
        }
        if let Some(value) = self.degrees_per_step {
            config.calibration.degrees_per_step = value;
        }
        if self.layer_tolerance.is_some() {
            config.traversal.layer_tolerance = self.layer_tolerance;
        }
        if let Some(path) = &self.output {
            config.output.table_path = path.clone();
        }
        if self.report.is_some() {
            config.output.report_path = self.report.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the pipeline, write the command table and optional report
pub fn slice(options: &SliceOptions) -> anyhow::Result<RunReport> {
    let config = options.resolve_config()?;
    let mut model = SnapshotModel::load(&options.model)
        .with_context(|| format!("Failed to load model {}", options.model.display()))?;

    let output = config.pipeline().run(&mut model)?;
    output.report.log_summary();

    output
        .table
        .save(&config.output.table_path)
        .with_context(|| {
            format!(
                "Failed to write command table {}",
                config.output.table_path.display()
            )
        })?;
    if let Some(path) = &config.output.report_path {
        output
            .report
            .save(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    Ok(output.report)
}

/// Load a command table and summarize the moves it would make
pub fn inspect(path: &Path) -> anyhow::Result<MotionSummary> {
    let table = CommandTable::load(path)
        .with_context(|| format!("Failed to read command table {}", path.display()))?;
    let summary = MotionSummary::from_table(&table)
        .with_context(|| format!("Cannot summarize command table {}", path.display()))?;
    Ok(summary)
}

/// Write a default config file, refusing to replace one unless `force` is set
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save_to_file(path)?;
    Ok(())
}
