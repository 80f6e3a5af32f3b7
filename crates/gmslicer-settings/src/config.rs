//! Configuration for GMSlicer
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Calibration (linear and angular motor resolution)
//! - Extraction (which model features are read, domain selection)
//! - Traversal (layer grouping)
//! - Output (command table and report paths)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use gmslicer_core::units::{
    DEFAULT_DEGREES_PER_STEP, DEFAULT_DISTANCE_PER_REV, DEFAULT_STEPS_PER_REV,
};
use gmslicer_core::CalibrationConstants;
use gmslicer_model::{
    GeometryExtractor, MagnetizationExtractor, SelectionStrategy, DEFAULT_GEOMETRY_TAG_MARKER,
    DEFAULT_MAGNETIZATION_RELATION, DEFAULT_PHYSICS_TAG_MARKER,
};
use gmslicer_planner::{LayeringPolicy, Pipeline};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default command table file name
pub const DEFAULT_TABLE_PATH: &str = "gm_code.csv";

/// Rig calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    /// Linear travel per motor revolution (meters)
    #[serde(default = "default_distance_per_rev")]
    pub distance_per_rev: f64,
    /// Motor steps per revolution
    #[serde(default = "default_steps_per_rev")]
    pub steps_per_rev: i64,
    /// Head rotation per motor step (degrees)
    #[serde(default = "default_degrees_per_step")]
    pub degrees_per_step: f64,
}

fn default_distance_per_rev() -> f64 {
    DEFAULT_DISTANCE_PER_REV
}

fn default_steps_per_rev() -> i64 {
    DEFAULT_STEPS_PER_REV
}

fn default_degrees_per_step() -> f64 {
    DEFAULT_DEGREES_PER_STEP
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            distance_per_rev: DEFAULT_DISTANCE_PER_REV,
            steps_per_rev: DEFAULT_STEPS_PER_REV,
            degrees_per_step: DEFAULT_DEGREES_PER_STEP,
        }
    }
}

impl From<CalibrationSettings> for CalibrationConstants {
    fn from(settings: CalibrationSettings) -> Self {
        CalibrationConstants::new(
            settings.distance_per_rev,
            settings.steps_per_rev,
            settings.degrees_per_step,
        )
    }
}

/// Which model features are read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Tag fragment of domain-defining block features
    #[serde(default = "default_geometry_tag_marker")]
    pub geometry_tag_marker: String,
    /// Tag fragment of magnetic flux conservation features
    #[serde(default = "default_physics_tag_marker")]
    pub physics_tag_marker: String,
    /// Constitutive relation fragment marking magnetization-based features
    #[serde(default = "default_magnetization_relation")]
    pub magnetization_relation: String,
    /// Which domain entity of a block is authoritative
    #[serde(default)]
    pub selection: SelectionStrategy,
}

fn default_geometry_tag_marker() -> String {
    DEFAULT_GEOMETRY_TAG_MARKER.to_string()
}

fn default_physics_tag_marker() -> String {
    DEFAULT_PHYSICS_TAG_MARKER.to_string()
}

fn default_magnetization_relation() -> String {
    DEFAULT_MAGNETIZATION_RELATION.to_string()
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            geometry_tag_marker: default_geometry_tag_marker(),
            physics_tag_marker: default_physics_tag_marker(),
            magnetization_relation: default_magnetization_relation(),
            selection: SelectionStrategy::default(),
        }
    }
}

impl ExtractionSettings {
    /// Build the geometry extractor described by these settings
    pub fn geometry_extractor(&self) -> GeometryExtractor<SelectionStrategy> {
        GeometryExtractor::new(self.geometry_tag_marker.clone(), self.selection)
    }

    /// Build the magnetization extractor described by these settings
    pub fn magnetization_extractor(&self) -> MagnetizationExtractor {
        MagnetizationExtractor::new(
            self.physics_tag_marker.clone(),
            self.magnetization_relation.clone(),
        )
    }
}

/// Layer grouping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraversalSettings {
    /// Z values within this distance (meters) of a layer's first Z share the
    /// layer. Unset means exact equality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_tolerance: Option<f64>,
}

impl TraversalSettings {
    pub fn layering(&self) -> LayeringPolicy {
        LayeringPolicy::from_tolerance(self.layer_tolerance)
    }
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Command table CSV
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,
    /// Optional JSON run report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

fn default_table_path() -> PathBuf {
    PathBuf::from(DEFAULT_TABLE_PATH)
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            table_path: default_table_path(),
            report_path: None,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calibration: CalibrationSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub traversal: TraversalSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location, e.g. `~/.config/gmslicer/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gmslicer").join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("Could not determine config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calibration().validate()?;

        if let Some(tolerance) = self.traversal.layer_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: "traversal.layer_tolerance".to_string(),
                    value: tolerance.to_string(),
                });
            }
        }

        let markers = [
            ("extraction.geometry_tag_marker", &self.extraction.geometry_tag_marker),
            ("extraction.physics_tag_marker", &self.extraction.physics_tag_marker),
            ("extraction.magnetization_relation", &self.extraction.magnetization_relation),
        ];
        for (key, value) in markers {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key.to_string()));
            }
        }

        if self.output.table_path.as_os_str().is_empty() {
            return Err(ConfigError::Empty("output.table_path".to_string()));
        }

        Ok(())
    }

    /// Calibration constants for the encoder
    pub fn calibration(&self) -> CalibrationConstants {
        self.calibration.into()
    }

    /// Assemble the pipeline described by this config
    pub fn pipeline(&self) -> Pipeline<SelectionStrategy> {
        Pipeline::new(
            self.calibration(),
            self.extraction.geometry_extractor(),
            self.extraction.magnetization_extractor(),
            self.traversal.layering(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}
