//! GMSlicer Settings Crate
//!
//! Handles application configuration: loading, saving and validation, and
//! turning a config into a ready-to-run pipeline.

pub mod config;
pub mod error;

pub use config::{
    CalibrationSettings, Config, ExtractionSettings, OutputSettings, TraversalSettings,
    CONFIG_FILE_NAME, DEFAULT_TABLE_PATH,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
