//! JSON configuration for a match analysis session.

use court_analytics_events::{EventParams, EventParamsError};
use log::LevelFilter;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(thiserror::Error, Debug)]
pub enum AnalyticsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("video.processing_fps must be finite and > 0 (got {0})")]
    InvalidFps(f64),
    #[error(transparent)]
    Events(#[from] EventParamsError),
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

fn default_processing_fps() -> f64 {
    30.0
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Frame rate used to turn frame indices into timestamps.
    #[serde(default = "default_processing_fps")]
    pub processing_fps: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            processing_fps: default_processing_fps(),
        }
    }
}

/// Operator-supplied court reference points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Pixel positions of the court corners, ordered TL, TR, BR, BL.
    pub image_points: [[f64; 2]; 4],
}

impl CalibrationConfig {
    pub fn points(&self) -> [Point2<f64>; 4] {
        self.image_points.map(|[x, y]| Point2::new(x, y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level applied to every target without an override.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-target levels, e.g. `{"court_analytics_events": "debug"}`. A
    /// target also covers its submodules.
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            targets: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.level)
    }

    /// Parsed per-target overrides, ordered by target.
    pub fn target_filters(&self) -> Result<Vec<(&str, LevelFilter)>, ConfigError> {
        self.targets
            .iter()
            .map(|(target, level)| parse_level(level).map(|filter| (target.as_str(), filter)))
            .collect()
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))
}

/// Session configuration. Every field has a default, so `{}` is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub events: EventParams,
    #[serde(default)]
    pub calibration: Option<CalibrationConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl AnalyticsConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AnalyticsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("court_analytics_report.json"))
    }

    /// Reject malformed values. Geometry of `calibration` is checked when the
    /// session calibrates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fps = self.video.processing_fps;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConfigError::InvalidFps(fps));
        }
        self.events.validate()?;
        self.logging.level_filter()?;
        self.logging.target_filters()?;
        Ok(())
    }
}
