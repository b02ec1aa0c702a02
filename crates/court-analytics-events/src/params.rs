use serde::{Deserialize, Serialize};

fn default_min_rally_duration() -> f64 {
    3.0
}

fn default_smash_speed_threshold() -> f64 {
    150.0
}

fn default_absent_frames_to_close() -> u32 {
    1
}

/// Thresholds for rally segmentation and shot classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventParams {
    /// Shortest shuttle-present run, in seconds, committed as a rally.
    #[serde(default = "default_min_rally_duration")]
    pub min_rally_duration: f64,
    /// Speed in km/h above which a steep shot is a smash.
    #[serde(default = "default_smash_speed_threshold")]
    pub smash_speed_threshold: f64,
    /// Consecutive shuttle-absent frames that close a rally. `1` closes on the
    /// first missed detection.
    #[serde(default = "default_absent_frames_to_close")]
    pub absent_frames_to_close: u32,
}

impl Default for EventParams {
    fn default() -> Self {
        Self {
            min_rally_duration: default_min_rally_duration(),
            smash_speed_threshold: default_smash_speed_threshold(),
            absent_frames_to_close: default_absent_frames_to_close(),
        }
    }
}

/// Event parameter validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EventParamsError {
    #[error("min_rally_duration must be finite and >= 0 (got {0})")]
    InvalidMinRallyDuration(f64),
    #[error("smash_speed_threshold must be finite and > 0 (got {0})")]
    InvalidSmashThreshold(f64),
    #[error("absent_frames_to_close must be >= 1")]
    InvalidAbsentFrames,
}

impl EventParams {
    pub fn validate(&self) -> Result<(), EventParamsError> {
        if !self.min_rally_duration.is_finite() || self.min_rally_duration < 0.0 {
            return Err(EventParamsError::InvalidMinRallyDuration(self.min_rally_duration));
        }
        if !self.smash_speed_threshold.is_finite() || self.smash_speed_threshold <= 0.0 {
            return Err(EventParamsError::InvalidSmashThreshold(self.smash_speed_threshold));
        }
        if self.absent_frames_to_close == 0 {
            return Err(EventParamsError::InvalidAbsentFrames);
        }
        Ok(())
    }
}
