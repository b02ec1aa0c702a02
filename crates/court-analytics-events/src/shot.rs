//! Heuristic shot taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

const SMASH_MIN_ANGLE_DEG: f64 = 10.0;
const CLEAR_MIN_HEIGHT_M: f64 = 4.0;
const DROP_MAX_SPEED_KMH: f64 = 80.0;
const DROP_MIN_ANGLE_DEG: f64 = 30.0;
const DRIVE_MIN_SPEED_KMH: f64 = 100.0;
const DRIVE_MAX_ANGLE_DEG: f64 = 10.0;

/// Kinematic features of one shot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotFeatures {
    /// Peak shuttle speed in km/h.
    pub max_speed: f64,
    /// Peak shuttle height in meters.
    pub max_height: f64,
    /// Descent angle in degrees; +90 is straight down.
    pub descent_angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    Smash,
    Clear,
    Drop,
    Drive,
    /// Net shots and anything the rules do not cover.
    Unclassified,
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShotType::Smash => "Smash",
            ShotType::Clear => "Clear",
            ShotType::Drop => "Drop",
            ShotType::Drive => "Drive",
            ShotType::Unclassified => "Unclassified",
        };
        f.write_str(s)
    }
}

/// Ordered decision list; the first matching rule wins and all comparisons
/// are strict.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotClassifier {
    smash_speed_threshold: f64,
}

impl ShotClassifier {
    pub fn new(smash_speed_threshold: f64) -> Self {
        Self {
            smash_speed_threshold,
        }
    }

    #[inline]
    pub fn smash_speed_threshold(&self) -> f64 {
        self.smash_speed_threshold
    }

    pub fn classify(&self, f: &ShotFeatures) -> ShotType {
        if f.max_speed > self.smash_speed_threshold && f.descent_angle > SMASH_MIN_ANGLE_DEG {
            ShotType::Smash
        } else if f.max_height > CLEAR_MIN_HEIGHT_M {
            ShotType::Clear
        } else if f.max_speed < DROP_MAX_SPEED_KMH && f.descent_angle > DROP_MIN_ANGLE_DEG {
            ShotType::Drop
        } else if f.max_speed > DRIVE_MIN_SPEED_KMH && f.descent_angle.abs() < DRIVE_MAX_ANGLE_DEG {
            ShotType::Drive
        } else {
            ShotType::Unclassified
        }
    }
}

impl Default for ShotClassifier {
    fn default() -> Self {
        Self::new(150.0)
    }
}
