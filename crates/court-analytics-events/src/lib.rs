//! Match event extraction.
//!
//! Current focus:
//! - rally segmentation from per-frame shuttle presence,
//! - fixed-order heuristic shot classification from kinematic features.
//!
//! Both are independent of court calibration; speeds are typically supplied
//! by `court-analytics-metrics`.

mod engine;
mod params;
mod rally;
mod shot;

pub use engine::EventEngine;
pub use params::{EventParams, EventParamsError};
pub use rally::{FrameObservation, RallySegment, RallySegmenter, RallyState};
pub use shot::{ShotClassifier, ShotFeatures, ShotType};
