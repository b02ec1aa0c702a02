//! Court-space movement metrics.
//!
//! [`MetricsEngine`] turns per-frame pixel observations into court-plane
//! distance, coverage and shuttle speed statistics. Every per-frame numeric
//! edge case (no calibration, non-positive time step, implausible jumps)
//! resolves to a defined fallback value, so a bad frame never aborts a
//! session.

mod coverage;
mod engine;
mod summary;
mod track;

pub use coverage::CoverageGrid;
pub use engine::{MetricsEngine, StepOutcome, KMH_PER_MPS, MAX_STEP_DISTANCE_M};
pub use summary::{MetricsSummary, PlayerSummary};
pub use track::{PlayerTrackState, TrackId};
