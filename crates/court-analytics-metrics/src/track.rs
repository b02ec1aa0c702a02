use crate::PlayerSummary;
use nalgebra::Point2;

/// Stable identity assigned by the upstream multi-object tracker.
pub type TrackId = u64;

/// Accumulated movement state for one tracked player.
///
/// Created on the first observation of a track id and kept for the rest of
/// the session.
#[derive(Clone, Debug, Default)]
pub struct PlayerTrackState {
    pub(crate) distance_m: f64,
    pub(crate) last_position_px: Option<Point2<f64>>,
    pub(crate) last_frame: Option<u64>,
    pub(crate) court_positions: Vec<Point2<f64>>,
    pub(crate) rejected_steps: usize,
}

impl PlayerTrackState {
    /// Total accepted court-plane distance in meters.
    #[inline]
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    #[inline]
    pub fn last_position_px(&self) -> Option<Point2<f64>> {
        self.last_position_px
    }

    #[inline]
    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }

    /// Every observed court position, in observation order.
    #[inline]
    pub fn court_positions(&self) -> &[Point2<f64>] {
        &self.court_positions
    }

    /// Number of steps discarded by the jump filter.
    #[inline]
    pub fn rejected_steps(&self) -> usize {
        self.rejected_steps
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            total_distance_m: self.distance_m,
            coverage_points: self.court_positions.len(),
        }
    }
}
