use crate::{CoverageGrid, MetricsSummary, PlayerTrackState, TrackId};
use court_analytics_core::{CalibrationError, Calibrator};
use nalgebra::Point2;
use std::collections::BTreeMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Exact km/h per m/s.
pub const KMH_PER_MPS: f64 = 3.6;

/// Single-frame steps at or beyond this court distance are treated as
/// tracking glitches and never accumulated.
pub const MAX_STEP_DISTANCE_M: f64 = 10.0;

/// How one `update_player` call treated the movement since the previous
/// observation of the same track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// First observation of the track; nothing to accumulate.
    First,
    /// Step distance in meters, added to the track total.
    Accepted(f64),
    /// Step distance in meters, discarded by the jump filter.
    Rejected(f64),
}

/// Accumulates player distances and the peak shuttle speed.
///
/// Owns the [`Calibrator`] used for unit conversion. Expects observations in
/// non-decreasing frame order from a single writer.
#[derive(Debug, Default)]
pub struct MetricsEngine {
    calibrator: Calibrator,
    tracks: BTreeMap<TrackId, PlayerTrackState>,
    shuttle_max_speed_kmh: f64,
}

impl MetricsEngine {
    pub fn new(calibrator: Calibrator) -> Self {
        Self {
            calibrator,
            tracks: BTreeMap::new(),
            shuttle_max_speed_kmh: 0.0,
        }
    }

    #[inline]
    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    /// Mutable access for (re)calibration mid-session.
    #[inline]
    pub fn calibrator_mut(&mut self) -> &mut Calibrator {
        &mut self.calibrator
    }

    /// Court position of a pixel, or the origin when no calibration is set.
    fn court_point(&self, p: Point2<f64>) -> Point2<f64> {
        match self.calibrator.pixel_to_court(p) {
            Ok(c) => c,
            Err(CalibrationError::Uncalibrated) => {
                log::trace!("uncalibrated; ({:.1}, {:.1}) maps to origin", p.x, p.y);
                Point2::origin()
            }
            Err(err @ CalibrationError::Geometry(_)) => {
                log::warn!("court mapping failed ({err}); using origin");
                Point2::origin()
            }
        }
    }

    /// Court-plane speed in km/h between two pixel positions `dt_seconds`
    /// apart, updating the session's peak shuttle speed.
    ///
    /// Returns `0.0` without touching the peak when `dt_seconds <= 0` or no
    /// calibration is available.
    pub fn compute_speed(
        &mut self,
        p1_px: Point2<f64>,
        p2_px: Point2<f64>,
        dt_seconds: f64,
    ) -> f64 {
        if dt_seconds <= 0.0 || dt_seconds.is_nan() {
            log::debug!("non-positive time step {dt_seconds}; speed defaults to 0");
            return 0.0;
        }
        if !self.calibrator.is_calibrated() {
            log::trace!("uncalibrated; speed defaults to 0");
            return 0.0;
        }

        let p1 = self.court_point(p1_px);
        let p2 = self.court_point(p2_px);
        let speed_kmh = nalgebra::distance(&p1, &p2) / dt_seconds * KMH_PER_MPS;

        if speed_kmh > self.shuttle_max_speed_kmh {
            self.shuttle_max_speed_kmh = speed_kmh;
        }
        speed_kmh
    }

    /// Record a player observation and accumulate the court distance moved
    /// since the previous observation of `track_id`.
    ///
    /// Steps of [`MAX_STEP_DISTANCE_M`] or more are rejected without resetting
    /// the track. The last pixel position and frame always advance.
    pub fn update_player(
        &mut self,
        track_id: TrackId,
        position_px: Point2<f64>,
        frame_idx: u64,
    ) -> StepOutcome {
        let pos_m = self.court_point(position_px);
        let last_m = self
            .tracks
            .get(&track_id)
            .and_then(|t| t.last_position_px)
            .map(|p| self.court_point(p));

        if !self.tracks.contains_key(&track_id) {
            log::debug!("new track {track_id} at frame {frame_idx}");
        }
        let state = self.tracks.entry(track_id).or_default();
        state.court_positions.push(pos_m);

        let outcome = match last_m {
            None => StepOutcome::First,
            Some(last_m) => {
                let step = nalgebra::distance(&pos_m, &last_m);
                if step < MAX_STEP_DISTANCE_M {
                    state.distance_m += step;
                    StepOutcome::Accepted(step)
                } else {
                    state.rejected_steps += 1;
                    log::debug!(
                        "track {track_id}: discarded {step:.2} m jump at frame {frame_idx}"
                    );
                    StepOutcome::Rejected(step)
                }
            }
        };

        state.last_position_px = Some(position_px);
        state.last_frame = Some(frame_idx);
        outcome
    }

    /// Peak shuttle speed seen so far, in km/h.
    #[inline]
    pub fn shuttle_max_speed_kmh(&self) -> f64 {
        self.shuttle_max_speed_kmh
    }

    pub fn track(&self, track_id: TrackId) -> Option<&PlayerTrackState> {
        self.tracks.get(&track_id)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &PlayerTrackState)> {
        self.tracks.iter().map(|(id, t)| (*id, t))
    }

    /// Occupancy grid of one track's court positions.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn coverage_grid(
        &self,
        track_id: TrackId,
        cols: usize,
        rows: usize,
    ) -> Option<CoverageGrid> {
        let track = self.tracks.get(&track_id)?;
        CoverageGrid::from_positions(self.calibrator.court(), cols, rows, &track.court_positions)
    }

    /// Snapshot of the current state. Pure read.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            shuttle_max_speed_kmh: self.shuttle_max_speed_kmh,
            players: self
                .tracks
                .iter()
                .map(|(id, t)| (*id, t.summary()))
                .collect(),
        }
    }
}
