//! Per-frame pipeline driver.
//!
//! [`MatchSession`] is the single writer for the engines: it converts tracked
//! detections into player foot points, derives shuttle speed between
//! consecutive shuttle observations and feeds presence into rally
//! segmentation. Frames must arrive in increasing index order; a host that
//! runs inference in parallel has to re-serialize its batches first.

use crate::{AnalyticsConfig, ConfigError, MatchReport};
use court_analytics_core::{
    CalibrationError, Calibrator, CourtDetection, CourtModel, GrayImageView, Homography,
};
use court_analytics_events::{EventEngine, FrameObservation, RallySegment};
use court_analytics_metrics::{MetricsEngine, MetricsSummary, TrackId};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Detector class id of a person.
pub const PERSON_CLASS_ID: u32 = 0;

/// One tracked box from the upstream detector/tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedDetection {
    pub track_id: TrackId,
    /// `[x1, y1, x2, y2]` in pixels.
    pub bbox: [f64; 4],
    pub class_id: u32,
}

impl TrackedDetection {
    /// Bottom-center of the box, where the player touches the court.
    #[inline]
    pub fn foot_point(&self) -> Point2<f64> {
        let [x1, _, x2, y2] = self.bbox;
        Point2::new((x1 + x2) / 2.0, y2)
    }

    #[inline]
    pub fn is_person(&self) -> bool {
        self.class_id == PERSON_CLASS_ID
    }
}

/// Upstream output for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub frame_idx: u64,
    #[serde(default)]
    pub detections: Vec<TrackedDetection>,
    /// Shuttle pixel position, when detected.
    #[serde(default)]
    pub shuttle: Option<[f64; 2]>,
}

/// What a processed frame produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutcome {
    pub timestamp: f64,
    pub shuttle_speed_kmh: Option<f64>,
    pub rally: Option<RallySegment>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("frame {frame_idx} arrived after frame {last}; frames must be strictly increasing")]
    OutOfOrderFrame { frame_idx: u64, last: u64 },
}

#[derive(Debug)]
pub struct MatchSession {
    fps: f64,
    metrics: MetricsEngine,
    events: EventEngine,
    last_frame: Option<u64>,
    last_shuttle: Option<(f64, Point2<f64>)>,
    frames_processed: u64,
}

impl MatchSession {
    /// Validate `config` and build the engines. Calibrates immediately when
    /// the config carries reference points; degenerate points are fatal.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(config)))]
    pub fn new(config: &AnalyticsConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut calibrator = Calibrator::new(CourtModel::DOUBLES);
        if let Some(cal) = &config.calibration {
            calibrator.compute_homography(cal.points())?;
        } else {
            log::info!("no calibration points configured; court statistics will be zero");
        }

        Ok(Self {
            fps: config.video.processing_fps,
            metrics: MetricsEngine::new(calibrator),
            events: EventEngine::new(config.events).map_err(ConfigError::from)?,
            last_frame: None,
            last_shuttle: None,
            frames_processed: 0,
        })
    }

    /// (Re)calibrate from four reference points ordered TL, TR, BR, BL.
    pub fn calibrate(
        &mut self,
        image_points: [Point2<f64>; 4],
    ) -> Result<Homography, CalibrationError> {
        self.metrics
            .calibrator_mut()
            .compute_homography(image_points)
    }

    /// Try automatic court detection on `frame`, installing the result on
    /// success. Manual points remain required when it fails.
    pub fn try_auto_calibrate(&mut self, frame: &GrayImageView<'_>) -> CourtDetection {
        let detection = self.metrics.calibrator().detect_court(frame);
        match detection.homography {
            Some(h) if detection.success => self.metrics.calibrator_mut().set_homography(h),
            _ => log::warn!("automatic court detection failed; supply reference points"),
        }
        detection
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.metrics.calibrator().is_calibrated()
    }

    /// Seconds since stream start for `frame_idx`.
    #[inline]
    pub fn timestamp(&self, frame_idx: u64) -> f64 {
        frame_idx as f64 / self.fps
    }

    /// Feed one frame through metrics and event segmentation.
    ///
    /// Out-of-order frames are rejected before any state changes.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, frame), fields(frame = frame.frame_idx))
    )]
    pub fn process_frame(&mut self, frame: &FrameInput) -> Result<FrameOutcome, SessionError> {
        if let Some(last) = self.last_frame {
            if frame.frame_idx <= last {
                return Err(SessionError::OutOfOrderFrame {
                    frame_idx: frame.frame_idx,
                    last,
                });
            }
        }
        self.last_frame = Some(frame.frame_idx);
        self.frames_processed += 1;

        let timestamp = self.timestamp(frame.frame_idx);
        let shuttle = frame.shuttle.map(|[x, y]| Point2::new(x, y));

        let shuttle_speed_kmh = match (self.last_shuttle, shuttle) {
            (Some((prev_t, prev_p)), Some(p)) => {
                Some(self.metrics.compute_speed(prev_p, p, timestamp - prev_t))
            }
            _ => None,
        };
        self.last_shuttle = shuttle.map(|p| (timestamp, p));

        let rally = self.events.update(&FrameObservation {
            frame_idx: frame.frame_idx,
            timestamp,
            shuttle_pos: shuttle,
            shuttle_speed_kmh,
        });

        for det in frame.detections.iter().filter(|d| d.is_person()) {
            self.metrics
                .update_player(det.track_id, det.foot_point(), frame.frame_idx);
        }

        Ok(FrameOutcome {
            timestamp,
            shuttle_speed_kmh,
            rally,
        })
    }

    /// Process frames in order, stopping at the first error.
    pub fn process_all<'a>(
        &mut self,
        frames: impl IntoIterator<Item = &'a FrameInput>,
    ) -> Result<(), SessionError> {
        for frame in frames {
            self.process_frame(frame)?;
        }
        Ok(())
    }

    #[inline]
    pub fn metrics(&self) -> &MetricsEngine {
        &self.metrics
    }

    #[inline]
    pub fn events(&self) -> &EventEngine {
        &self.events
    }

    pub fn summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    pub fn rallies(&self) -> &[RallySegment] {
        self.events.rallies()
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Snapshot for the report writer. Callable mid-stream.
    pub fn report(&self) -> MatchReport {
        MatchReport {
            frames_processed: self.frames_processed,
            calibrated: self.is_calibrated(),
            metrics: self.summary(),
            rallies: self.rallies().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn person(track_id: TrackId, cx: f64, foot_y: f64) -> TrackedDetection {
        TrackedDetection {
            track_id,
            bbox: [cx - 20.0, foot_y - 120.0, cx + 20.0, foot_y],
            class_id: PERSON_CLASS_ID,
        }
    }

    /// 10 px per meter.
    fn scaled_session() -> MatchSession {
        let mut session = MatchSession::new(&AnalyticsConfig::default()).expect("session");
        session
            .calibrate([
                Point2::new(0.0, 134.0),
                Point2::new(61.0, 134.0),
                Point2::new(61.0, 0.0),
                Point2::new(0.0, 0.0),
            ])
            .expect("calibrate");
        session
    }

    #[test]
    fn foot_point_is_bottom_center() {
        let det = person(1, 100.0, 300.0);
        assert_eq!(det.foot_point(), Point2::new(100.0, 300.0));
    }

    #[test]
    fn non_person_detections_are_ignored() {
        let mut session = scaled_session();
        let racket = TrackedDetection {
            track_id: 9,
            bbox: [0.0, 0.0, 10.0, 10.0],
            class_id: 38,
        };
        session
            .process_frame(&FrameInput {
                frame_idx: 0,
                detections: vec![racket, person(1, 30.0, 60.0)],
                shuttle: None,
            })
            .expect("frame");
        let summary = session.summary();
        assert_eq!(summary.players.len(), 1);
        assert!(summary.players.contains_key(&1));
    }

    #[test]
    fn out_of_order_frames_are_rejected() {
        let mut session = scaled_session();
        let frame = |i| FrameInput {
            frame_idx: i,
            detections: vec![person(1, 30.0, 60.0)],
            shuttle: None,
        };
        session.process_frame(&frame(5)).expect("frame");
        assert_eq!(
            session.process_frame(&frame(5)),
            Err(SessionError::OutOfOrderFrame {
                frame_idx: 5,
                last: 5
            })
        );
        assert!(session.process_frame(&frame(3)).is_err());
        assert_eq!(session.frames_processed(), 1);
        assert_eq!(session.summary().players[&1].coverage_points, 1);
    }

    #[test]
    fn shuttle_speed_between_consecutive_frames() {
        let mut session = scaled_session();
        let out = session
            .process_frame(&FrameInput {
                frame_idx: 0,
                shuttle: Some([0.0, 0.0]),
                ..FrameInput::default()
            })
            .expect("frame");
        assert_eq!(out.shuttle_speed_kmh, None);

        // 10 px = 1 m in 1/30 s = 108 km/h
        let out = session
            .process_frame(&FrameInput {
                frame_idx: 1,
                shuttle: Some([10.0, 0.0]),
                ..FrameInput::default()
            })
            .expect("frame");
        let speed = out.shuttle_speed_kmh.expect("speed");
        assert_abs_diff_eq!(speed, 108.0, epsilon = 1e-6);
        let peak = session.summary().shuttle_max_speed_kmh;
        assert_abs_diff_eq!(peak, 108.0, epsilon = 1e-6);

        // a gap resets the pairing
        session
            .process_frame(&FrameInput {
                frame_idx: 2,
                ..FrameInput::default()
            })
            .expect("frame");
        let out = session
            .process_frame(&FrameInput {
                frame_idx: 3,
                shuttle: Some([50.0, 0.0]),
                ..FrameInput::default()
            })
            .expect("frame");
        assert_eq!(out.shuttle_speed_kmh, None);
    }

    #[test]
    fn degenerate_configured_points_are_fatal() {
        let mut cfg = AnalyticsConfig::default();
        cfg.calibration = Some(crate::CalibrationConfig {
            image_points: [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
        });
        assert!(matches!(
            MatchSession::new(&cfg),
            Err(SessionError::Calibration(CalibrationError::Geometry(_)))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = AnalyticsConfig::default();
        cfg.events.min_rally_duration = f64::INFINITY;
        assert!(matches!(
            MatchSession::new(&cfg),
            Err(SessionError::Config(ConfigError::Events(_)))
        ));
    }

    #[test]
    fn auto_calibration_falls_back_to_manual() {
        let mut session = MatchSession::new(&AnalyticsConfig::default()).expect("session");
        let data = vec![128u8; 32 * 32];
        let frame = GrayImageView {
            width: 32,
            height: 32,
            data: &data,
        };
        let det = session.try_auto_calibrate(&frame);
        assert!(!det.success);
        assert!(!session.is_calibrated());
    }
}
