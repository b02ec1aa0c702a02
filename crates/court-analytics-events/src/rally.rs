//! Rally segmentation from shuttle presence.
//!
//! A rally is a run of shuttle-present frames. The run closes once
//! `absent_frames_to_close` consecutive frames report no shuttle; it is
//! committed as a [`RallySegment`] only if the time between its first and
//! last present frame reaches `min_rally_duration`.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One frame's worth of event input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameObservation {
    pub frame_idx: u64,
    /// Seconds since the start of the stream.
    pub timestamp: f64,
    /// Shuttle pixel position, `None` when not detected.
    pub shuttle_pos: Option<Point2<f64>>,
    /// Shuttle speed in km/h relative to the previous frame, if known.
    pub shuttle_speed_kmh: Option<f64>,
}

impl FrameObservation {
    /// Observation without shuttle information.
    pub fn absent(frame_idx: u64, timestamp: f64) -> Self {
        Self {
            frame_idx,
            timestamp,
            shuttle_pos: None,
            shuttle_speed_kmh: None,
        }
    }

    /// Observation with a detected shuttle.
    pub fn present(frame_idx: u64, timestamp: f64, shuttle_pos: Point2<f64>) -> Self {
        Self {
            frame_idx,
            timestamp,
            shuttle_pos: Some(shuttle_pos),
            shuttle_speed_kmh: None,
        }
    }

    #[inline]
    pub fn has_shuttle(&self) -> bool {
        self.shuttle_pos.is_some()
    }
}

/// A committed rally.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RallySegment {
    pub start_frame: u64,
    pub end_frame: u64,
    pub duration_seconds: f64,
    /// Always 0 at commit time; no shot counting pass exists yet.
    pub shot_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RallyState {
    Idle,
    InRally,
}

#[derive(Clone, Debug)]
pub struct RallySegmenter {
    min_rally_duration: f64,
    absent_frames_to_close: u32,
    state: RallyState,
    in_flight: Vec<FrameObservation>,
    absent_run: u32,
    rallies: Vec<RallySegment>,
}

impl RallySegmenter {
    /// `absent_frames_to_close` is clamped to at least 1.
    pub fn new(min_rally_duration: f64, absent_frames_to_close: u32) -> Self {
        Self {
            min_rally_duration,
            absent_frames_to_close: absent_frames_to_close.max(1),
            state: RallyState::Idle,
            in_flight: Vec::new(),
            absent_run: 0,
            rallies: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> RallyState {
        self.state
    }

    /// Frames of the rally currently being accumulated.
    #[inline]
    pub fn in_flight(&self) -> &[FrameObservation] {
        &self.in_flight
    }

    /// Committed rallies, in stream order.
    #[inline]
    pub fn rallies(&self) -> &[RallySegment] {
        &self.rallies
    }

    /// Feed one frame. Returns the rally committed by this frame, if any.
    pub fn update(&mut self, obs: &FrameObservation) -> Option<RallySegment> {
        match (self.state, obs.has_shuttle()) {
            (RallyState::Idle, false) => None,
            (RallyState::Idle, true) => {
                log::trace!("rally opened at frame {}", obs.frame_idx);
                self.state = RallyState::InRally;
                self.absent_run = 0;
                self.in_flight.push(*obs);
                None
            }
            (RallyState::InRally, true) => {
                self.absent_run = 0;
                self.in_flight.push(*obs);
                None
            }
            (RallyState::InRally, false) => {
                self.absent_run += 1;
                if self.absent_run < self.absent_frames_to_close {
                    return None;
                }
                self.close()
            }
        }
    }

    fn close(&mut self) -> Option<RallySegment> {
        self.state = RallyState::Idle;
        self.absent_run = 0;

        let buffered = std::mem::take(&mut self.in_flight);
        let (first, last) = (buffered.first()?, buffered.last()?);
        let duration = last.timestamp - first.timestamp;

        if duration >= self.min_rally_duration {
            let segment = RallySegment {
                start_frame: first.frame_idx,
                end_frame: last.frame_idx,
                duration_seconds: duration,
                shot_count: 0,
            };
            log::info!(
                "rally detected: frames {}..={} ({:.2}s)",
                segment.start_frame,
                segment.end_frame,
                duration
            );
            self.rallies.push(segment);
            Some(segment)
        } else {
            log::debug!(
                "discarded {:.2}s shuttle run ending at frame {}",
                duration,
                last.frame_idx
            );
            None
        }
    }
}
