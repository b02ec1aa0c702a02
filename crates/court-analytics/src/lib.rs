//! High-level facade crate for the `court-analytics-*` workspace.
//!
//! This crate provides:
//! - re-exports of the calibration, metrics and event crates
//! - [`AnalyticsConfig`], a JSON configuration validated once at startup
//! - [`MatchSession`], the per-frame pipeline driver that feeds tracked
//!   detections through calibration, metrics and rally segmentation
//! - [`MatchReport`], the end-of-stream snapshot handed to report writers
//! - [`init_logging`], the `env_logger` backend configured by [`LoggingConfig`]
//!
//! ## Quickstart
//!
//! ```
//! use court_analytics::{AnalyticsConfig, FrameInput, MatchSession, TrackedDetection};
//! use nalgebra::Point2;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MatchSession::new(&AnalyticsConfig::default())?;
//! session.calibrate([
//!     Point2::new(420.0, 180.0),
//!     Point2::new(860.0, 180.0),
//!     Point2::new(1100.0, 650.0),
//!     Point2::new(180.0, 650.0),
//! ])?;
//!
//! session.process_frame(&FrameInput {
//!     frame_idx: 0,
//!     detections: vec![TrackedDetection {
//!         track_id: 1,
//!         bbox: [600.0, 400.0, 660.0, 560.0],
//!         class_id: 0,
//!     }],
//!     shuttle: None,
//! })?;
//!
//! let report = session.report();
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `court_analytics::core`: court model, homographies, calibrator.
//! - `court_analytics::metrics`: distance, coverage and shuttle speed.
//! - `court_analytics::events`: rally segmentation and shot classification.
//! - `court_analytics::frame` (feature `image`): `image::GrayImage` adapters.

pub use court_analytics_core as core;
pub use court_analytics_events as events;
pub use court_analytics_metrics as metrics;

pub use court_analytics_core::{CalibrationError, Calibrator, CourtModel, GeometryError};
pub use court_analytics_events::{EventEngine, EventParams, RallySegment, ShotType};
pub use court_analytics_metrics::{MetricsEngine, MetricsSummary, TrackId};

mod config;
mod logging;
mod report;
mod session;

pub use config::{
    AnalyticsConfig, AnalyticsIoError, CalibrationConfig, ConfigError, LoggingConfig, VideoConfig,
};
pub use logging::{init_logging, LoggingError};
pub use report::MatchReport;
pub use session::{
    FrameInput, FrameOutcome, MatchSession, SessionError, TrackedDetection, PERSON_CLASS_ID,
};

#[cfg(feature = "tracing")]
pub use logging::init_tracing;

#[cfg(feature = "image")]
pub mod frame;
