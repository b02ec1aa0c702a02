//! Court geometry and calibration for racket-sport match analytics.
//!
//! This crate is intentionally small and purely geometric. It maps pixel
//! coordinates onto the court plane through a planar homography estimated
//! from four operator-supplied reference points, and does not depend on any
//! concrete detector or video source.

mod calibrator;
mod court;
mod homography;
mod image;

pub use calibrator::{CalibrationError, Calibrator, CourtDetection, GeometryError};
pub use court::{CourtCorner, CourtModel};
pub use homography::{homography_from_4pt, Homography, SCALE_EPSILON};
pub use image::GrayImageView;
