//! Pixel to court-plane calibration.
//!
//! A [`Calibrator`] holds at most one homography mapping image pixels onto
//! the court plane in meters. It is set from four reference points supplied
//! in TL, TR, BR, BL order and may be overwritten by a later calibration.
//! The supplied order is not checked against the shape of the quad: a
//! permuted order yields a plausible but wrong transform.

use crate::{homography_from_4pt, CourtModel, GrayImageView, Homography};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Minimum L1 Sobel response counted as an edge pixel in [`Calibrator::detect_court`].
const EDGE_THRESHOLD: i32 = 200;

/// Degenerate reference geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("reference point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("reference points {a} and {b} coincide")]
    CoincidentPoints { a: usize, b: usize },
    #[error("reference points {a}, {b} and {c} are collinear")]
    CollinearPoints { a: usize, b: usize, c: usize },
    #[error("homography system is singular")]
    SingularSystem,
    #[error("estimated homography is ill-conditioned")]
    IllConditioned,
}

/// Errors returned by calibration and court-space queries.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("court homography not computed; supply four reference points first")]
    Uncalibrated,
}

/// Outcome of an automatic court detection attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CourtDetection {
    pub success: bool,
    pub homography: Option<Homography>,
    /// Edge pixels found by the line-extraction stage.
    pub edge_pixels: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Calibrator {
    court: CourtModel,
    homography: Option<Homography>,
}

impl Calibrator {
    /// Uncalibrated calibrator for the given court.
    pub fn new(court: CourtModel) -> Self {
        Self {
            court,
            homography: None,
        }
    }

    /// Calibrator with an externally computed image-to-court homography.
    pub fn from_homography(court: CourtModel, homography: Homography) -> Self {
        Self {
            court,
            homography: Some(homography),
        }
    }

    #[inline]
    pub fn court(&self) -> &CourtModel {
        &self.court
    }

    #[inline]
    pub fn homography(&self) -> Option<&Homography> {
        self.homography.as_ref()
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.homography.is_some()
    }

    /// Compute and store the homography mapping `image_points[i]` onto the
    /// court corner `i` (TL, TR, BR, BL).
    ///
    /// On error the previously stored homography, if any, is left untouched.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn compute_homography(
        &mut self,
        image_points: [Point2<f64>; 4],
    ) -> Result<Homography, CalibrationError> {
        check_reference_points(&image_points)?;

        let world = self.court.corners_world();
        let h = homography_from_4pt(&image_points, &world)
            .ok_or(GeometryError::SingularSystem)?;
        if !h.is_finite() || h.h.determinant().abs() < 1e-12 {
            return Err(GeometryError::IllConditioned.into());
        }

        if self.homography.is_some() {
            log::info!("recalibrated court homography");
        } else {
            log::info!("court homography computed");
        }
        log::debug!("image->court homography: {:?}", h.to_array());

        self.homography = Some(h);
        Ok(h)
    }

    /// Install a homography computed elsewhere, replacing any current one.
    pub fn set_homography(&mut self, homography: Homography) {
        self.homography = Some(homography);
    }

    /// Map a pixel onto the court plane (meters).
    ///
    /// A point whose projective scale is within [`crate::SCALE_EPSILON`] of
    /// zero maps to `(0, 0)`; that value marks a degenerate projection, not a
    /// court position.
    pub fn pixel_to_court(&self, point: Point2<f64>) -> Result<Point2<f64>, CalibrationError> {
        let Some(h) = &self.homography else {
            return Err(CalibrationError::Uncalibrated);
        };
        match h.try_apply(point) {
            Some(p) => Ok(p),
            None => {
                log::debug!(
                    "projective scale vanishes at pixel ({:.1}, {:.1}); using origin",
                    point.x,
                    point.y
                );
                Ok(Point2::origin())
            }
        }
    }

    /// Map a court-plane point (meters) back into the image.
    pub fn court_to_pixel(&self, point: Point2<f64>) -> Result<Point2<f64>, CalibrationError> {
        let Some(h) = &self.homography else {
            return Err(CalibrationError::Uncalibrated);
        };
        let inv = h.inverse().ok_or(GeometryError::SingularSystem)?;
        inv.try_apply(point)
            .ok_or(GeometryError::IllConditioned.into())
    }

    /// Best-effort automatic court detection.
    ///
    /// Runs the edge-extraction stage only. Recovering the four court corners
    /// from line intersections is not implemented, so this never succeeds and
    /// never touches the stored homography; callers must fall back to
    /// [`Calibrator::compute_homography`] with operator-supplied points.
    pub fn detect_court(&self, frame: &GrayImageView<'_>) -> CourtDetection {
        let edge_pixels = frame.sobel_edge_count(EDGE_THRESHOLD);
        if edge_pixels == 0 {
            log::warn!("no court lines detected");
        } else {
            log::debug!("{edge_pixels} edge pixels found; corner recovery needs manual points");
        }
        CourtDetection {
            success: false,
            homography: None,
            edge_pixels,
        }
    }
}

fn check_reference_points(pts: &[Point2<f64>; 4]) -> Result<(), GeometryError> {
    for (index, p) in pts.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(GeometryError::NonFinitePoint { index });
        }
    }

    let mut scale = 0.0_f64;
    for a in 0..4 {
        for b in a + 1..4 {
            scale = scale.max(nalgebra::distance(&pts[a], &pts[b]));
        }
    }

    let min_dist = (scale * 1e-6).max(1e-9);
    for a in 0..4 {
        for b in a + 1..4 {
            if nalgebra::distance(&pts[a], &pts[b]) < min_dist {
                return Err(GeometryError::CoincidentPoints { a, b });
            }
        }
    }

    // twice the triangle area, relative to the quad's extent
    let min_area = scale * scale * 1e-6;
    for (a, b, c) in [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)] {
        let ab = pts[b] - pts[a];
        let ac = pts[c] - pts[a];
        if (ab.x * ac.y - ab.y * ac.x).abs() < min_area {
            return Err(GeometryError::CollinearPoints { a, b, c });
        }
    }
    Ok(())
}
