//! Static court geometry.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Reference corners of the court, in the fixed order expected by
/// [`crate::Calibrator::compute_homography`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtCorner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CourtCorner {
    /// All corners in calibration order.
    pub const ORDER: [CourtCorner; 4] = [
        CourtCorner::TopLeft,
        CourtCorner::TopRight,
        CourtCorner::BottomRight,
        CourtCorner::BottomLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            CourtCorner::TopLeft => 0,
            CourtCorner::TopRight => 1,
            CourtCorner::BottomRight => 2,
            CourtCorner::BottomLeft => 3,
        }
    }
}

/// Rectangular court dimensions in meters.
///
/// World coordinates have their origin at the bottom-left corner, `x` along
/// the width and `y` along the length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourtModel {
    pub width_m: f64,
    pub length_m: f64,
}

impl CourtModel {
    /// Full doubles court.
    pub const DOUBLES: CourtModel = CourtModel {
        width_m: 6.1,
        length_m: 13.4,
    };

    /// Width of the singles court. Calibration always uses the doubles outline.
    pub const SINGLES_WIDTH_M: f64 = 5.18;

    /// World position of one reference corner.
    pub fn corner(&self, corner: CourtCorner) -> Point2<f64> {
        match corner {
            CourtCorner::TopLeft => Point2::new(0.0, self.length_m),
            CourtCorner::TopRight => Point2::new(self.width_m, self.length_m),
            CourtCorner::BottomRight => Point2::new(self.width_m, 0.0),
            CourtCorner::BottomLeft => Point2::new(0.0, 0.0),
        }
    }

    /// The four world corners ordered TL, TR, BR, BL.
    pub fn corners_world(&self) -> [Point2<f64>; 4] {
        CourtCorner::ORDER.map(|c| self.corner(c))
    }

    /// Whether a court-space point lies on the court surface (edges included).
    pub fn contains(&self, p: Point2<f64>) -> bool {
        (0.0..=self.width_m).contains(&p.x) && (0.0..=self.length_m).contains(&p.y)
    }
}

impl Default for CourtModel {
    fn default() -> Self {
        Self::DOUBLES
    }
}
