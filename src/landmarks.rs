//! Hand landmark types.
//!
//! A [`HandPose`] is one frame's 21 normalized landmark points for a single
//! tracked hand, as produced by the external hand-landmark model. Indices
//! follow the usual hand topology: 0 is the wrist, then four points per
//! finger from thumb to pinky (base to tip).

use crate::{
    constants::{NUM_HAND_LANDMARKS, WRIST},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// A single 3-D landmark in normalized camera space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference `self - other`
    #[must_use]
    pub fn sub(&self, other: &Self) -> [f64; 3] {
        [self.x - other.x, self.y - other.y, self.z - other.z]
    }

    /// Euclidean distance in the image plane (x, y only)
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One frame's worth of hand landmarks, guaranteed to hold exactly 21 points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandPose {
    points: Vec<Landmark>,
}

impl HandPose {
    /// Build a pose from raw landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPose`] unless exactly 21 finite landmarks are given.
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        if points.len() != NUM_HAND_LANDMARKS {
            return Err(Error::InvalidPose(format!(
                "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
                points.len()
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(Error::InvalidPose(format!("landmark {i} is not finite")));
        }
        Ok(Self { points })
    }

    /// Landmark at `index`; indices are always in range for a valid pose
    #[must_use]
    pub fn point(&self, index: usize) -> &Landmark {
        &self.points[index]
    }

    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    #[must_use]
    pub fn wrist(&self) -> &Landmark {
        self.point(WRIST)
    }

    /// Apply `f` to every landmark, producing a new pose
    #[must_use]
    pub fn map(&self, f: impl Fn(&Landmark) -> Landmark) -> Self {
        Self {
            points: self.points.iter().map(f).collect(),
        }
    }
}

impl TryFrom<Vec<Landmark>> for HandPose {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<HandPose> for Vec<Landmark> {
    fn from(pose: HandPose) -> Self {
        pose.points
    }
}
