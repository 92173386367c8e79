//! Feature extraction from hand poses.
//!
//! A pose is reduced to 20 joint angles built purely from normalized bone
//! direction vectors, which makes the result independent of where the hand
//! is in the frame and how large it appears.
//!
//! Layout of the vector:
//!
//! | slots  | contents                                                        |
//! |--------|-----------------------------------------------------------------|
//! | 0..4   | thumb: three adjacent-bone angles, then first-to-last bone angle |
//! | 4..7   | index: three adjacent-bone angles                               |
//! | 7..10  | middle                                                          |
//! | 10..13 | ring                                                            |
//! | 13..16 | pinky                                                           |
//! | 16..20 | spread between first bones: thumb-index, index-middle, middle-ring, ring-pinky |
//!
//! The thumb's extra first-to-last angle captures overall thumb flexion,
//! which the adjacent-pair angles alone under-weight for tucked thumbs.

use crate::{
    constants::{BONES_PER_FINGER, FEATURE_LEN, NUM_FINGERS, NUM_HAND_LANDMARKS},
    landmarks::{HandPose, Landmark},
    utils::{angle_between, euclidean_distance, normalize, Vec3},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Bone connections (start, end) in finger order, wrist outward
pub const BONE_CONNECTIONS: [(usize, usize); NUM_FINGERS * BONES_PER_FINGER] = [
    (0, 1), (1, 2), (2, 3), (3, 4),     // Thumb
    (0, 5), (5, 6), (6, 7), (7, 8),     // Index
    (0, 9), (9, 10), (10, 11), (11, 12),  // Middle
    (0, 13), (13, 14), (14, 15), (15, 16), // Ring
    (0, 17), (17, 18), (18, 19), (19, 20), // Pinky
];

/// Fixed-length angle vector describing a hand shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Wrap raw angles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless exactly 20 finite values are given.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() != FEATURE_LEN {
            return Err(Error::InvalidInput(format!(
                "feature vector must have {FEATURE_LEN} values, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput("feature vector contains non-finite values".to_string()));
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean distance to another feature vector
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        euclidean_distance(&self.0, &other.0)
    }
}

/// Extract the feature vector from raw landmarks.
///
/// # Errors
///
/// Returns [`Error::InvalidPose`] if `landmarks` does not hold exactly 21 points.
pub fn extract(landmarks: &[Landmark]) -> Result<FeatureVector> {
    if landmarks.len() != NUM_HAND_LANDMARKS {
        return Err(Error::InvalidPose(format!(
            "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
            landmarks.len()
        )));
    }
    Ok(FeatureVector(angles(landmarks)))
}

/// Extract the feature vector from a validated pose
#[must_use]
pub fn extract_pose(pose: &HandPose) -> FeatureVector {
    FeatureVector(angles(pose.points()))
}

fn angles(landmarks: &[Landmark]) -> Vec<f64> {
    let bones: Vec<Vec3> = BONE_CONNECTIONS
        .iter()
        .map(|&(start, end)| normalize(landmarks[end].sub(&landmarks[start])))
        .collect();

    let mut out = Vec::with_capacity(FEATURE_LEN);

    for (finger, group) in bones.chunks_exact(BONES_PER_FINGER).enumerate() {
        for pair in group.windows(2) {
            out.push(angle_between(&pair[0], &pair[1]));
        }
        if finger == 0 {
            out.push(angle_between(&group[0], &group[BONES_PER_FINGER - 1]));
        }
    }

    for f in 0..NUM_FINGERS - 1 {
        let a = &bones[f * BONES_PER_FINGER];
        let b = &bones[(f + 1) * BONES_PER_FINGER];
        out.push(angle_between(a, b));
    }

    debug_assert_eq!(out.len(), FEATURE_LEN);
    out
}
