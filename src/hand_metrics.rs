//! Hand size and orientation feedback for recording sessions.
//!
//! While recording samples it helps to vary distance and rotation; these
//! metrics track how much of that space the current session has covered.

use crate::{
    constants::{MIDDLE_BASE, WRIST},
    landmarks::HandPose,
};
use serde::Serialize;

/// Observed `[min, max]` of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    const fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Width of the covered interval
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Latest hand metrics plus session ranges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandMetrics {
    /// Bounding-box area of the landmarks in the image plane
    pub size: f64,
    /// Wrist to middle-finger-base direction, degrees
    pub angle: f64,
    pub size_range: Option<Range>,
    pub angle_range: Option<Range>,
}

impl HandMetrics {
    /// Record one pose
    pub fn update(&mut self, pose: &HandPose) {
        let size = bounding_box_area(pose);
        let angle = hand_angle(pose);
        self.size = size;
        self.angle = angle;
        match &mut self.size_range {
            Some(range) => range.include(size),
            None => self.size_range = Some(Range::point(size)),
        }
        match &mut self.angle_range {
            Some(range) => range.include(angle),
            None => self.angle_range = Some(Range::point(angle)),
        }
    }

    /// Start a new session
    pub fn reset_ranges(&mut self) {
        self.size_range = None;
        self.angle_range = None;
    }
}

/// Area of the (x, y) bounding box around all landmarks
#[must_use]
pub fn bounding_box_area(pose: &HandPose) -> f64 {
    let (min_x, max_x, min_y, max_y) = pose.points().iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
    );
    (max_x - min_x) * (max_y - min_y)
}

/// Angle of the wrist → middle-base vector in degrees, in (-180, 180]
#[must_use]
pub fn hand_angle(pose: &HandPose) -> f64 {
    let wrist = pose.point(WRIST);
    let base = pose.point(MIDDLE_BASE);
    (base.y - wrist.y).atan2(base.x - wrist.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn pose(spread: f64) -> HandPose {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 21];
        points[WRIST] = Landmark::new(0.5, 0.5 + spread, 0.0);
        points[MIDDLE_BASE] = Landmark::new(0.5 + spread, 0.5, 0.0);
        HandPose::new(points).unwrap()
    }

    #[test]
    fn test_size_and_angle() {
        let p = pose(0.2);
        assert!((bounding_box_area(&p) - 0.04).abs() < 1e-12);
        // Up and to the right in image coordinates (y grows downward)
        assert!((hand_angle(&p) + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranges_accumulate_and_reset() {
        let mut metrics = HandMetrics::default();
        metrics.update(&pose(0.1));
        metrics.update(&pose(0.3));
        let size = metrics.size_range.unwrap();
        assert!((size.min - 0.01).abs() < 1e-12);
        assert!((size.max - 0.09).abs() < 1e-12);
        assert!(size.span() > 0.0);

        metrics.reset_ranges();
        assert!(metrics.size_range.is_none());
        assert!(metrics.angle_range.is_none());
        assert!((metrics.size - 0.09).abs() < 1e-12);
    }
}
