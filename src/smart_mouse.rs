//! Pinch-driven mouse: index fingertip moves the pointer, thumb curl holds
//! the left button, a curled index with an open thumb right-clicks.
//!
//! Runs only in MOUSE mode and is independent of classification.

use crate::{
    constants::{
        DEFAULT_CURL_THRESHOLD, DEFAULT_RIGHT_CLICK_COOLDOWN_SECS, INDEX_BASE, INDEX_TIP,
        THUMB_TIP,
    },
    cursor_control::{CursorMapper, CursorTracker, PointerSink},
    landmarks::HandPose,
};
use log::{debug, error, info};
use std::time::{Duration, Instant};

/// What the controller did on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartMouseOutcome {
    /// Right-click gesture; the pointer was held still
    RightClick {
        /// Whether a click was actually sent (false while cooling down)
        fired: bool,
    },
    /// Pointer moved; `left_down` is the button state after this frame
    Moved { x: i32, y: i32, left_down: bool },
}

/// Per-frame thumb and index curl distances (planar, normalized units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurlDistances {
    /// Thumb tip to index base
    pub thumb: f64,
    /// Index tip to index base
    pub index: f64,
}

impl CurlDistances {
    #[must_use]
    pub fn measure(pose: &HandPose) -> Self {
        let index_base = pose.point(INDEX_BASE);
        Self {
            thumb: pose.point(THUMB_TIP).planar_distance(index_base),
            index: pose.point(INDEX_TIP).planar_distance(index_base),
        }
    }
}

pub struct SmartMouseController {
    curl_threshold: f64,
    right_click_cooldown: Duration,
    last_right_click: Option<Instant>,
    left_down: bool,
    tracker: CursorTracker,
}

impl Default for SmartMouseController {
    fn default() -> Self {
        Self::new(
            CursorTracker::default(),
            DEFAULT_CURL_THRESHOLD,
            Duration::from_secs_f64(DEFAULT_RIGHT_CLICK_COOLDOWN_SECS),
        )
    }
}

impl SmartMouseController {
    #[must_use]
    pub const fn new(tracker: CursorTracker, curl_threshold: f64, right_click_cooldown: Duration) -> Self {
        Self {
            curl_threshold,
            right_click_cooldown,
            last_right_click: None,
            left_down: false,
            tracker,
        }
    }

    /// Process one frame.
    ///
    /// Pointer errors are logged and do not stop the frame; a failed press
    /// or release leaves the button flag unchanged.
    pub fn update(
        &mut self,
        pose: &HandPose,
        now: Instant,
        sink: &mut dyn PointerSink,
    ) -> SmartMouseOutcome {
        let curl = CurlDistances::measure(pose);

        if curl.index < self.curl_threshold && curl.thumb >= self.curl_threshold {
            if self.left_down {
                self.release(sink);
            }
            let mut fired = false;
            if self.right_click_ready(now) {
                info!("Smart mouse right click");
                match sink.right_click() {
                    Ok(()) => {
                        self.last_right_click = Some(now);
                        fired = true;
                    }
                    Err(e) => error!("Right click failed: {e}"),
                }
            }
            return SmartMouseOutcome::RightClick { fired };
        }

        let (x, y) = self.tracker.update(pose);
        if let Err(e) = sink.move_to(x, y) {
            error!("Pointer move failed: {e}");
        }

        if curl.thumb < self.curl_threshold {
            if !self.left_down {
                debug!("Smart mouse left down");
                match sink.press_left() {
                    Ok(()) => self.left_down = true,
                    Err(e) => error!("Left press failed: {e}"),
                }
            }
        } else if self.left_down {
            self.release(sink);
        }

        SmartMouseOutcome::Moved {
            x,
            y,
            left_down: self.left_down,
        }
    }

    /// Release a held button, e.g. when the hand leaves the frame or the
    /// mode changes. The smoothed cursor position is kept.
    pub fn release_all(&mut self, sink: &mut dyn PointerSink) {
        if self.left_down {
            self.release(sink);
        }
    }

    /// Drop all state, smoothing included, without touching the pointer
    pub fn reset(&mut self) {
        self.left_down = false;
        self.last_right_click = None;
        self.tracker.reset();
    }

    #[must_use]
    pub const fn left_down(&self) -> bool {
        self.left_down
    }

    #[must_use]
    pub const fn curl_threshold(&self) -> f64 {
        self.curl_threshold
    }

    #[must_use]
    pub const fn mapper(&self) -> &CursorMapper {
        self.tracker.mapper()
    }

    fn right_click_ready(&self, now: Instant) -> bool {
        self.last_right_click
            .map_or(true, |t| now.saturating_duration_since(t) > self.right_click_cooldown)
    }

    fn release(&mut self, sink: &mut dyn PointerSink) {
        debug!("Smart mouse left up");
        match sink.release_left() {
            Ok(()) => self.left_down = false,
            Err(e) => error!("Left release failed: {e}"),
        }
    }
}
