//! Cursor mapping and pointer output.
//!
//! Maps the index fingertip from normalized camera space to screen pixels,
//! smooths the result, and drives a [`PointerSink`]. The pointer backend is
//! supplied by the host; nothing here talks to a display server.

use crate::{
    constants::{
        DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_SMOOTHING_FACTOR, INDEX_TIP,
        SCROLL_DEAD_ZONE_BOTTOM, SCROLL_DEAD_ZONE_TOP, SCROLL_GAIN,
    },
    filters::{exponential::ExponentialFilter, CursorFilter},
    landmarks::{HandPose, Landmark},
    utils::safe_cast::{f64_to_i32, f64_to_i32_clamp, last_pixel},
    Result,
};
use log::debug;

/// Pointer device driven by the smart mouse and cursor tracking
pub trait PointerSink: Send {
    /// Move the pointer to an absolute screen position
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;

    /// Press the left button
    fn press_left(&mut self) -> Result<()>;

    /// Release the left button
    fn release_left(&mut self) -> Result<()>;

    /// Click the right button once
    fn right_click(&mut self) -> Result<()>;
}

/// Maps normalized landmark coordinates to screen pixels.
///
/// With `mirror_x` set (the default) the camera image is treated as a
/// mirror: moving the hand to the user's right moves the pointer right,
/// i.e. `x_px = (1 - x) * width`. `y_px = y * height` either way. Results
/// are clamped to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMapper {
    width: u32,
    height: u32,
    mirror_x: bool,
}

impl Default for CursorMapper {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT, true)
    }
}

impl CursorMapper {
    #[must_use]
    pub const fn new(width: u32, height: u32, mirror_x: bool) -> Self {
        Self {
            width,
            height,
            mirror_x,
        }
    }

    /// Target position in (unclamped, fractional) pixels
    #[must_use]
    pub fn target(&self, point: &Landmark) -> (f64, f64) {
        let nx = if self.mirror_x { 1.0 - point.x } else { point.x };
        (nx * f64::from(self.width), point.y * f64::from(self.height))
    }

    /// Clamp a fractional pixel position onto the screen
    #[must_use]
    pub fn clamp(&self, x: f64, y: f64) -> (i32, i32) {
        (
            f64_to_i32_clamp(x, 0, last_pixel(self.width)),
            f64_to_i32_clamp(y, 0, last_pixel(self.height)),
        )
    }

    /// Map a landmark straight to a pixel, without smoothing
    #[must_use]
    pub fn map_to_screen(&self, point: &Landmark) -> (i32, i32) {
        let (x, y) = self.target(point);
        self.clamp(x, y)
    }

    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn mirror_x(&self) -> bool {
        self.mirror_x
    }
}

/// Smoothed index-fingertip cursor
pub struct CursorTracker {
    mapper: CursorMapper,
    filter: Box<dyn CursorFilter>,
}

impl Default for CursorTracker {
    fn default() -> Self {
        Self::new(CursorMapper::default(), DEFAULT_SMOOTHING_FACTOR)
    }
}

impl CursorTracker {
    /// `smoothing_factor` is the weight kept from the previous position
    ///
    /// # Panics
    ///
    /// Panics if the factor is not in [0, 1)
    #[must_use]
    pub fn new(mapper: CursorMapper, smoothing_factor: f64) -> Self {
        Self::with_filter(
            mapper,
            Box::new(ExponentialFilter::from_smoothing_factor(smoothing_factor)),
        )
    }

    #[must_use]
    pub fn with_filter(mapper: CursorMapper, filter: Box<dyn CursorFilter>) -> Self {
        Self { mapper, filter }
    }

    /// Advance the smoothed position towards the pose's index fingertip
    /// and return the clamped pixel position
    pub fn update(&mut self, pose: &HandPose) -> (i32, i32) {
        let (tx, ty) = self.mapper.target(pose.point(INDEX_TIP));
        let (sx, sy) = self.filter.apply(tx, ty);
        self.mapper.clamp(sx, sy)
    }

    /// Update and move the pointer
    ///
    /// # Errors
    ///
    /// Propagates pointer errors.
    pub fn track(&mut self, pose: &HandPose, sink: &mut dyn PointerSink) -> Result<(i32, i32)> {
        let (x, y) = self.update(pose);
        debug!("Cursor -> ({x}, {y})");
        sink.move_to(x, y)?;
        Ok((x, y))
    }

    /// Forget the smoothed position; the next update jumps to the target
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    #[must_use]
    pub const fn mapper(&self) -> &CursorMapper {
        &self.mapper
    }
}

/// Scroll amount for the `dynamic_scroll` action.
///
/// The index fingertip's normalized Y picks the direction: above the dead
/// zone scrolls up (positive), below scrolls down (negative), inside it does
/// nothing. Speed grows linearly with the distance from the zone.
#[must_use]
pub fn dynamic_scroll_amount(pose: &HandPose) -> i32 {
    let y = pose.point(INDEX_TIP).y;
    let amount = if y < SCROLL_DEAD_ZONE_TOP {
        (SCROLL_DEAD_ZONE_TOP - y) * SCROLL_GAIN
    } else if y > SCROLL_DEAD_ZONE_BOTTOM {
        -(y - SCROLL_DEAD_ZONE_BOTTOM) * SCROLL_GAIN
    } else {
        0.0
    };
    f64_to_i32(amount).unwrap_or(0)
}
