//! Smoothing filters for cursor positions.
//!
//! Raw fingertip positions jitter from frame to frame; these filters smooth
//! the mapped screen coordinates before the pointer is moved.

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{Error, Result};

/// Trait for all cursor filters
pub trait CursorFilter: Send + Sync {
    /// Apply filter to input values
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl CursorFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a cursor filter by type name.
///
/// Accepts `none` and `exponential[:<smoothing factor>]`, where the factor is
/// the weight kept from the previous position (default 0.2).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for unknown names or out-of-range factors.
pub fn create_filter(filter_type: &str) -> Result<Box<dyn CursorFilter>> {
    let lowered = filter_type.to_lowercase();
    let (name, param) = match lowered.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (lowered.as_str(), None),
    };

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" => {
            let factor = match param {
                Some(p) => p
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidInput(format!("Invalid smoothing factor: {p}")))?,
                None => crate::constants::DEFAULT_SMOOTHING_FACTOR,
            };
            if !(0.0..1.0).contains(&factor) {
                return Err(Error::InvalidInput(format!(
                    "Smoothing factor must be in [0, 1), got {factor}"
                )));
            }
            Ok(Box::new(exponential::ExponentialFilter::from_smoothing_factor(factor)))
        }
        _ => Err(Error::InvalidInput(format!("Unknown filter type: {filter_type}"))),
    }
}
