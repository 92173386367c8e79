use super::CursorFilter;

/// Exponential smoothing of cursor positions
///
/// `out = alpha * input + (1 - alpha) * previous`. The first sample after
/// creation or reset passes through unchanged.
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<(f64, f64)>,
}

impl ExponentialFilter {
    /// Create a filter weighting new input by `alpha`
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }

    /// Create a filter that keeps `factor` of the previous position,
    /// i.e. `out = previous * factor + input * (1 - factor)`
    ///
    /// # Panics
    ///
    /// Panics if factor is not in the range [0, 1)
    #[must_use]
    pub fn from_smoothing_factor(factor: f64) -> Self {
        Self::new(1.0 - factor)
    }

    /// Last smoothed position, if any
    #[must_use]
    pub const fn last(&self) -> Option<(f64, f64)> {
        self.last
    }

    fn blend(&self, input: f64, previous: f64) -> f64 {
        self.alpha.mul_add(input - previous, previous)
    }
}

impl CursorFilter for ExponentialFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        let out = match self.last {
            Some((px, py)) => (self.blend(x, px), self.blend(y, py)),
            None => (x, y),
        };
        self.last = Some(out);
        out
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value passes through
        let (x1, y1) = filter.apply(10.0, 20.0);
        assert_eq!(x1, 10.0);
        assert_eq!(y1, 20.0);

        // Second value is smoothed
        let (x2, y2) = filter.apply(20.0, 30.0);
        assert_eq!(x2, 15.0); // 0.5 * 20 + 0.5 * 10
        assert_eq!(y2, 25.0);
    }

    #[test]
    fn test_smoothing_factor_weights_previous() {
        let mut filter = ExponentialFilter::from_smoothing_factor(0.2);
        filter.apply(100.0, 100.0);
        let (x, _y) = filter.apply(200.0, 0.0);
        assert!((x - 180.0).abs() < 1e-9); // 100 * 0.2 + 200 * 0.8
        assert_eq!(filter.last().map(|(x, _)| x.round()), Some(180.0));

        filter.reset();
        assert_eq!(filter.last(), None);
    }
}
