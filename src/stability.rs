//! Frame-wise debouncing of classifier output.
//!
//! A candidate label must be reported on `required` consecutive frames before
//! it is confirmed. Once confirmed it stays confirmed, and is reported again
//! on every frame, for as long as the same label keeps arriving.

use crate::constants::DEFAULT_REQUIRED_STABILITY;

/// Debouncer phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StabilityPhase {
    /// No candidate
    Idle,
    /// Candidate seen `count` times in a row, not yet confirmed
    Pending { label: String, count: u32 },
    /// Candidate has been stable for at least the required frames
    Confirmed { label: String, count: u32 },
}

/// Per-stream stability filter
#[derive(Debug, Clone)]
pub struct StabilityFilter {
    required: u32,
    pending: Option<String>,
    count: u32,
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_STABILITY)
    }
}

impl StabilityFilter {
    /// Create a filter requiring `required` consecutive frames (at least 1)
    #[must_use]
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            pending: None,
            count: 0,
        }
    }

    /// Feed one frame's classifier result; returns the confirmed label, if any.
    ///
    /// `None` (no hand, or no match) returns the filter to idle.
    pub fn update(&mut self, candidate: Option<&str>) -> Option<&str> {
        match candidate {
            None => self.reset(),
            Some(label) if self.pending.as_deref() == Some(label) => {
                self.count = self.count.saturating_add(1);
            }
            Some(label) => {
                self.pending = Some(label.to_string());
                self.count = 1;
            }
        }
        self.confirmed()
    }

    /// Currently confirmed label
    #[must_use]
    pub fn confirmed(&self) -> Option<&str> {
        if self.count >= self.required {
            self.pending.as_deref()
        } else {
            None
        }
    }

    /// Candidate being counted, confirmed or not
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub const fn required(&self) -> u32 {
        self.required
    }

    /// Progress towards confirmation in `[0, 1]`, for UI feedback
    #[must_use]
    pub fn progress(&self) -> f64 {
        (f64::from(self.count) / f64::from(self.required)).min(1.0)
    }

    #[must_use]
    pub fn phase(&self) -> StabilityPhase {
        match &self.pending {
            None => StabilityPhase::Idle,
            Some(label) if self.count >= self.required => StabilityPhase::Confirmed {
                label: label.clone(),
                count: self.count,
            },
            Some(label) => StabilityPhase::Pending {
                label: label.clone(),
                count: self.count,
            },
        }
    }

    /// Back to idle
    pub fn reset(&mut self) {
        self.pending = None;
        self.count = 0;
    }
}
