//! The per-frame recognition step.
//!
//! One [`FramePipeline`] serves one camera stream. Each frame runs, depending
//! on the active [`Mode`], either extract → classify → stabilize → dispatch,
//! the smart mouse, or nothing but metrics (recording). Frames must be fed
//! sequentially; stability and trigger state depend on frame order.

use crate::{
    actions::ActionExecutor,
    bindings::ActionMap,
    classifier::Classifier,
    config::Config,
    cursor_control::{CursorMapper, CursorTracker, PointerSink},
    dispatch::{DispatchOutcome, DispatchPolicy},
    features::extract_pose,
    gesture_store::GestureStore,
    hand_metrics::HandMetrics,
    landmarks::HandPose,
    smart_mouse::{SmartMouseController, SmartMouseOutcome},
    stability::StabilityFilter,
    Error, Result,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    time::{Duration, Instant},
};

/// Which subsystem consumes frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Classify gestures and dispatch bound actions
    #[default]
    Detect,
    /// Frames only feed sample capture
    Record,
    /// Smart mouse control
    Mouse,
}

impl Mode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "DETECT",
            Self::Record => "RECORD",
            Self::Mouse => "MOUSE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DETECT" => Ok(Self::Detect),
            "RECORD" => Ok(Self::Record),
            "MOUSE" => Ok(Self::Mouse),
            _ => Err(Error::InvalidInput(format!("Invalid mode: {s}"))),
        }
    }
}

/// Everything one frame produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameResult {
    pub mode: Mode,
    pub hand_visible: bool,
    /// Raw classifier output for this frame
    pub candidate: Option<String>,
    /// Label confirmed by the stability filter
    pub confirmed: Option<String>,
    /// Label currently being counted
    pub pending: Option<String>,
    /// Stability progress in [0, 1]
    pub progress: f64,
    pub dispatch: Option<DispatchOutcome>,
    pub mouse: Option<SmartMouseOutcome>,
}

/// Per-stream recognition state plus the output collaborators
pub struct FramePipeline {
    mode: Mode,
    classifier: Classifier,
    stability: StabilityFilter,
    dispatch: DispatchPolicy,
    smart_mouse: SmartMouseController,
    metrics: HandMetrics,
    executor: Box<dyn ActionExecutor>,
    pointer: Box<dyn PointerSink>,
}

impl FramePipeline {
    #[must_use]
    pub fn new(
        classifier: Classifier,
        stability: StabilityFilter,
        dispatch: DispatchPolicy,
        smart_mouse: SmartMouseController,
        executor: Box<dyn ActionExecutor>,
        pointer: Box<dyn PointerSink>,
    ) -> Self {
        Self {
            mode: Mode::Detect,
            classifier,
            stability,
            dispatch,
            smart_mouse,
            metrics: HandMetrics::default(),
            executor,
            pointer,
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the cursor filter settings are invalid.
    pub fn from_config(
        config: &Config,
        executor: Box<dyn ActionExecutor>,
        pointer: Box<dyn PointerSink>,
    ) -> Result<Self> {
        let rec = &config.recognition;
        let mouse = &config.smart_mouse;
        let mapper = CursorMapper::new(config.screen.width, config.screen.height, mouse.mirror_x);
        let tracker = CursorTracker::with_filter(mapper, config.create_cursor_filter()?);
        Ok(Self::new(
            Classifier::new(rec.match_threshold, rec.ambiguity_margin),
            StabilityFilter::new(rec.required_stability),
            DispatchPolicy::new(Duration::from_secs_f64(config.dispatch.cooldown_secs)),
            SmartMouseController::new(
                tracker,
                mouse.curl_threshold,
                Duration::from_secs_f64(mouse.right_click_cooldown_secs),
            ),
            executor,
            pointer,
        ))
    }

    /// Process one frame. `pose` is `None` when no hand was detected.
    pub fn process(
        &mut self,
        pose: Option<&HandPose>,
        store: &GestureStore,
        bindings: &ActionMap,
        now: Instant,
    ) -> FrameResult {
        let Some(pose) = pose else {
            self.hand_lost();
            return FrameResult {
                mode: self.mode,
                ..FrameResult::default()
            };
        };

        self.metrics.update(pose);
        let mut result = FrameResult {
            mode: self.mode,
            hand_visible: true,
            ..FrameResult::default()
        };

        match self.mode {
            Mode::Detect => self.detect(pose, store, bindings, now, &mut result),
            Mode::Mouse => {
                result.mouse = Some(self.smart_mouse.update(pose, now, self.pointer.as_mut()));
            }
            Mode::Record => {}
        }
        result
    }

    fn detect(
        &mut self,
        pose: &HandPose,
        store: &GestureStore,
        bindings: &ActionMap,
        now: Instant,
        result: &mut FrameResult,
    ) {
        let features = extract_pose(pose);
        let candidate = self.classifier.classify(store, &features);
        let confirmed = self.stability.update(candidate.as_deref()).map(str::to_string);

        result.candidate = candidate;
        result.pending = self.stability.pending().map(str::to_string);
        result.progress = self.stability.progress();

        if let Some(label) = &confirmed {
            let action = bindings.action_for(label);
            let outcome = self.dispatch.dispatch(
                label,
                action.as_ref(),
                pose,
                now,
                self.executor.as_mut(),
            );
            result.dispatch = Some(outcome);
        }
        result.confirmed = confirmed;
    }

    fn hand_lost(&mut self) {
        self.stability.reset();
        self.dispatch.hand_lost();
        self.smart_mouse.release_all(self.pointer.as_mut());
    }

    /// Switch mode, releasing the mouse button and ending the gesture session.
    /// Cursor smoothing carries over.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Record {
            self.metrics.reset_ranges();
        }
        if mode == self.mode {
            return;
        }
        info!("Mode changed: {} -> {mode}", self.mode);
        self.stability.reset();
        self.dispatch.hand_lost();
        self.smart_mouse.release_all(self.pointer.as_mut());
        self.mode = mode;
    }

    /// Forget all per-stream state, e.g. before a worker (re)starts
    pub fn reset(&mut self) {
        self.stability.reset();
        self.dispatch.hand_lost();
        self.smart_mouse.release_all(self.pointer.as_mut());
        self.smart_mouse.reset();
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn metrics(&self) -> &HandMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn stability(&self) -> &StabilityFilter {
        &self.stability
    }

    #[must_use]
    pub const fn dispatch_policy(&self) -> &DispatchPolicy {
        &self.dispatch
    }

    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("detect".parse::<Mode>().unwrap(), Mode::Detect);
        assert_eq!("MOUSE".parse::<Mode>().unwrap(), Mode::Mouse);
        assert!("train".parse::<Mode>().is_err());
        assert_eq!(Mode::Record.to_string(), "RECORD");
    }

    #[test]
    fn test_mode_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Mode::Mouse).unwrap(), "\"MOUSE\"");
    }
}
