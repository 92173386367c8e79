//! Shared application state.
//!
//! A single mutex guards the gesture store, the bindings, the frame pipeline
//! and the published [`Status`]. The frame worker holds it for one whole
//! frame, so status readers and store mutations always see a frame either
//! fully applied or not at all.

use crate::{
    bindings::ActionMap,
    dispatch::DispatchOutcome,
    gesture_store::{GestureStore, TrainingStats},
    hand_metrics::HandMetrics,
    landmarks::{HandPose, Landmark},
    pipeline::{FramePipeline, FrameResult, Mode},
    Error, Result,
};
use log::{error, info, warn};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

/// Status text shown while the smart mouse is active
const MOUSE_STATUS: &str = "Virtual Mouse Active";

/// Point-in-time view of the recognizer, safe to hand to a UI
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Status {
    pub mode: Mode,
    pub hand_visible: bool,
    pub current_gesture: Option<String>,
    pub pending_gesture: Option<String>,
    pub stability_progress: f64,
    pub last_action: String,
    pub fps: u32,
    pub metrics: HandMetrics,
}

struct Inner {
    store: GestureStore,
    bindings: ActionMap,
    pipeline: FramePipeline,
    latest_pose: Option<HandPose>,
    status: Status,
    last_action_at: Option<Instant>,
    last_frame_at: Option<Instant>,
    status_clear: Duration,
}

impl Inner {
    fn publish(&mut self, result: &FrameResult, now: Instant) {
        match &result.dispatch {
            Some(DispatchOutcome::Fired(description)) => {
                self.status.last_action.clone_from(description);
                self.last_action_at = Some(now);
            }
            Some(DispatchOutcome::Continuous(name)) => {
                self.status.last_action.clone_from(name);
                self.last_action_at = Some(now);
            }
            _ => {}
        }
        if result.mode == Mode::Mouse && result.hand_visible {
            self.status.last_action = MOUSE_STATUS.to_string();
            self.last_action_at = Some(now);
        }
        if result.mode != Mode::Mouse
            && self
                .last_action_at
                .is_some_and(|t| now.saturating_duration_since(t) > self.status_clear)
        {
            self.status.last_action.clear();
            self.last_action_at = None;
        }

        if let Some(prev) = self.last_frame_at {
            let dt = now.saturating_duration_since(prev).as_secs_f64();
            if dt > 0.0 {
                self.status.fps = crate::utils::safe_cast::f64_to_i32_clamp(1.0 / dt, 0, i32::MAX)
                    .unsigned_abs();
            }
        }
        self.last_frame_at = Some(now);

        self.status.mode = result.mode;
        self.status.hand_visible = result.hand_visible;
        self.status.current_gesture.clone_from(&result.confirmed);
        self.status.pending_gesture.clone_from(&result.pending);
        self.status.stability_progress = result.progress;
        self.status.metrics = self.pipeline.metrics().clone();
    }
}

/// Cloneable handle to the shared state
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<Inner>>,
}

impl SharedState {
    #[must_use]
    pub fn new(
        store: GestureStore,
        bindings: ActionMap,
        pipeline: FramePipeline,
        status_clear: Duration,
    ) -> Self {
        let status = Status {
            mode: pipeline.mode(),
            ..Status::default()
        };
        Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                bindings,
                pipeline,
                latest_pose: None,
                status,
                last_action_at: None,
                last_frame_at: None,
                status_clear,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Run one frame through the pipeline and publish its result.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] only; frame-level problems never fail.
    pub fn process_frame(&self, pose: Option<HandPose>, now: Instant) -> Result<FrameResult> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let result = inner
            .pipeline
            .process(pose.as_ref(), &inner.store, &inner.bindings, now);
        inner.latest_pose = pose;
        inner.publish(&result, now);
        Ok(result)
    }

    /// Like [`SharedState::process_frame`] but takes raw landmarks. A
    /// malformed landmark list is dropped (logged) and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] only.
    pub fn process_landmarks(
        &self,
        landmarks: Option<Vec<Landmark>>,
        now: Instant,
    ) -> Result<Option<FrameResult>> {
        let pose = match landmarks.map(HandPose::new).transpose() {
            Ok(pose) => pose,
            Err(e) => {
                warn!("Dropping frame: {e}");
                return Ok(None);
            }
        };
        self.process_frame(pose, now).map(Some)
    }

    /// Copy of the latest published status
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn snapshot(&self) -> Result<Status> {
        Ok(self.lock()?.status.clone())
    }

    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn mode(&self) -> Result<Mode> {
        Ok(self.lock()?.pipeline.mode())
    }

    /// Switch the active mode; entering RECORD restarts the metric ranges.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        let mut inner = self.lock()?;
        inner.pipeline.set_mode(mode);
        inner.status.mode = mode;
        inner.status.current_gesture = None;
        inner.status.pending_gesture = None;
        inner.status.stability_progress = 0.0;
        inner.status.metrics = inner.pipeline.metrics().clone();
        Ok(())
    }

    /// Reset per-stream recognition state
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn reset_stream(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.pipeline.reset();
        inner.latest_pose = None;
        inner.last_frame_at = None;
        Ok(())
    }

    /// Record the most recently seen hand as a sample of `label`.
    ///
    /// # Errors
    ///
    /// [`Error::NoHandDetected`] if the last frame had no hand, plus the
    /// store's errors.
    pub fn add_sample_from_latest(&self, label: &str) -> Result<usize> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let pose = inner.latest_pose.as_ref().ok_or(Error::NoHandDetected)?;
        inner.store.add_sample(label, pose)
    }

    /// # Errors
    ///
    /// The store's errors.
    pub fn add_sample(&self, label: &str, pose: &HandPose) -> Result<usize> {
        self.lock()?.store.add_sample(label, pose)
    }

    /// # Errors
    ///
    /// The store's errors.
    pub fn delete_sample(&self, label: &str, index: usize) -> Result<()> {
        self.lock()?.store.delete_sample(label, index)
    }

    /// Rename a gesture and carry its binding along. If the binding cannot
    /// be saved the store rename is undone.
    ///
    /// # Errors
    ///
    /// The store's errors, or [`Error::Persistence`] from the bindings.
    pub fn rename_gesture(&self, old: &str, new: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.store.rename_label(old, new)?;
        if let Err(e) = inner.bindings.rename_mapping(old, new) {
            if let Err(undo) = inner.store.rename_label(new, old) {
                error!("Failed to undo rename of '{old}' after binding error: {undo}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Delete a gesture and its binding. Once the gesture is gone the call
    /// succeeds; a binding that cannot be removed is only logged.
    ///
    /// # Errors
    ///
    /// The store's errors.
    pub fn delete_gesture(&self, label: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.store.delete_label(label)?;
        if let Err(e) = inner.bindings.remove_mapping(label) {
            warn!("Gesture '{label}' deleted but its binding was kept: {e}");
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`Error::InvalidInput`] or [`Error::Persistence`] from the bindings.
    pub fn map_gesture(&self, gesture: &str, action: &str) -> Result<()> {
        self.lock()?.bindings.map_gesture(gesture, action)
    }

    /// Current bindings
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn bindings(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .lock()?
            .bindings
            .mapping()
            .iter()
            .map(|(g, a)| (g.clone(), a.clone()))
            .collect())
    }

    /// Label → sample count
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn gestures(&self) -> Result<Vec<(String, usize)>> {
        Ok(self.lock()?.store.summary())
    }

    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn training_stats(&self) -> Result<TrainingStats> {
        Ok(self.lock()?.store.training_stats())
    }

    /// # Errors
    ///
    /// The store's errors.
    pub fn save_artifact(&self, label: &str, jpeg: &[u8]) -> Result<PathBuf> {
        self.lock()?.store.save_artifact(label, jpeg)
    }

    /// # Errors
    ///
    /// [`Error::LockPoisoned`].
    pub fn list_artifacts(&self, label: &str) -> Result<Vec<PathBuf>> {
        Ok(self.lock()?.store.list_artifacts(label))
    }

    /// Re-read the gesture store from disk
    ///
    /// # Errors
    ///
    /// The store's load errors; the previous contents are kept on failure.
    pub fn reload_store(&self) -> Result<()> {
        let mut inner = self.lock()?;
        let mut fresh = inner.store.clone();
        fresh.reload()?;
        inner.store = fresh;
        info!("Reloaded {} gestures", inner.store.len());
        Ok(())
    }
}
